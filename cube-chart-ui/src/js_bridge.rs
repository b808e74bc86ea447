//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The D3 renderers live in `assets/js/dashboard-charts.js`, are embedded at
//! compile time and promoted to `window.*` once D3 has loaded. Arguments are
//! passed as JSON string literals, never spliced into the script unquoted.

use crate::chart::Renderer;

static DASHBOARD_CHARTS_JS: &str = include_str!("../assets/js/dashboard-charts.js");

/// Encode `s` as a JS string literal.
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('Dashboard JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Evaluate the chart scripts at global scope once D3 is available.
/// Call once at app startup.
pub fn init_charts() {
    let store_js = format!("window.__dashChartScripts = {};", js_string(DASHBOARD_CHARTS_JS));
    let _ = js_sys::eval(&store_js);

    let promote: String = Renderer::ALL
        .iter()
        .map(|r| {
            format!(
                "if (typeof {f} !== 'undefined') window.{f} = {f};",
                f = r.js_function()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let init_js = format!(
        r#"
        (function() {{
            var waitForD3 = setInterval(function() {{
                if (typeof d3 !== 'undefined') {{
                    clearInterval(waitForD3);
                    (0, eval)(window.__dashChartScripts);
                    delete window.__dashChartScripts;
                    {promote}
                    window.__dashChartsReady = true;
                }}
            }}, 100);
        }})();
        "#
    );
    let _ = js_sys::eval(&init_js);
}

/// Build the script that waits for the renderer and the container, then draws.
pub fn render_script(renderer: Renderer, container_id: &str, data_json: &str, config_json: &str) -> String {
    let function = renderer.js_function();
    let id = js_string(container_id);
    let data = js_string(data_json);
    let config = js_string(config_json);
    format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__dashChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById({id})) {{
                    clearInterval(poll);
                    try {{
                        window.{function}({id}, {data}, {config});
                    }} catch(e) {{ console.error('[dashboard] {function} error:', e); }}
                }}
            }}, 100);
        }})();
        "#
    )
}

pub fn render_chart(renderer: Renderer, container_id: &str, data_json: &str, config_json: &str) {
    call_js(&render_script(renderer, container_id, data_json, config_json));
}

/// Clear whatever a renderer drew into the container.
pub fn destroy_chart(container_id: &str) {
    call_js(&format!(
        "var el = document.getElementById({}); if (el) el.innerHTML = '';",
        js_string(container_id)
    ));
}

/// Read a value from `localStorage`.
pub fn storage_get(key: &str) -> Option<String> {
    js_sys::eval(&format!(
        "(function() {{ try {{ return window.localStorage.getItem({}); }} catch(e) {{ return null; }} }})()",
        js_string(key)
    ))
    .ok()
    .and_then(|value| value.as_string())
}

pub fn storage_set(key: &str, value: &str) {
    call_js(&format!(
        "window.localStorage.setItem({}, {});",
        js_string(key),
        js_string(value)
    ));
}

pub fn storage_remove(key: &str) {
    call_js(&format!("window.localStorage.removeItem({});", js_string(key)));
}
