//! Chart container that hands a widget's series to its D3 renderer.

use crate::chart::{chart_for, container_id};
use crate::js_bridge;
use cube_dash::WidgetSpec;
use cube_data::ChartSeries;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    pub spec: WidgetSpec,
    pub series: ChartSeries,
    #[props(default = 280)]
    pub min_height: u32,
}

/// A container div that D3 renders into. Re-renders whenever the series
/// changes and clears the container on unmount.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let id = container_id(&props.spec);
    let mut current = use_signal(|| (props.spec.clone(), props.series.clone()));
    if *current.peek() != (props.spec.clone(), props.series.clone()) {
        current.set((props.spec.clone(), props.series.clone()));
    }

    use_effect(move || {
        let (spec, series) = current();
        let Some((renderer, config)) = chart_for(&spec, &series) else {
            return;
        };
        let data_json = match series.to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize {}: {}", spec.id, e);
                return;
            }
        };
        let config_json = serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string());
        js_bridge::render_chart(renderer, &container_id(&spec), &data_json, &config_json);
    });

    let drop_id = id.clone();
    use_drop(move || js_bridge::destroy_chart(&drop_id));

    let style = format!("min-height: {}px; position: relative; width: 100%;", props.min_height);
    rsx! {
        div {
            style: "{style}",
            div {
                id: "{id}",
                style: "width: 100%;",
            }
        }
    }
}
