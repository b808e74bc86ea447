//! Sales analytics dashboard.
//!
//! Data flow:
//! 1. On mount: mirror the coordinator into `AppState`, restore a saved
//!    session and load the chart scripts.
//! 2. Without a session the login form exchanges credentials for a token.
//! 3. Whenever the session or the filter selection changes, the coordinator
//!    starts a refresh cycle and the app runs it against the Cube API.
//! 4. Widgets render from the coordinator's snapshot; results of superseded
//!    cycles are dropped by the coordinator.

use cube_chart_ui::chart::describe_selection;
use cube_chart_ui::components::{
    DateRangePicker, ErrorDisplay, GranularitySelector, LoginForm, MemberSelector, WidgetFrame,
};
use cube_chart_ui::js_bridge;
use cube_chart_ui::state::AppState;
use cube_dash::report::members;
use cube_dash::{Coordinator, Cycle, WidgetError, WidgetSpec};
use cube_query::{Authenticated, Client, Session};
use dioxus::prelude::*;

const DEFAULT_API_URL: &str = "http://localhost:4000/cubejs-api/v1";
const DEFAULT_LOGIN_URL: &str = "http://localhost:8000/api/login";

const REGIONS: [&str; 5] = ["AFRICA", "AMERICA", "ASIA", "EUROPE", "MIDDLE EAST"];
const ORDER_STATUSES: [&str; 3] = ["F", "O", "P"];

fn api_url() -> &'static str {
    option_env!("CUBE_API_URL").unwrap_or(DEFAULT_API_URL)
}

fn login_url() -> &'static str {
    option_env!("CUBE_LOGIN_URL").unwrap_or(DEFAULT_LOGIN_URL)
}

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("sales-dashboard-root"))
        .launch(App);
}

/// Run `cycle` in the background. A rejected credential ends the session.
fn run_cycle(mut state: AppState, coordinator: Coordinator, client: Client, session: Session, cycle: Cycle) {
    spawn(async move {
        let executor = Authenticated {
            client: &client,
            session: &session,
        };
        let summary = coordinator.run(cycle, &executor).await;
        log::info!(
            "Cycle {}: {} applied, {} discarded",
            summary.generation,
            summary.applied,
            summary.discarded
        );

        let expired = summary.applied > 0
            && coordinator
                .widget_states()
                .iter()
                .any(|(_, s)| s.error().is_some_and(WidgetError::is_auth));
        if expired {
            state.sign_out(&coordinator);
            state
                .error_msg
                .set(Some("Your session has expired. Please sign in again.".to_string()));
        }
    });
}

fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let coordinator = use_context_provider(|| Coordinator::new(WidgetSpec::defaults()));
    let client = use_hook(|| Client::new().map_err(|e| e.to_string()));
    let mut signing_in = use_signal(|| false);

    // ─── Effect 1: one-time setup ───
    let setup_coordinator = coordinator.clone();
    use_effect(move || {
        state.follow(&setup_coordinator);
        state.restore_session();
        js_bridge::init_charts();
    });

    // ─── Effect 2: refresh on session or selection change ───
    let effect_coordinator = coordinator.clone();
    let effect_client = client.clone();
    use_effect(move || {
        let session = (state.session)();
        let selection = (state.selection)();
        let Some(session) = session.filter(Session::is_authenticated) else {
            return;
        };
        let client = match &effect_client {
            Ok(client) => client.clone(),
            Err(e) => {
                state.error_msg.set(Some(e.clone()));
                return;
            }
        };
        if let Some(cycle) = effect_coordinator.select(selection) {
            run_cycle(state, effect_coordinator.clone(), client, session, cycle);
        }
    });

    let login_client = client.clone();
    let on_login = move |(username, password): (String, String)| {
        let client = match &login_client {
            Ok(client) => client.clone(),
            Err(e) => {
                state.error_msg.set(Some(e.clone()));
                return;
            }
        };
        signing_in.set(true);
        spawn(async move {
            match client.login(login_url(), api_url(), &username, &password).await {
                Ok(session) => state.sign_in(session),
                Err(e) => state.error_msg.set(Some(e.to_string())),
            }
            signing_in.set(false);
        });
    };

    let refresh_coordinator = coordinator.clone();
    let refresh_client = client.clone();
    let refresh = EventHandler::new(move |_: MouseEvent| {
        let Some(session) = state.session.peek().clone() else {
            return;
        };
        let Ok(client) = refresh_client.clone() else {
            return;
        };
        state.error_msg.set(None);
        let cycle = refresh_coordinator.refresh_cycle();
        run_cycle(state, refresh_coordinator.clone(), client, session, cycle);
    });

    let logout_coordinator = coordinator.clone();
    let on_logout = move |_: MouseEvent| state.sign_out(&logout_coordinator);

    let session = (state.session)();
    let widgets = (state.widgets)();
    let loading = (state.loading)();
    let subtitle = describe_selection(&state.selection.read());
    let user_name = session
        .as_ref()
        .and_then(|s| s.user())
        .map(|u| u.display_name().to_string());

    rsx! {
        div {
            style: "max-width: 1100px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if session.is_none() {
                LoginForm { on_submit: on_login, busy: signing_in() }
            } else {
                header {
                    style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px;",
                    h2 { style: "margin: 0;", "Sales Dashboard" }
                    div {
                        style: "display: flex; gap: 8px; align-items: center;",
                        if let Some(name) = user_name {
                            span { style: "color: #666;", "{name}" }
                        }
                        button {
                            disabled: loading,
                            onclick: move |evt| refresh.call(evt),
                            if loading { "Refreshing..." } else { "Refresh" }
                        }
                        button { onclick: on_logout, "Sign out" }
                    }
                }

                div {
                    style: "display: flex; flex-wrap: wrap; gap: 16px; align-items: center; padding: 8px 0 16px 0; border-bottom: 1px solid #e0e0e0; margin-bottom: 16px;",
                    MemberSelector {
                        member: members::REGION.to_string(),
                        label: "Region".to_string(),
                        options: options(&REGIONS),
                    }
                    MemberSelector {
                        member: members::ORDER_STATUS.to_string(),
                        label: "Status".to_string(),
                        options: options(&ORDER_STATUSES),
                    }
                    GranularitySelector {}
                    DateRangePicker {}
                }

                for (spec, widget_state) in widgets {
                    WidgetFrame {
                        key: "{spec.id}",
                        spec: spec.clone(),
                        state: widget_state,
                        subtitle: subtitle.clone(),
                        on_retry: Some(refresh),
                    }
                }
            }
        }
    }
}
