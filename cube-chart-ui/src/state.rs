//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the reactive signals the components read. The
//! [`Coordinator`] stays the source of truth for widget results; a
//! subscription copies its state into `widgets` after every change.

use cube_dash::{Coordinator, FilterSelection, WidgetSpec, WidgetState};
use cube_query::Session;
use dioxus::prelude::*;

/// Key the signed-in session is stored under in `localStorage`.
pub const SESSION_STORAGE_KEY: &str = "cube-dashboard-session";

#[derive(Clone, Copy)]
pub struct AppState {
    /// Signed-in session, `None` shows the login form
    pub session: Signal<Option<Session>>,
    /// Global filter selection; every change triggers a refresh
    pub selection: Signal<FilterSelection>,
    /// Snapshot of each widget's state, in display order
    pub widgets: Signal<Vec<(WidgetSpec, WidgetState)>>,
    /// A refresh cycle is in flight
    pub loading: Signal<bool>,
    pub error_msg: Signal<Option<String>>,
    /// Raw date inputs; applied to the selection only when both parse
    pub start_date: Signal<String>,
    pub end_date: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Signal::new(None),
            selection: Signal::new(FilterSelection::default()),
            widgets: Signal::new(Vec::new()),
            loading: Signal::new(false),
            error_msg: Signal::new(None),
            start_date: Signal::new(String::new()),
            end_date: Signal::new(String::new()),
        }
    }

    /// Mirror `coordinator` into the widget and loading signals.
    pub fn follow(self, coordinator: &Coordinator) {
        let mut widgets = self.widgets;
        let mut loading = self.loading;
        widgets.set(coordinator.widget_states());
        loading.set(coordinator.is_loading());

        let source = coordinator.clone();
        coordinator.subscribe(move |_| {
            let mut widgets = widgets;
            let mut loading = loading;
            widgets.set(source.widget_states());
            loading.set(source.is_loading());
        });
    }

    /// Restore a session saved by an earlier visit.
    pub fn restore_session(mut self) {
        let restored = crate::js_bridge::storage_get(SESSION_STORAGE_KEY)
            .and_then(|json| serde_json::from_str::<Session>(&json).ok())
            .filter(Session::is_authenticated);
        if let Some(session) = restored {
            log::info!("Restored session for {}", session.api_url);
            self.session.set(Some(session));
        }
    }

    pub fn sign_in(mut self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(json) => crate::js_bridge::storage_set(SESSION_STORAGE_KEY, &json),
            Err(e) => log::warn!("Could not persist session: {}", e),
        }
        self.error_msg.set(None);
        self.session.set(Some(session));
    }

    /// Drop the session and every cached result.
    pub fn sign_out(mut self, coordinator: &Coordinator) {
        crate::js_bridge::storage_remove(SESSION_STORAGE_KEY);
        coordinator.reset();
        self.session.set(None);
        self.selection.set(FilterSelection::default());
        self.start_date.set(String::new());
        self.end_date.set(String::new());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
