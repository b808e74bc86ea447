//! Error display component.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    /// Shows a retry button when set
    pub on_retry: Option<EventHandler<MouseEvent>>,
}

/// Displays an error message in a styled box.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        div {
            style: "padding: 12px 16px; margin: 8px 0; background: #FFEBEE; color: #C62828; border-radius: 4px; border: 1px solid #EF9A9A; display: flex; justify-content: space-between; align-items: center; gap: 12px;",
            span {
                strong { "Error: " }
                "{props.message}"
            }
            if let Some(on_retry) = props.on_retry {
                button {
                    style: "border: 1px solid #C62828; background: white; color: #C62828; border-radius: 4px; padding: 4px 10px; cursor: pointer;",
                    onclick: move |evt| on_retry.call(evt),
                    "Retry"
                }
            }
        }
    }
}
