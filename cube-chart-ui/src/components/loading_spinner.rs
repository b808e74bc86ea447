//! Loading placeholder shown while a widget's query is in flight.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Loading data...".to_string())]
    pub label: String,
    #[props(default = 120)]
    pub min_height: u32,
}

/// Skeleton block with a short status line.
#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    let style = format!(
        "display: flex; justify-content: center; align-items: center; min-height: {}px; background: #F5F5F5; border-radius: 4px; color: #666;",
        props.min_height
    );
    rsx! {
        div {
            style: "{style}",
            "{props.label}"
        }
    }
}
