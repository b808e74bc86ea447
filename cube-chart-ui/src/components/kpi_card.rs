use crate::format::{format_value, ValueFormat};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct KpiCardProps {
    pub title: String,
    pub value: f64,
    pub format: ValueFormat,
}

/// A single headline number.
#[component]
pub fn KpiCard(props: KpiCardProps) -> Element {
    let text = format_value(props.value, props.format);
    rsx! {
        div {
            style: "flex: 1; min-width: 160px; padding: 16px; border: 1px solid #e0e0e0; border-radius: 6px; background: white;",
            div { style: "font-size: 12px; color: #666; text-transform: uppercase;", "{props.title}" }
            div { style: "font-size: 24px; font-weight: 600; margin-top: 4px;", "{text}" }
        }
    }
}
