//! One dashboard widget in whichever state it is in.

use crate::chart::value_format;
use crate::components::{ChartContainer, ChartHeader, ErrorDisplay, KpiCard, LoadingSpinner, NoData};
use cube_dash::{WidgetSpec, WidgetState};
use cube_data::WidgetKind;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct WidgetFrameProps {
    pub spec: WidgetSpec,
    pub state: WidgetState,
    #[props(default = String::new())]
    pub subtitle: String,
    pub on_retry: Option<EventHandler<MouseEvent>>,
}

#[component]
pub fn WidgetFrame(props: WidgetFrameProps) -> Element {
    let body = match &props.state {
        WidgetState::Loading => rsx! { LoadingSpinner {} },
        WidgetState::Failed(err) => rsx! {
            ErrorDisplay {
                message: err.to_string(),
                on_retry: props.on_retry,
            }
        },
        WidgetState::Empty(series) => {
            let names: Vec<String> = series.series().iter().map(|s| s.name.clone()).collect();
            rsx! { NoData { series: names } }
        }
        WidgetState::Ready(series) if series.kind() == WidgetKind::Kpi => {
            let cards: Vec<(String, f64, String)> = series
                .series()
                .iter()
                .map(|s| (s.name.clone(), s.values.first().copied().unwrap_or(0.0), s.field.clone()))
                .collect();
            rsx! {
                div {
                    style: "display: flex; gap: 12px; flex-wrap: wrap;",
                    for (title, value, field) in cards {
                        KpiCard {
                            key: "{field}",
                            title: title,
                            value: value,
                            format: value_format(&field),
                        }
                    }
                }
            }
        }
        WidgetState::Ready(series) => rsx! {
            ChartContainer {
                spec: props.spec.clone(),
                series: series.clone(),
            }
        },
    };

    rsx! {
        section {
            style: "padding: 12px; margin-bottom: 16px; border: 1px solid #eee; border-radius: 6px; background: #FAFAFA;",
            ChartHeader {
                title: props.spec.intent.title().to_string(),
                subtitle: props.subtitle.clone(),
            }
            {body}
        }
    }
}
