use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct NoDataProps {
    /// Names of the series that came back empty
    pub series: Vec<String>,
}

/// Explicit empty state: the query succeeded but matched no rows.
#[component]
pub fn NoData(props: NoDataProps) -> Element {
    let names = props.series.join(", ");
    rsx! {
        div {
            style: "padding: 24px; text-align: center; color: #888; border: 1px dashed #ddd; border-radius: 4px;",
            p { style: "margin: 0 0 4px 0;", "No data for the current filters." }
            if !props.series.is_empty() {
                p {
                    style: "margin: 0; font-size: 12px;",
                    "{names}"
                }
            }
        }
    }
}
