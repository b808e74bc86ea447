use crate::state::AppState;
use cube_query::Granularity;
use dioxus::prelude::*;

const CHOICES: [Granularity; 5] = [
    Granularity::Day,
    Granularity::Week,
    Granularity::Month,
    Granularity::Quarter,
    Granularity::Year,
];

/// Time bucket used by the sales-over-time chart.
#[component]
pub fn GranularitySelector() -> Element {
    let mut state = use_context::<AppState>();
    let current = state.selection.read().granularity();

    let on_change = move |evt: Event<FormData>| match evt.value().parse::<Granularity>() {
        Ok(granularity) => {
            let next = state.selection.peek().clone().with_granularity(granularity);
            state.selection.set(next);
        }
        Err(e) => log::warn!("{}", e),
    };

    rsx! {
        label {
            style: "font-weight: bold;",
            "Group by: "
            select {
                onchange: on_change,
                for granularity in CHOICES {
                    option {
                        key: "{granularity}",
                        value: "{granularity}",
                        selected: granularity == current,
                        "{granularity}"
                    }
                }
            }
        }
    }
}
