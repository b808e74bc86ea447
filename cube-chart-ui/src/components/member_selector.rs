//! Dropdown bound to one member of the global filter selection.

use crate::state::AppState;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct MemberSelectorProps {
    /// Member the filter applies to, e.g. `sales.region`
    pub member: String,
    pub label: String,
    pub options: Vec<String>,
}

/// Picking "All" removes the filter for the member.
#[component]
pub fn MemberSelector(props: MemberSelectorProps) -> Element {
    let mut state = use_context::<AppState>();
    let selected = state
        .selection
        .read()
        .values(&props.member)
        .and_then(|values| values.iter().next().cloned())
        .unwrap_or_default();
    let select_id = format!("{}-select", props.member.replace('.', "-"));

    let member = props.member.clone();
    let on_change = move |evt: Event<FormData>| {
        let value = evt.value();
        let next = state.selection.peek().clone().with_values(member.clone(), [value]);
        state.selection.set(next);
    };

    rsx! {
        div {
            label {
                r#for: "{select_id}",
                style: "font-weight: bold; margin-right: 8px;",
                "{props.label}: "
            }
            select {
                id: "{select_id}",
                onchange: on_change,
                option { value: "", selected: selected.is_empty(), "All" }
                for option_value in props.options.iter() {
                    option {
                        key: "{option_value}",
                        value: "{option_value}",
                        selected: *option_value == selected,
                        "{option_value}"
                    }
                }
            }
        }
    }
}
