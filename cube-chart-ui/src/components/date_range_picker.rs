//! Date range picker with start and end date inputs.

use crate::state::AppState;
use cube_query::DateRange;
use cube_utils::dates::{ordered_range, parse_date};
use cube_utils::error::DateError;
use dioxus::prelude::*;

/// The window described by two date inputs. Both blank clears the window;
/// one blank leaves it incomplete.
pub fn date_window(start: &str, end: &str) -> Result<Option<DateRange>, DateError> {
    match (start.trim(), end.trim()) {
        ("", "") => Ok(None),
        ("", _) | (_, "") => Err(DateError::InvalidDate("both ends of the range are required".to_string())),
        (start, end) => {
            let (start, end) = ordered_range(parse_date(start)?, parse_date(end)?)?;
            Ok(Some(DateRange::Between(start, end)))
        }
    }
}

/// Date range picker for the global time window.
#[component]
pub fn DateRangePicker() -> Element {
    let mut state = use_context::<AppState>();
    let start = (state.start_date)();
    let end = (state.end_date)();

    let mut apply = move || {
        let start = state.start_date.peek().clone();
        let end = state.end_date.peek().clone();
        match date_window(&start, &end) {
            Ok(range) => {
                state.error_msg.set(None);
                let next = state.selection.peek().clone().with_date_range(range);
                state.selection.set(next);
            }
            Err(DateError::InvalidDate(_)) if start.trim().is_empty() || end.trim().is_empty() => {}
            Err(e) => state.error_msg.set(Some(e.to_string())),
        }
    };

    let on_start_change = move |evt: Event<FormData>| {
        state.start_date.set(evt.value());
        apply();
    };

    let on_end_change = move |evt: Event<FormData>| {
        state.end_date.set(evt.value());
        apply();
    };

    rsx! {
        div {
            style: "display: flex; gap: 12px; align-items: center;",
            label {
                style: "font-weight: bold;",
                "From: "
                input {
                    r#type: "date",
                    value: "{start}",
                    onchange: on_start_change,
                }
            }
            label {
                style: "font-weight: bold;",
                "To: "
                input {
                    r#type: "date",
                    value: "{end}",
                    onchange: on_end_change,
                }
            }
        }
    }
}
