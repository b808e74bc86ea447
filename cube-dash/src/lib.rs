//! Dashboard state for the sales analytics app.
//!
//! - `report`: the fixed report intents and the queries they build
//! - `selection`: global filter selection and its canonical form
//! - `widget`: widget specs and their render states
//! - `coordinator`: single source of truth that fans out fetches on filter
//!   changes and drops results from superseded cycles

pub mod coordinator;
pub mod report;
pub mod selection;
pub mod widget;

#[cfg(test)]
mod test_utils;

pub use coordinator::{Coordinator, CoordinatorEvent, Cycle, Phase, Resolution, RunSummary, SubscriptionId};
pub use report::ReportIntent;
pub use selection::{CanonicalFilters, FilterSelection};
pub use widget::{WidgetError, WidgetSpec, WidgetState};
