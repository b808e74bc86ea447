//! Reusable Dioxus RSX components for the dashboard.

mod chart_container;
mod chart_header;
mod date_range_picker;
mod error_display;
mod granularity_selector;
mod kpi_card;
mod loading_spinner;
mod login_form;
mod member_selector;
mod no_data;
mod widget_frame;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use date_range_picker::{date_window, DateRangePicker};
pub use error_display::ErrorDisplay;
pub use granularity_selector::GranularitySelector;
pub use kpi_card::KpiCard;
pub use loading_spinner::LoadingSpinner;
pub use login_form::LoginForm;
pub use member_selector::MemberSelector;
pub use no_data::NoData;
pub use widget_frame::WidgetFrame;
