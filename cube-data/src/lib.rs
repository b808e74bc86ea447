//! Response normalization for dashboard widgets.
//!
//! This crate turns loosely typed analytics rows into the fixed
//! label + numeric-series shape each chart widget renders.

pub mod labels;
pub mod normalize;
pub mod numeric;
pub mod recipe;
pub mod series;

pub use normalize::{normalize, normalize_with_warnings, NormalizationWarning, NormalizeError, Normalized};
pub use numeric::{parse_numeric, ParseError};
pub use recipe::{Recipe, SeriesSpec, Unparseable, WidgetKind};
pub use series::{ChartSeries, DataSeries};
