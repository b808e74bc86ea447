//! Query model and REST client for the Cube semantic-layer analytics API.
//!
//! The model types mirror the JSON the `/load` endpoint accepts and returns.
//! The HTTP client lives behind the `api` feature so crates that only shape
//! responses do not pull in `reqwest`.

pub mod error;
pub mod executor;
pub mod filter;
pub mod query;
pub mod response;
pub mod session;

#[cfg(feature = "api")]
pub mod client;

pub use error::QueryError;
pub use executor::QueryExecutor;
pub use filter::{Filter, Operator};
pub use query::{DateRange, Granularity, OrderDirection, Query, QueryBuilder, TimeDimension};
pub use response::{Annotation, MemberMeta, QueryResponse, Row, Value};
pub use session::{Session, UserRecord};

#[cfg(feature = "api")]
pub use client::{AuthScheme, Authenticated, Client, ClientConfig, LoadMethod};
