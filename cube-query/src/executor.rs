use crate::error::QueryError;
use crate::query::Query;
use crate::response::QueryResponse;

/// Anything that can run a [`Query`] and hand back its rows.
///
/// The dashboard coordinator is written against this trait so it does not
/// care whether the rows come from HTTP or from a test fixture.
#[allow(async_fn_in_trait)]
pub trait QueryExecutor {
    async fn execute(&self, query: &Query) -> Result<QueryResponse, QueryError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    async fn execute(&self, query: &Query) -> Result<QueryResponse, QueryError> {
        (**self).execute(query).await
    }
}
