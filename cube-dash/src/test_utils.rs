use crate::report::members;
use cube_query::{Annotation, Query, QueryError, QueryExecutor, QueryResponse, Row, Value};
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

pub type Reply = Result<QueryResponse, QueryError>;

/// Answers queries from channels, in call order, so a test decides when each
/// response arrives.
pub struct ScriptedExecutor {
    replies: RefCell<VecDeque<oneshot::Receiver<Reply>>>,
    queries: RefCell<Vec<Query>>,
}

impl ScriptedExecutor {
    pub fn new(replies: Vec<oneshot::Receiver<Reply>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.borrow().clone()
    }
}

impl QueryExecutor for ScriptedExecutor {
    async fn execute(&self, query: &Query) -> Reply {
        self.queries.borrow_mut().push(query.clone());
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .expect("no scripted reply left");
        reply
            .await
            .unwrap_or_else(|_| Err(QueryError::TransportFailure("reply dropped".into())))
    }
}

/// Answers every query immediately from a closure.
pub struct FixtureExecutor<F> {
    respond: F,
    calls: Cell<usize>,
}

impl<F: Fn(&Query) -> Reply> FixtureExecutor<F> {
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<F: Fn(&Query) -> Reply> QueryExecutor for FixtureExecutor<F> {
    async fn execute(&self, query: &Query) -> Reply {
        self.calls.set(self.calls.get() + 1);
        (self.respond)(query)
    }
}

pub fn response(query: &Query, rows: Vec<Row>) -> QueryResponse {
    QueryResponse::new(query.clone(), rows, Annotation::default())
}

/// Rows of `(region, total sales)` as the service encodes them.
pub fn region_rows(rows: &[(&str, &str)]) -> Vec<Row> {
    rows.iter()
        .map(|(region, total)| {
            let mut row = Row::new();
            row.insert(members::REGION.to_string(), Value::from(*region));
            row.insert(members::TOTAL_SALES_AMOUNT.to_string(), Value::from(*total));
            row
        })
        .collect()
}
