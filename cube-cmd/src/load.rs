//! `load`: send a hand-written query and print the raw rows.

use crate::args::Connection;
use crate::render;
use anyhow::Context;
use cube_query::Query;
use log::info;

/// Parse the query argument: inline JSON, or `@path` to a JSON file.
pub fn parse_query_arg(arg: &str) -> anyhow::Result<Query> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file {}", path))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("Query is not valid JSON for the load endpoint")
}

pub async fn run_load(connection: &Connection, query: &str, json: bool) -> anyhow::Result<()> {
    let query = parse_query_arg(query)?;
    let session = connection.session()?;
    let client = connection.client()?;

    let response = client.load(&session, &query).await?;
    info!("{} rows", response.rows.len());
    if json {
        println!("{}", serde_json::to_string_pretty(&response.rows)?);
    } else {
        println!("{}", render::rows_table(&response.rows));
    }
    Ok(())
}
