//! `report`: one intent through builder, client and normalizer.

use crate::args::{Connection, SelectionArgs};
use crate::render;
use anyhow::Context;
use cube_dash::ReportIntent;
use cube_data::normalize_with_warnings;
use log::info;

pub async fn run_report(
    connection: &Connection,
    intent: ReportIntent,
    selection: &SelectionArgs,
    json: bool,
) -> anyhow::Result<()> {
    let selection = selection.selection()?;
    let session = connection.session()?;
    let client = connection.client()?;

    let query = intent.query(&selection);
    info!("Running {} against {}", intent, session.api_url);
    let response = client
        .load(&session, &query)
        .await
        .with_context(|| format!("Report {} failed", intent))?;

    let normalized = normalize_with_warnings(&response, &intent.recipe(&selection))?;
    if !normalized.warnings.is_empty() {
        info!("{} values could not be parsed and were shown as 0", normalized.warnings.len());
    }

    if json {
        println!("{}", normalized.series.to_json()?);
    } else if normalized.series.is_empty() {
        println!("{}: no data", intent.title());
    } else {
        println!("{}", render::series_table(&normalized.series));
    }
    Ok(())
}
