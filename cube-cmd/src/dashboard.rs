//! `dashboard`: every widget refreshed concurrently, as the web app does.

use crate::args::{Connection, SelectionArgs};
use crate::render;
use cube_dash::{Coordinator, WidgetError, WidgetSpec};
use cube_query::Authenticated;
use log::info;

pub async fn run_dashboard(connection: &Connection, selection: &SelectionArgs) -> anyhow::Result<()> {
    let selection = selection.selection()?;
    let session = connection.session()?;
    let client = connection.client()?;
    let executor = Authenticated {
        client: &client,
        session: &session,
    };

    let coordinator = Coordinator::new(WidgetSpec::defaults());
    let Some(summary) = coordinator.apply(selection, &executor).await else {
        return Ok(());
    };
    info!(
        "Dashboard refreshed: {} widgets applied, {} discarded",
        summary.applied, summary.discarded
    );

    let states = coordinator.widget_states();
    for (spec, state) in &states {
        println!("{}\n", render::widget_block(spec, state));
    }

    let errors: Vec<&WidgetError> = states.iter().filter_map(|(_, s)| s.error()).collect();
    if errors.iter().any(|e| e.is_auth()) {
        anyhow::bail!("Not authenticated; run `login` or pass --token");
    }
    if !errors.is_empty() && errors.len() == states.len() {
        anyhow::bail!("Every widget failed");
    }
    Ok(())
}
