//! Command implementations for the Cube dashboard CLI.
//!
//! Provides subcommands to sign in, run the dashboard's reports from the
//! terminal, and send raw queries to the Cube REST API.

use clap::Subcommand;
use cube_dash::ReportIntent;
use std::path::PathBuf;

pub mod args;
pub mod dashboard;
pub mod load;
pub mod login;
pub mod render;
pub mod report;
pub mod session_file;

pub use args::{Connection, SelectionArgs};

#[derive(Subcommand)]
pub enum Command {
    /// Exchange credentials for a token and store the session
    Login {
        #[command(flatten)]
        connection: Connection,

        /// Authentication endpoint
        #[arg(long, env = "CUBE_LOGIN_URL", default_value = "http://localhost:8000/api/login")]
        login_url: String,

        #[arg(short, long)]
        username: String,

        /// Read from stdin when not given
        #[arg(long, env = "CUBE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout {
        /// Session file to remove
        #[arg(long, env = "CUBE_SESSION_FILE")]
        session_file: Option<PathBuf>,
    },

    /// Run one report and print its chart data
    Report {
        /// One of: kpi-summary, sales-over-time, revenue-by-region,
        /// orders-by-status, top-customers
        intent: ReportIntent,

        #[command(flatten)]
        connection: Connection,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run every report concurrently and print each widget's state
    Dashboard {
        #[command(flatten)]
        connection: Connection,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Send a raw JSON query to the load endpoint and print the rows
    Load {
        /// Query JSON, or `@path` to read it from a file
        query: String,

        #[command(flatten)]
        connection: Connection,

        /// Print the rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login {
            connection,
            login_url,
            username,
            password,
        } => login::run_login(&connection, &login_url, &username, password).await,
        Command::Logout { session_file } => login::run_logout(session_file),
        Command::Report {
            intent,
            connection,
            selection,
            json,
        } => report::run_report(&connection, intent, &selection, json).await,
        Command::Dashboard {
            connection,
            selection,
        } => dashboard::run_dashboard(&connection, &selection).await,
        Command::Load {
            query,
            connection,
            json,
        } => load::run_load(&connection, &query, json).await,
    }
}
