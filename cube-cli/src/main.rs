//! cube-cli: signs in to a Cube deployment and prints the sales reports
//! (single reports, the whole dashboard, or raw `/load` queries) as tables
//! or JSON.

use clap::Parser;
use env_logger::Env;

#[derive(Parser)]
#[command(
    name = "cube-cli",
    version,
    about = "Sales analytics over the Cube semantic layer"
)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides it
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: cube_cmd::Command,
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(cli.verbose))).init();
    cube_cmd::run(cli.command).await
}
