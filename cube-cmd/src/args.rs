//! Arguments shared by several subcommands.

use crate::session_file;
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use cube_dash::FilterSelection;
use cube_query::{AuthScheme, Client, ClientConfig, DateRange, Granularity, LoadMethod, Session};
use cube_utils::dates::ordered_range;
use log::debug;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:4000/cubejs-api/v1";

/// Where the API lives and how to authenticate against it.
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// Base URL of the Cube REST API [default: the stored session's, else
    /// http://localhost:4000/cubejs-api/v1]
    #[arg(long, env = "CUBE_API_URL")]
    pub api_url: Option<String>,

    /// Use this token instead of the stored session
    #[arg(long, env = "CUBE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Session file written by `login`
    #[arg(long, env = "CUBE_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Send queries as a POST body instead of a GET parameter
    #[arg(long)]
    pub post: bool,

    /// Send the token as `Bearer <token>`
    #[arg(long)]
    pub bearer: bool,
}

impl Connection {
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(session_file::default_path)
    }

    /// The URL given on the command line or in the environment, else the
    /// default.
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            load_method: if self.post { LoadMethod::Post } else { LoadMethod::Get },
            auth_scheme: if self.bearer { AuthScheme::Bearer } else { AuthScheme::Raw },
        }
    }

    pub fn client(&self) -> anyhow::Result<Client> {
        Client::with_config(self.client_config()).context("Failed to build HTTP client")
    }

    /// An explicit token wins; otherwise the stored session. Without either
    /// the session is signed out and every query fails as unauthenticated.
    /// An explicit `--api-url` overrides the URL stored with the session.
    pub fn session(&self) -> anyhow::Result<Session> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(Session::new(self.api_url()).with_token(token));
        }
        let path = self.session_path();
        match session_file::load(&path)? {
            Some(mut session) => {
                debug!("Using session from {}", path.display());
                if let Some(url) = &self.api_url {
                    session.api_url = url.clone();
                }
                Ok(session)
            }
            None => Ok(Session::new(self.api_url())),
        }
    }
}

/// Global filter flags, mirroring the dashboard's filter bar.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// `member=value`; repeat for several values or members
    #[arg(short, long = "filter", value_parser = parse_member_filter)]
    pub filters: Vec<(String, String)>,

    /// First day of the window (YYYY-MM-DD)
    #[arg(long, requires = "to", conflicts_with = "range")]
    pub from: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD)
    #[arg(long, requires = "from", conflicts_with = "range")]
    pub to: Option<NaiveDate>,

    /// Relative window such as "last 30 days" or "this year"
    #[arg(long)]
    pub range: Option<String>,

    /// Time bucket for sales over time
    #[arg(short, long)]
    pub granularity: Option<Granularity>,
}

fn parse_member_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((member, value)) if !member.trim().is_empty() => {
            Ok((member.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected member=value, got '{}'", s)),
    }
}

impl SelectionArgs {
    pub fn selection(&self) -> anyhow::Result<FilterSelection> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (member, value) in &self.filters {
            grouped.entry(member.as_str()).or_default().push(value.as_str());
        }
        let mut selection = grouped
            .into_iter()
            .fold(FilterSelection::new(), |s, (member, values)| s.with_values(member, values));

        let range = match (self.from, self.to, &self.range) {
            (Some(from), Some(to), _) => {
                let (from, to) = ordered_range(from, to).context("Invalid --from/--to window")?;
                Some(DateRange::Between(from, to))
            }
            (_, _, Some(relative)) => Some(DateRange::Relative(relative.clone())),
            _ => None,
        };
        selection = selection.with_date_range(range);
        if let Some(granularity) = self.granularity {
            selection = selection.with_granularity(granularity);
        }
        Ok(selection)
    }
}
