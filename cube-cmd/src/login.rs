//! `login` and `logout`.

use crate::args::Connection;
use crate::session_file;
use anyhow::Context;
use log::info;
use std::io::BufRead;
use std::path::PathBuf;

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run_login(
    connection: &Connection,
    login_url: &str,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let client = connection.client()?;
    let session = client
        .login(login_url, connection.api_url(), username, &password)
        .await
        .context("Login failed")?;

    let path = connection.session_path();
    session_file::save(&path, &session)?;
    let who = session.user().map(|u| u.display_name()).unwrap_or(username);
    info!("Session stored in {}", path.display());
    println!("Signed in as {}", who);
    Ok(())
}

pub fn run_logout(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(session_file::default_path);
    if session_file::remove(&path)? {
        println!("Signed out");
    } else {
        println!("No stored session at {}", path.display());
    }
    Ok(())
}
