//! Session persistence between CLI invocations.

use anyhow::Context;
use cube_query::Session;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const SESSION_DIR: &str = ".cube-dashboard";
const SESSION_FILE: &str = "session.json";

/// `$HOME/.cube-dashboard/session.json`, or the working directory when no
/// home directory is set.
pub fn default_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SESSION_DIR)
        .join(SESSION_FILE)
}

/// Read a stored session. A missing file is not an error.
pub fn load(path: &Path) -> anyhow::Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))?;
    let session: Session = serde_json::from_str(&text)
        .with_context(|| format!("Corrupt session file {}", path.display()))?;
    Ok(Some(session))
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600)
}

#[cfg(not(unix))]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}

/// Write the session, readable by the owner only on unix. The file holds the
/// token.
pub fn save(path: &Path, session: &Session) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(session)?;
    // A file left by an older version keeps its mode on open; drop it first.
    remove(path)?;
    let mut file = owner_only(OpenOptions::new().write(true).create_new(true))
        .open(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Delete the stored session. Returns whether there was one.
pub fn remove(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    Ok(true)
}
