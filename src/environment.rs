//! Host environment detection.
//!
//! Builds the one-line environment description embedded in bug reports.
//! Detection is best effort: unknown fields are dropped and a failed
//! lookup degrades to the bare platform name, so reporting never blocks
//! on this step.

use thiserror::Error;

/// Errors from the host environment probe.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("environment probe task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("environment lookup failed: {0}")]
    Lookup(String),
}

/// Queries a human-readable description of the host system.
pub trait EnvironmentProbe {
    /// Returns a one-line description of the host OS.
    async fn query(&self) -> Result<String, EnvironmentError>;
}

/// Probe backed by the `os_info` crate.
///
/// `os_info` reads release files and may shell out, so the lookup runs on
/// the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnvironment;

impl EnvironmentProbe for OsEnvironment {
    async fn query(&self) -> Result<String, EnvironmentError> {
        let info = tokio::task::spawn_blocking(os_info::get).await?;
        Ok(describe(&info))
    }
}

/// Assembles the environment string from an `os_info` lookup.
fn describe(info: &os_info::Info) -> String {
    assemble([
        Some(info.os_type().to_string()),
        Some(info.version().to_string()),
        info.codename().map(str::to_string),
        info.edition().map(str::to_string),
        Some(std::env::consts::OS.to_string()),
        Some(info.bitness().to_string()),
        info.architecture().map(str::to_string),
    ])
}

/// Joins the known fields with single spaces, dropping blanks and
/// "unknown" placeholders. Falls back to the bare platform name when
/// nothing is known.
fn assemble(fields: impl IntoIterator<Item = Option<String>>) -> String {
    let parts: Vec<String> = fields
        .into_iter()
        .flatten()
        .filter_map(|field| {
            let trimmed = field.trim();
            if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("unknown") {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect();

    if parts.is_empty() {
        std::env::consts::OS.to_string()
    } else {
        parts.join(" ")
    }
}

/// Maps a `std::env::consts::OS` platform identifier to the display name
/// used in report forms. Unmapped platforms get no display name.
pub fn host_display_name(platform: &str) -> Option<&'static str> {
    match platform {
        "macos" => Some("macOS"),
        "linux" => Some("Linux"),
        "windows" => Some("Windows"),
        _ => None,
    }
}
