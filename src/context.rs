//! Read-only installer state consumed by the report pipeline.
//!
//! The installer owns this state; the reporter only reads it. It is passed
//! in explicitly at construction instead of being read from process-wide
//! globals, which keeps the pipeline testable.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Canonical device configuration, as known to the config registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Registry codename, e.g. `yggdrasil`.
    pub codename: String,
    /// Human-readable device name, e.g. `Volla Phone`.
    pub name: String,
    /// Commit hash of the resolved config file, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl DeviceConfig {
    /// Creates a device config without a pinned registry commit.
    pub fn new(codename: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            codename: codename.into(),
            name: name.into(),
            sha: None,
        }
    }

    /// Pins the config to a registry commit.
    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }
}

/// Snapshot of the installer runtime state relevant to bug reports.
///
/// Every field is optional; a default context describes an installer that
/// has not selected a device or OS yet.
#[derive(Debug, Clone, Default)]
pub struct InstallerContext {
    /// Device the installer is currently targeting.
    pub device: Option<DeviceConfig>,
    /// Name of the OS being installed, e.g. `Ubuntu Touch`.
    pub target_os: Option<String>,
    /// Current installer settings, embedded into issue bodies as JSON.
    pub settings: Option<serde_json::Value>,
    /// Whether the device config came from a local file instead of the
    /// remote registry.
    pub local_config: bool,
}

impl InstallerContext {
    /// Sets the targeted device.
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = Some(device);
        self
    }

    /// Sets the OS being installed.
    pub fn with_target_os(mut self, os: impl Into<String>) -> Self {
        self.target_os = Some(os.into());
        self
    }

    /// Sets the installer settings.
    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Marks the device config as coming from a local file.
    pub fn with_local_config(mut self, local: bool) -> Self {
        self.local_config = local;
        self
    }
}

/// Ordered history of errors recorded during the current session.
///
/// Clones share the same history. Lock windows are short and never held
/// across awaits.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ErrorLog {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error to the session history.
    pub fn record(&self, error: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(error.into());
    }

    /// Returns a copy of the history, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
