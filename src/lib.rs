//! Bughub - bug reporting for a desktop device installer
//!
//! Collects environment and device metadata, renders a GitHub issue body,
//! uploads the session log to a paste service and opens the user's browser
//! on a prefilled "new issue" page.
//!
//! # Features
//!
//! - Declarative report forms, rendered by any front end
//! - Host environment detection with graceful degradation
//! - Issue-title scrubbing of local cache paths
//! - Stikked-compatible paste upload for session logs
//!
//! # Example
//!
//! ```rust,no_run
//! use bughub::{DefaultReporter, DeviceConfig, InstallerContext, ReportConfig, ReportResult};
//!
//! #[tokio::main]
//! async fn main() {
//!     let context = InstallerContext::default()
//!         .with_device(DeviceConfig::new("yggdrasil", "Volla Phone"))
//!         .with_target_os("Ubuntu Touch");
//!     let reporter = DefaultReporter::new(ReportConfig::default(), context);
//!
//!     reporter.report(ReportResult::Fail, Some("flashing failed")).await;
//! }
//! ```

// Collaborator traits declare bare `async fn`: report pipelines are awaited
// on the caller's task and never spawned, so no Send bound is imposed.
#![allow(async_fn_in_trait)]

pub mod browser;
pub mod context;
pub mod environment;
pub mod form;
pub mod issue;
pub mod logs;
pub mod paste;
pub mod prompt;
pub mod report;

pub use browser::{BrowserOpener, SystemBrowser};
pub use context::{DeviceConfig, ErrorLog, InstallerContext};
pub use environment::{host_display_name, EnvironmentProbe, OsEnvironment};
pub use form::{FieldKind, FormDescriptor, FormField, ReportData, ReportExtra};
pub use issue::IssueTemplate;
pub use logs::{LogFile, LogSource};
pub use paste::{PasteClient, Pastebin};
pub use prompt::{ReportPrompt, TerminalPrompt};
pub use report::{DefaultReporter, ReportError, ReportOutcome, ReportResult, Reporter};

/// Configuration for the bug-report pipeline.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Application name, used as the first line of the issue body.
    pub app_name: String,
    /// Application version.
    pub app_version: String,
    /// Installation medium the application was obtained from.
    pub package: String,
    /// GitHub repository receiving the issues (`owner/name`).
    pub repo: String,
    /// GitHub repository holding the device config registry (`owner/name`).
    pub registry_repo: String,
    /// Base URL of the device lookup site.
    pub device_lookup_url: String,
    /// Target OS name the lookup site covers; device links only carry a
    /// lookup-site link when the OS being installed matches this name.
    pub lookup_os_name: String,
    /// Paste service API base URL.
    pub paste_url: String,
    /// Local cache directory; its absolute path is scrubbed from issue
    /// titles.
    pub cache_dir: std::path::PathBuf,
    /// Path of the current session log file.
    pub log_file: std::path::PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let cache_dir = std::env::temp_dir().join("bughub");
        let log_file = cache_dir.join("bughub.log");
        Self {
            app_name: "UBports Installer".into(),
            app_version: env!("CARGO_PKG_VERSION").into(),
            package: "source".into(),
            repo: "ubports/ubports-installer".into(),
            registry_repo: "ubports/installer-configs".into(),
            device_lookup_url: "https://devices.ubuntu-touch.io/device".into(),
            lookup_os_name: "Ubuntu Touch".into(),
            paste_url: "https://paste.ubports.com".into(),
            cache_dir,
            log_file,
        }
    }
}
