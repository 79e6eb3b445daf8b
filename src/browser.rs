//! Opening the issue URL in the user's browser.

use thiserror::Error;

/// Errors from launching the browser.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to open browser: {0}")]
    Open(#[from] std::io::Error),
}

/// Opens a URL in some user-visible browser.
pub trait BrowserOpener {
    /// Opens the URL. Fire and forget: a successful return means the
    /// launch succeeded, not that the page loaded.
    fn open(&self, url: &str) -> Result<(), BrowserError>;
}

/// Opener backed by the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), BrowserError> {
        // Detached so the installer never waits on (or kills) the browser.
        open::that_detached(url)?;
        Ok(())
    }
}
