//! Log upload to a paste service.
//!
//! Talks to a Stikked-compatible endpoint: `POST <base>/api/create` with a
//! form body, answered with the paste URL as plain text (or an error
//! message, which Stikked also serves with status 200).

use thiserror::Error;

/// Errors from the paste upload.
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("paste upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("paste service rejected the upload: {0}")]
    Rejected(String),
}

/// Uploads text and returns a public URL for it.
pub trait PasteClient {
    /// Uploads `text` under `title`, returning the paste URL.
    async fn upload(&self, title: &str, text: &str) -> Result<String, PasteError>;
}

/// Client for a Stikked-compatible paste service.
#[derive(Debug, Clone)]
pub struct Pastebin {
    base_url: String,
    client: reqwest::Client,
}

impl Pastebin {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl PasteClient for Pastebin {
    async fn upload(&self, title: &str, text: &str) -> Result<String, PasteError> {
        let response = self
            .client
            .post(format!("{}/api/create", self.base_url))
            .form(&[
                ("title", title),
                ("text", text),
                ("name", env!("CARGO_PKG_NAME")),
                ("lang", "text"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_response(&response)
    }
}

/// Extracts the paste URL from a Stikked `api/create` response body.
fn parse_response(body: &str) -> Result<String, PasteError> {
    let reply = body.trim();
    if reply.starts_with("http://") || reply.starts_with("https://") {
        Ok(reply.to_string())
    } else {
        Err(PasteError::Rejected(reply.to_string()))
    }
}
