//! Session log retrieval.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from log retrieval.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to read log file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Provides the contents of the current session log.
pub trait LogSource {
    /// Returns the full current log contents.
    async fn current_log(&self) -> Result<String, LogError>;
}

/// Log source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogSource for LogFile {
    async fn current_log(&self) -> Result<String, LogError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LogError::Read {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn log_file_reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "info: flashing boot.img").unwrap();

        let log = LogFile::new(file.path()).current_log().await.unwrap();

        assert_eq!(log, "info: flashing boot.img\n");
    }

    #[tokio::test]
    async fn missing_log_file_reports_its_path() {
        let error = LogFile::new("/nonexistent/bughub.log")
            .current_log()
            .await
            .unwrap_err();

        assert!(error.to_string().contains("/nonexistent/bughub.log"));
    }
}
