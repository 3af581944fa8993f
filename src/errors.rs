use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PacknoteError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Could not read {path} as UTF-16 or UTF-8 JSON: {reason}")]
    Encoding { path: PathBuf, reason: String },
    #[error("Unexpected JSON structure: {0}")]
    Structure(String),
    #[error("Operation aborted by the user")]
    Aborted,
    #[error("Could not access {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

impl PacknoteError {
    /// Esc on a prompt is a cancel, not a failure.
    pub fn from_prompt(error: inquire::InquireError) -> Self {
        match error {
            inquire::InquireError::OperationCanceled => Self::Aborted,
            error => Self::Prompt(error),
        }
    }

    pub fn is_cancel(&self) -> bool {
        matches!(
            self,
            Self::Aborted | Self::Prompt(inquire::InquireError::OperationCanceled)
        )
    }

    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
