use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Clone failed (network, auth, unknown repository, timeout)
    #[error("Failed to fetch repository {url}: {message}")]
    RepositoryFetch { url: String, message: String },

    /// Default branch or its head commit could not be determined
    #[error("Could not resolve branch: {0}")]
    BranchResolution(String),

    /// The working tree root itself is unreadable
    #[error("Cannot walk {}: {source}", .path.display())]
    WalkRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl IngestError {
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RepositoryFetch {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn branch(message: impl Into<String>) -> Self {
        Self::BranchResolution(message.into())
    }
}
