use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The backend failed mid-stream or refused the request
    #[error("Backend error: {0}")]
    Backend(String),

    /// The generation was aborted before the backend finished
    #[error("Generation cancelled")]
    Cancelled,

    #[error("Invalid generation options: {0}")]
    InvalidOptions(String),
}

impl GenerationError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
