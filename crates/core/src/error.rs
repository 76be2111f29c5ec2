use thiserror::Error;

#[derive(Error, Debug)]
pub enum AstgenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid pattern: {0}")]
    Pattern(String),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for AstgenError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        AstgenError::Parsing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AstgenError>;
