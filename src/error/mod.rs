use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiopsError {
    #[error("remote API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("query not found: {0}")]
    NotFound(String),

    #[error("--query and --query-replace cannot be used together")]
    ConflictingEdit,

    #[error("invalid query-replace arguments: {0}")]
    InvalidEditArguments(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BiopsError>;
