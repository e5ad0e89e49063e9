use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadarError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider error (status {status}): {detail}")]
    Provider { status: u16, detail: String },

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, RadarError>;
