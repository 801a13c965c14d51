use std::io;
use thiserror::Error;

/// Custom error type for hwmon-charts
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Server rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Result type alias for hwmon-charts
pub type Result<T> = std::result::Result<T, ChartError>;

impl ChartError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ChartError::Config(msg.into())
    }

    /// Create a surface acquisition error
    pub fn surface_unavailable<S: Into<String>>(msg: S) -> Self {
        ChartError::SurfaceUnavailable(msg.into())
    }
}
