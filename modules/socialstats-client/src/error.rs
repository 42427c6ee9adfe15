use thiserror::Error;

pub type Result<T> = std::result::Result<T, SocialStatsError>;

#[derive(Debug, Error)]
pub enum SocialStatsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("API meta code {0}")]
    Meta(i64),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SocialStatsError {
    fn from(err: reqwest::Error) -> Self {
        SocialStatsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SocialStatsError {
    fn from(err: serde_json::Error) -> Self {
        SocialStatsError::Parse(err.to_string())
    }
}
