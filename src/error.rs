use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream {url} answered with status {status}")]
    Upstream { status: u16, url: String },

    #[error("malformed kline at row {row}: {reason}")]
    MalformedKline { row: usize, reason: String },

    #[error("feed error: {0}")]
    Feed(String),

    #[error("invalid value for {key}: {reason}")]
    Config { key: &'static str, reason: String },
}
