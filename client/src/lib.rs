pub mod client;

pub use client::Client;
pub use client::RetryPolicy;
use pcoin_types::ErrorBody;
use thiserror::Error;

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed: {0}")]
    Failed(reqwest::StatusCode),
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
}

impl Error {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::Failed(status) | Error::FailedWithBody { status, .. } => Some(*status),
            Error::Reqwest(err) => err.status(),
            _ => None,
        }
    }

    /// Human-readable message suitable for a notification.
    ///
    /// Prefers the server's `{ "message": ... }` body, then a plain text body,
    /// then the status reason.
    pub fn message(&self) -> String {
        match self {
            Error::FailedWithBody { status, body } => {
                if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
                    return parsed.message;
                }
                let trimmed = body.trim();
                if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.starts_with('{') {
                    return reason(*status);
                }
                trimmed.to_string()
            }
            Error::Failed(status) => reason(*status),
            Error::Reqwest(err) if err.is_connect() => "Unable to reach the server".to_string(),
            Error::Reqwest(err) if err.is_timeout() => "The server took too long to respond".to_string(),
            other => other.to_string(),
        }
    }
}

fn reason(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
