//! Unified gateway error types.

use thiserror::Error;

/// OKX codes meaning "try again later" rather than "your request is wrong".
pub(crate) const OKX_TRANSIENT_CODES: &[&str] = &["50001", "50004", "50013", "50026"];

/// Top-level gateway error.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The venue answered, but refused the request.
    #[error("{message}")]
    Venue { code: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0} is not connected")]
    NotConnected(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    pub fn venue(code: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::Venue {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether resending the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Http(e) => e.is_transient(),
            GatewayError::Venue { code, .. } => OKX_TRANSIENT_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl HttpError {
    pub fn is_transient(&self) -> bool {
        match self {
            HttpError::Reqwest(re) => re.is_connect() || re.is_timeout() || re.is_request(),
            HttpError::ServerError { status, .. } => *status >= 500,
            HttpError::RateLimited { .. } | HttpError::Timeout => true,
            _ => false,
        }
    }
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "mongo")]
    #[error("MongoDB: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Environment configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_venue_codes_are_transient() {
        assert!(GatewayError::venue("50013", "Systems are busy").is_transient());
        assert!(!GatewayError::venue("51008", "Insufficient balance").is_transient());
    }

    #[test]
    fn test_http_transience() {
        assert!(HttpError::ServerError {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(HttpError::RateLimited {
            retry_after_ms: None
        }
        .is_transient());
        assert!(!HttpError::BadRequest("nope".into()).is_transient());
        assert!(!HttpError::Unauthorized.is_transient());
    }

    #[test]
    fn test_validation_is_not_transient() {
        assert!(!GatewayError::Validation("x".into()).is_transient());
        assert!(!GatewayError::NotConnected("OKX").is_transient());
    }

    #[test]
    fn test_venue_error_displays_vendor_message() {
        let e = GatewayError::venue("51000", "Parameter sz error");
        assert_eq!(e.to_string(), "Parameter sz error");
    }
}
