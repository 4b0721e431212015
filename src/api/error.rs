//! Error types for gateway operations.

use thiserror::Error;

/// Errors that can occur while talking to the video-generation API.
///
/// Display strings are what the error classifier inspects, so they keep stable
/// prefixes (`HTTP error!`, `API error`, `API key`, `API host`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Missing API key or host; raised before any network call.
    #[error("{0}")]
    Configuration(String),

    /// Non-2xx HTTP status.
    #[error("HTTP error! status: {status}, message: {body}")]
    Transport { status: u16, body: String },

    /// Connection-level failure (DNS, refused, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its deadline.
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// 2xx response whose `code` field signals failure.
    #[error("API error ({code}): {message}")]
    Business { code: String, message: String },

    /// 2xx response carrying an `error` field.
    #[error("API error: {0}")]
    Rejected(String),

    /// Body was not JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A required field could not be located in the payload.
    #[error("no {what} found in API response: {payload}{details}")]
    Extraction {
        what: &'static str,
        payload: String,
        details: String,
    },
}

impl ApiError {
    pub fn missing_api_key() -> Self {
        ApiError::Configuration(
            "API key is not configured; set [api] key or VIDNOTE_API_KEY".to_string(),
        )
    }

    pub fn missing_host() -> Self {
        ApiError::Configuration("API host is not configured".to_string())
    }

    /// Classify a reqwest error the way every gateway call does.
    ///
    /// The request URL is dropped from the message: the classifier reads this
    /// text, and a host such as `localhost` must not look like a host error.
    pub fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(timeout_seconds)
        } else {
            ApiError::Network(e.without_url().to_string())
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ApiError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display() {
        let err = ApiError::Transport {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 502, message: bad gateway");
    }

    #[test]
    fn test_business_display() {
        let err = ApiError::Business {
            code: "-1".to_string(),
            message: "insufficient credits".to_string(),
        };
        assert_eq!(err.to_string(), "API error (-1): insufficient credits");
        assert_eq!(
            ApiError::Rejected("model busy".to_string()).to_string(),
            "API error: model busy"
        );
    }

    #[test]
    fn test_configuration_messages() {
        assert!(ApiError::missing_api_key().to_string().contains("API key"));
        assert!(ApiError::missing_host().to_string().contains("API host"));
        assert!(ApiError::missing_host().is_configuration());
    }

    #[test]
    fn test_extraction_display_includes_payload() {
        let err = ApiError::Extraction {
            what: "task id",
            payload: "{\"code\":0}".to_string(),
            details: "\ncode: 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no task id found in API response: {\"code\":0}\ncode: 0"
        );
    }
}
