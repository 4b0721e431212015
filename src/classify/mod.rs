//! Maps raw error text to user-facing categories.
//!
//! Matching is substring containment in a fixed priority order. Messages often
//! contain several matchable fragments (`HTTP error! status: 401` is both a
//! transport error and an auth failure), so the first matching rule wins.

use std::fmt;

/// User-facing error category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    InsufficientBalance,
    Authentication,
    Host,
    Network,
    /// Business error with its prefix stripped
    Api(String),
    /// Unrecognised; the original text
    Other(String),
}

impl ErrorCategory {
    /// Short machine-readable name, used in logs and `--json` output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InsufficientBalance => "insufficient_balance",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Host => "host",
            ErrorCategory::Network => "network",
            ErrorCategory::Api(_) => "api",
            ErrorCategory::Other(_) => "other",
        }
    }

    /// Text shown to the user.
    pub fn user_message(&self) -> &str {
        match self {
            ErrorCategory::InsufficientBalance => {
                "Insufficient account balance, please top up and try again"
            }
            ErrorCategory::Authentication => {
                "API key is invalid or missing, check the key in your settings"
            }
            ErrorCategory::Host => "API host is misconfigured, check the host address in your settings",
            ErrorCategory::Network => {
                "Network connection error, check your connection or try again later"
            }
            ErrorCategory::Api(message) | ErrorCategory::Other(message) => message,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

const BALANCE_MARKERS: &[&str] = &["insufficient credits", "insufficient balance", "余额不足"];
const AUTH_MARKERS: &[&str] = &["API key", "unauthorized", "401"];
const HOST_MARKERS: &[&str] = &["API host", "host", "404"];
const NETWORK_MARKERS: &[&str] = &["HTTP error", "network", "timeout"];
const API_MARKER: &str = "API error";

fn contains_any(message: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| message.contains(m))
}

/// Classify a raw error message.
pub fn classify(message: &str) -> ErrorCategory {
    if contains_any(message, BALANCE_MARKERS) {
        ErrorCategory::InsufficientBalance
    } else if contains_any(message, AUTH_MARKERS) {
        ErrorCategory::Authentication
    } else if contains_any(message, HOST_MARKERS) {
        ErrorCategory::Host
    } else if contains_any(message, NETWORK_MARKERS) {
        ErrorCategory::Network
    } else if message.contains(API_MARKER) {
        ErrorCategory::Api(strip_api_prefix(message))
    } else {
        ErrorCategory::Other(message.to_string())
    }
}

/// Classify any error by its display text.
pub fn classify_error(error: &dyn std::error::Error) -> ErrorCategory {
    classify(&error.to_string())
}

/// `API error: msg` becomes `msg`; `API error (code): msg` becomes `code: msg`.
fn strip_api_prefix(message: &str) -> String {
    message
        .replacen("API error: ", "", 1)
        .replacen("API error (", "", 1)
        .replacen("): ", ": ", 1)
}
