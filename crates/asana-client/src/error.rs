//! # Client Error Types
//!
//! Unified error handling for Asana REST calls and configuration loading.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP status Asana returns for features gated behind a paid plan.
pub const PAYMENT_REQUIRED: u16 = 402;

/// Comprehensive error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An id that cannot address a resource (empty, `.` or `..`).
    #[error("invalid Asana id: {0:?}")]
    InvalidId(String),

    /// Non-2xx response from the Asana API.
    #[error("Asana API error ({status}): {}", summarize(.messages))]
    Remote { status: u16, messages: Vec<String> },

    /// 402 from a dependency endpoint: the workspace is on a free plan.
    #[error(
        "Asana API error ({status}): {} (task dependencies require a premium Asana account)",
        summarize(.messages)
    )]
    PremiumRequired { status: u16, messages: Vec<String> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn summarize(messages: &[String]) -> &str {
    messages
        .first()
        .map(String::as_str)
        .unwrap_or("no error message returned")
}

impl ClientError {
    /// Create a remote error with a single message
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            messages: vec![message.into()],
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Build a remote error from a failed response body.
    ///
    /// Asana reports failures as `{"errors": [{"message": ...}, ...]}`. When the
    /// body does not follow that shape the trimmed body text becomes the only
    /// message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut messages: Vec<String> = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("errors").and_then(|e| e.as_array()).cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
            .map(str::to_string)
            .collect();

        if messages.is_empty() {
            let trimmed = body.trim();
            if !trimmed.is_empty() {
                messages.push(trimmed.to_string());
            }
        }

        Self::Remote { status, messages }
    }

    /// Reclassify a 402 as [`ClientError::PremiumRequired`].
    ///
    /// Applied only on dependency endpoints, where 402 has exactly one meaning.
    #[must_use]
    pub fn premium_gated(self) -> Self {
        match self {
            Self::Remote { status, messages } if status == PAYMENT_REQUIRED => {
                Self::PremiumRequired { status, messages }
            }
            other => other,
        }
    }

    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } | Self::PremiumRequired { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Messages reported by the service (empty for local failures).
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Remote { messages, .. } | Self::PremiumRequired { messages, .. } => messages,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_premium_required(&self) -> bool {
        matches!(self, Self::PremiumRequired { .. })
    }
}
