//! `TvssError` - classified failures of the TVSS client.

use thiserror::Error;

/// Result alias for TVSS operations.
pub type Result<T> = std::result::Result<T, TvssError>;

/// Errors returned by `TvssClient` and the `TvssApi` operations.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TvssError {
    /// A call-sign-scoped endpoint was requested without a configured call sign.
    #[error("a call sign is required but not configured")]
    CallSignRequired,

    /// The service answered HTTP 403 (missing or invalid API key).
    #[error("an API key is required but not configured or was rejected (HTTP 403)")]
    ApiKeyRequired,

    /// Caller-supplied options are invalid; raised before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request completed with a status other than 200.
    #[error("unexpected response: HTTP {status} {reason}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
    },

    /// The transport failed before a usable response was received.
    #[error("request failed: {path}")]
    RequestFailed {
        /// Request path (without base URL).
        path: String,
        /// HTTP status, when the transport reported one.
        status: Option<u16>,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not valid JSON or does not fit the expected view.
    #[error("failed to decode JSON response: {path}")]
    Decode {
        /// Request path (without base URL).
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// An expected top-level field is absent from the response.
    #[error("response for {path} is missing field `{field}`")]
    MissingField {
        /// Request path (without base URL).
        path: String,
        /// Name of the absent field.
        field: &'static str,
    },

    /// A URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),
}

impl TvssError {
    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ApiKeyRequired => Some(403),
            Self::UnexpectedResponse { status, .. } => Some(*status),
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` for errors caused by the caller's input or configuration,
    /// detected before any request was sent.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::CallSignRequired | Self::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_unexpected_response() {
        // Arrange
        let err = TvssError::UnexpectedResponse {
            status: 204,
            reason: String::from("No Content"),
        };

        // Act & Assert
        assert_eq!(err.status(), Some(204));
        assert_eq!(err.to_string(), "unexpected response: HTTP 204 No Content");
    }

    #[test]
    fn test_status_of_api_key_required() {
        // Arrange & Act & Assert
        assert_eq!(TvssError::ApiKeyRequired.status(), Some(403));
    }

    #[test]
    fn test_caller_errors() {
        // Arrange & Act & Assert
        assert!(TvssError::CallSignRequired.is_caller_error());
        assert!(TvssError::InvalidArgument(String::from("x")).is_caller_error());
        assert!(!TvssError::ApiKeyRequired.is_caller_error());
        assert_eq!(TvssError::CallSignRequired.status(), None);
    }

    #[test]
    fn test_missing_field_message() {
        // Arrange
        let err = TvssError::MissingField {
            path: String::from("kctsdt/today"),
            field: "feeds",
        };

        // Act & Assert
        assert_eq!(
            err.to_string(),
            "response for kctsdt/today is missing field `feeds`"
        );
    }
}
