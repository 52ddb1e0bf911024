//! # Client Errors
//!
//! Failures talking to the tutorials API, separated by where they
//! happened: building the URL, the transport, a non-success response, or
//! decoding the body.

use thiserror::Error;

/// Errors returned by [`crate::client::TutorialClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// The base URL or a derived endpoint URL is invalid.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request could not be sent or the response could not be read.
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{endpoint} returned {status} {code}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        code: String,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API reported the tutorial as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_status_and_message() {
        let err = ClientError::Api {
            endpoint: "GET /api/tutorials/1".into(),
            status: 404,
            code: "NOT_FOUND".into(),
            message: "tutorial 1 not found".into(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("NOT_FOUND"));
        assert!(text.contains("tutorial 1 not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn url_errors_have_no_status() {
        let err = ClientError::from(url::Url::parse("not a url").unwrap_err());
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }
}
