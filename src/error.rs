use reqwest::StatusCode;
use thiserror::Error;

/// Remote error code returned when a counterparty does not exist.
pub const COUNTERPARTY_NOT_FOUND: u32 = 3006;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Revolut API error ({status}): {message}")]
    Api {
        status: StatusCode,
        code: Option<u32>,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// HTTP status of a remote failure, if this is one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Numeric business code from the remote error body
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::Api { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let err = Error::Api {
            status: StatusCode::NOT_FOUND,
            code: Some(COUNTERPARTY_NOT_FOUND),
            message: "Counterparty not found".to_string(),
        };

        assert_eq!(err.code(), Some(3006));
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert_eq!(
            err.to_string(),
            "Revolut API error (404 Not Found): Counterparty not found"
        );
    }

    #[test]
    fn test_non_api_error_has_no_code() {
        let err = Error::Config("missing".to_string());
        assert_eq!(err.code(), None);
        assert_eq!(err.status(), None);
    }
}
