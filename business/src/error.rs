//! Error taxonomy for backend calls.

use crate::http::HttpError;
use crate::page::ErrorBody;

/// Errors surfaced by the list client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, cancelled).
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The backend answered with a non-2xx status.
    #[error("API returned status {status}: {message}")]
    Status {
        status: u16,
        /// Backend error code (e.g. `ASSET_NOT_FOUND`), when the body carried one.
        code: Option<String>,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to parse {what}: {reason}")]
    Decode { what: &'static str, reason: String },
}

impl ApiError {
    /// Builds a status error, pulling code and message out of the error body when present.
    pub fn from_status(status: u16, body: Option<ErrorBody>) -> Self {
        match body {
            Some(body) => Self::Status {
                status,
                code: Some(body.error.code),
                message: body.error.message,
            },
            None => Self::Status {
                status,
                code: None,
                message: format!("API returned status: {status}"),
            },
        }
    }

    /// Backend error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// A typed API result.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ErrorDetail;

    #[test]
    fn test_status_error_uses_body_code() {
        let body = ErrorBody {
            message: "Request failed".to_owned(),
            error: ErrorDetail {
                message: "Asset not found".to_owned(),
                code: "ASSET_NOT_FOUND".to_owned(),
                details: Vec::new(),
            },
        };

        let err = ApiError::from_status(404, Some(body));
        assert_eq!(err.code(), Some("ASSET_NOT_FOUND"));
        assert_eq!(err.to_string(), "API returned status 404: Asset not found");
    }

    #[test]
    fn test_status_error_without_body() {
        let err = ApiError::from_status(502, None);
        assert!(err.code().is_none());
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_http_error_is_transparent() {
        let err: ApiError = HttpError::new("connection refused").into();
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }
}
