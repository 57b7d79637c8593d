use thiserror::Error;
use tracing::error;

use crate::models::{AssetAction, AssetStatus, RecordId};

/// Failure talking to the registry API.
///
/// Every variant is the same thing to a caller: the remote operation did not
/// succeed. They are kept apart so the cause can be logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status returned by the server, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to {operation}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Cannot {action} asset {asset_id} while it is {status}")]
    InvalidTransition {
        asset_id: RecordId,
        action: AssetAction,
        status: AssetStatus,
    },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// True when the remote call itself failed, as opposed to a local check.
    pub fn is_operation_failure(&self) -> bool {
        matches!(self, ServiceError::OperationFailed { .. })
    }
}

/// Maps a client failure to the operation the caller attempted, logging it
/// at the call site.
pub(crate) trait OperationResultExt<T> {
    fn or_failed(self, operation: &'static str) -> Result<T, ServiceError>;
}

impl<T> OperationResultExt<T> for Result<T, ApiError> {
    fn or_failed(self, operation: &'static str) -> Result<T, ServiceError> {
        self.map_err(|source| {
            error!(
                operation,
                status = ?source.status(),
                error = %source,
                "registry operation failed"
            );
            ServiceError::OperationFailed { operation, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_failed_message_names_the_operation() {
        let err: Result<(), ApiError> = Err(ApiError::Server {
            status: 500,
            message: "boom".into(),
        });
        let err = err.or_failed("issue asset").unwrap_err();
        assert_eq!(err.to_string(), "Failed to issue asset");
        assert!(err.is_operation_failure());
    }

    #[test]
    fn server_status_is_exposed() {
        let err = ApiError::Server {
            status: 404,
            message: "missing".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(ApiError::Decode("bad".into()).status(), None);
    }

    #[test]
    fn invalid_transition_renders_action_and_status() {
        let err = ServiceError::InvalidTransition {
            asset_id: 7,
            action: AssetAction::Issue,
            status: AssetStatus::Scrapped,
        };
        assert_eq!(err.to_string(), "Cannot issue asset 7 while it is scrapped");
        assert!(!err.is_operation_failure());
    }
}
