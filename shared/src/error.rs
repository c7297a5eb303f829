use lambda_http::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("table service error (status {status:?}): {message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    #[error("query cancelled before completion")]
    Cancelled,
}

impl TableError {
    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// HTTP status reported by the service, if a response was received at all.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Service {
                status: Some(status),
                ..
            } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }
}
