use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("not found")]
    NotFound,

    #[error("company with the given name already exists")]
    AlreadyExists,

    #[error("invalid filter expression: {0}")]
    Filter(#[from] cfql_core::CfqlError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("forbidden")]
    Forbidden,

    #[error("Operation not supported: {0}")]
    OperationNotSupported(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl serde::Serialize for DbError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Convert DbError to HTTP response
impl IntoResponse for DbError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DbError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            DbError::AlreadyExists => (StatusCode::CONFLICT, self.to_string()),
            DbError::Filter(_) | DbError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            DbError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            DbError::OperationNotSupported(_) => (StatusCode::NOT_IMPLEMENTED, self.to_string()),
            DbError::Sqlx(_) | DbError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DbError::NotFound;
        assert_eq!(err.to_string(), "not found");

        let err = DbError::AlreadyExists;
        assert_eq!(err.to_string(), "company with the given name already exists");

        let err = DbError::BadRequest("id mismatch".to_string());
        assert_eq!(err.to_string(), "Bad Request: id mismatch");

        let err = DbError::Internal("lookup failed".to_string());
        assert_eq!(err.to_string(), "Internal error: lookup failed");
    }

    #[test]
    fn test_filter_error_conversion() {
        let err = DbError::from(cfql_core::CfqlError::UnknownField("brand".to_string()));
        assert_eq!(
            err.to_string(),
            "invalid filter expression: unknown field: \"brand\""
        );
    }
}
