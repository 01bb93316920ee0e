//! API error types for CRUD handler operations
//!
//! This module provides structured error types for the CRUD handlers,
//! with automatic HTTP status code mapping via `IntoResponse`.
//!
//! # Example
//!
//! ```rust
//! use crud_service::handlers::{ApiError, ApiErrorKind, ApiOperation};
//!
//! let error = ApiError::not_found(ApiOperation::Get, "ent_01h455vb4pex5vsknk084sn02q");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id.as_deref(), Some("ent_01h455vb4pex5vsknk084sn02q"));
//! ```

use std::fmt;

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::manager::{ManagerError, ManagerErrorKind, ManagerOperation};

/// Message returned to clients for every 500
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing entities
    List,
    /// Getting a single entity by ID
    Get,
    /// Creating a new entity
    Create,
    /// Replacing an entity (PUT)
    Replace,
    /// Merge-patching an entity (PATCH)
    PartialUpdate,
    /// Deleting an entity
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Replace => write!(f, "replace"),
            Self::PartialUpdate => write!(f, "partial_update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl From<ManagerOperation> for ApiOperation {
    fn from(op: ManagerOperation) -> Self {
        match op {
            ManagerOperation::Create => Self::Create,
            ManagerOperation::Get => Self::Get,
            ManagerOperation::GetList => Self::List,
            ManagerOperation::Update => Self::Replace,
            ManagerOperation::PartialUpdate => Self::PartialUpdate,
            ManagerOperation::Delete => Self::Delete,
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Malformed identifier or payload, or a payload the manager rejected
    BadRequest,
    /// Entity was not found, or a list came back empty
    NotFound,
    /// Access denied
    Forbidden,
    /// Request body exceeds the configured limit
    PayloadTooLarge,
    /// Internal server error
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::PayloadTooLarge => write!(f, "payload_too_large"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }
}

impl From<ManagerErrorKind> for ApiErrorKind {
    fn from(kind: ManagerErrorKind) -> Self {
        match kind {
            ManagerErrorKind::NotFound => Self::NotFound,
            ManagerErrorKind::Forbidden => Self::Forbidden,
            ManagerErrorKind::BadRequest => Self::BadRequest,
            ManagerErrorKind::Internal => Self::InternalError,
        }
    }
}

/// Structured API error with operation context
///
/// Rendered as `{"error", "message", "status", "operation", "entity_id"}`.
/// The request ID is only used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
    /// The `x-request-id` of the failed request
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_id: None,
            request_id: None,
        }
    }

    /// Create a "not found" error for an entity
    pub fn not_found(operation: ApiOperation, entity_id: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::NotFound, "Entity not found").with_entity_id(entity_id)
    }

    /// Create a bad request error
    ///
    /// ```rust
    /// use crud_service::handlers::{ApiError, ApiOperation};
    ///
    /// let error = ApiError::bad_request(ApiOperation::Create, "Body is not valid JSON");
    /// assert_eq!(error.kind.status_code(), 400);
    /// ```
    pub fn bad_request(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::BadRequest, message)
    }

    /// Create a forbidden error
    pub fn forbidden(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Forbidden, message)
    }

    /// Create a payload too large error
    pub fn payload_too_large(operation: ApiOperation) -> Self {
        Self::new(
            operation,
            ApiErrorKind::PayloadTooLarge,
            "Request body exceeds the size limit",
        )
    }

    /// Create an internal error; the client only sees the generic message
    pub fn internal(operation: ApiOperation) -> Self {
        Self::new(operation, ApiErrorKind::InternalError, INTERNAL_ERROR_MESSAGE)
    }

    /// Classify a body extraction failure
    pub fn from_body_rejection(operation: ApiOperation, rejection: &BytesRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::payload_too_large(operation),
            status if status.is_client_error() => {
                Self::bad_request(operation, rejection.body_text())
            }
            _ => Self::internal(operation),
        }
    }

    /// Attach the identifier of the entity involved
    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Attach the request ID for the log line
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<&str>) -> Self {
        self.request_id = request_id.map(str::to_string);
        self
    }

    /// HTTP status of this error
    pub fn status(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref entity_id) = self.entity_id {
            write!(f, " [{}]", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<&ManagerError> for ApiError {
    fn from(err: &ManagerError) -> Self {
        let kind = ApiErrorKind::from(err.kind);

        // Don't expose internal details
        let message = match kind {
            ApiErrorKind::InternalError => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => err.message.clone(),
        };

        Self {
            operation: err.operation.into(),
            kind,
            message,
            entity_id: err.entity_id.clone(),
            request_id: None,
        }
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        Self::from(&err)
    }
}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Upper-case error code, e.g. `NOT_FOUND`
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// HTTP status code
    pub status: u16,
    /// Operation that failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Entity involved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                status = status.as_u16(),
                entity_id = ?self.entity_id,
                request_id = ?self.request_id,
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                status = status.as_u16(),
                entity_id = ?self.entity_id,
                request_id = ?self.request_id,
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.kind.error_code(),
            message: self.message,
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_kind_status_codes() {
        assert_eq!(ApiErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiErrorKind::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiErrorKind::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiErrorKind::NotFound.error_code(), "NOT_FOUND");
        assert_eq!(ApiErrorKind::PayloadTooLarge.error_code(), "PAYLOAD_TOO_LARGE");
        assert_eq!(ApiErrorKind::InternalError.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(ApiOperation::List.to_string(), "list");
        assert_eq!(ApiOperation::Replace.to_string(), "replace");
        assert_eq!(ApiOperation::PartialUpdate.to_string(), "partial_update");
    }

    #[test]
    fn test_from_manager_error() {
        let cases = [
            (ManagerErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ManagerErrorKind::Forbidden, StatusCode::FORBIDDEN),
            (ManagerErrorKind::BadRequest, StatusCode::BAD_REQUEST),
            (ManagerErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in cases {
            let err = ManagerError::new(ManagerOperation::Update, kind, "boom");
            let api = ApiError::from(&err);
            assert_eq!(api.status(), status);
            assert_eq!(api.operation, ApiOperation::Replace);
        }
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = ManagerError::internal(ManagerOperation::Create, "pg: relation does not exist");
        let api = ApiError::from(err);
        assert_eq!(api.message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_entity_id_carried() {
        let err = ManagerError::not_found(ManagerOperation::Delete, "ent_1");
        let api = ApiError::from(&err);
        assert_eq!(api.entity_id.as_deref(), Some("ent_1"));
        assert_eq!(api.operation, ApiOperation::Delete);
    }

    #[test]
    fn test_display() {
        let error = ApiError::not_found(ApiOperation::Get, "ent_1");
        assert_eq!(
            error.to_string(),
            "API not_found error during get: Entity not found [ent_1]"
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::not_found(ApiOperation::Delete, "ent_1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Entity not found");
        assert_eq!(json["status"], 404);
        assert_eq!(json["operation"], "delete");
        assert_eq!(json["entity_id"], "ent_1");
    }

    #[tokio::test]
    async fn test_into_response_omits_missing_entity() {
        let response = ApiError::internal(ApiOperation::List).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 500);
        assert!(json.get("entity_id").is_none());
    }
}
