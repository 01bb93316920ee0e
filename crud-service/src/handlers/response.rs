//! Success responses for the CRUD handlers
//!
//! - **200 OK** - GET one, GET list, PUT
//! - **201 Created** - POST
//! - **202 Accepted** - DELETE, no body
//! - **204 No Content** - PATCH, no body
//!
//! Entity bodies are serialized here rather than through `axum::Json` so a
//! value that cannot be rendered becomes a logged, structured 500 for that
//! request instead of a plain-text one.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::{ApiError, ApiOperation};

const JSON_CONTENT_TYPE: &str = "application/json";

/// JSON entity (or list of entities) with a success status
#[derive(Debug)]
pub struct EntityResponse<T> {
    status: StatusCode,
    operation: ApiOperation,
    data: T,
}

impl<T> EntityResponse<T> {
    /// 200 OK
    pub fn ok(operation: ApiOperation, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            operation,
            data,
        }
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            operation: ApiOperation::Create,
            data,
        }
    }

    /// Status the response will carry if rendering succeeds
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for EntityResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.data) {
            Ok(body) => (
                self.status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(
                    operation = %self.operation,
                    error = %err,
                    "Failed to render response body"
                );
                ApiError::internal(self.operation).into_response()
            }
        }
    }
}

/// HTTP 202 Accepted with an empty body
#[derive(Debug, Clone, Copy)]
pub struct Accepted;

impl IntoResponse for Accepted {
    fn into_response(self) -> Response {
        StatusCode::ACCEPTED.into_response()
    }
}

/// HTTP 204 No Content
#[derive(Debug, Clone, Copy)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
