//! HTTP handlers for entity managers
//!
//! [`CrudHandlers`] turns any [`EntityManager`](crate::manager::EntityManager)
//! into six axum routes. Errors are rendered as [`ApiError`] JSON bodies and
//! successes through the types in this module.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crud_service::handlers::{CrudHandlers, CrudOptions};
//!
//! let crud = CrudHandlers::new(Arc::new(manager)).with_options(CrudOptions {
//!     empty_list_as_ok: true,
//!     ..Default::default()
//! });
//!
//! // Mount everything under /orders
//! let app = Router::new().nest("/orders", crud.router());
//!
//! // Or pick individual routes
//! let read_only = Router::new()
//!     .route("/", crud.list())
//!     .route("/{id}", crud.get());
//! ```

mod crud;
mod decode;
mod error;
mod response;

pub use crud::{CrudHandlers, CrudOptions};
pub use decode::{decode_entity, decode_patch};
pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation, INTERNAL_ERROR_MESSAGE};
pub use response::{Accepted, EntityResponse, NoContent};
