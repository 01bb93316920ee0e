//! # crud-service
//!
//! Generic CRUD over HTTP. Implement [`EntityManager`](manager::EntityManager)
//! for a backing store and get six REST routes for it:
//!
//! | Verb   | Path    | Manager call     | Success |
//! |--------|---------|------------------|---------|
//! | GET    | `/`     | `get_list`       | 200     |
//! | POST   | `/`     | `create`         | 201     |
//! | GET    | `/{id}` | `get`            | 200     |
//! | PUT    | `/{id}` | `update`         | 200     |
//! | PATCH  | `/{id}` | `partial_update` | 204     |
//! | DELETE | `/{id}` | `delete`         | 202     |
//!
//! ## Features
//!
//! - **Pluggable storage**: the handler layer never interprets entities beyond JSON
//! - **Typed identifiers**: TypeID entity IDs with a per-manager prefix
//! - **Merge-patch**: RFC 7386 partial updates
//! - **Middleware stack**: request IDs, sensitive header masking, body limits,
//!   timeouts, compression, CORS, panic recovery
//! - **Graceful shutdown**: SIGTERM and SIGINT
//! - **`mock` feature**: in-memory reference manager
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crud_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let server = Server::new(config);
//!     let app = server.mount(Arc::new(MockManager::new()));
//!
//!     server.serve(app).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod manager;
pub mod middleware;
#[cfg(feature = "mock")]
pub mod mock;
pub mod observability;
pub mod server;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, CrudConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ApiError, ApiErrorKind, ApiOperation, CrudHandlers, CrudOptions, EntityResponse,
    };
    pub use crate::ids::{EntityId, EntityIdError, MakeTypedRequestId, RequestId};
    pub use crate::manager::{
        merge_patch, EntityManager, ListModifiers, ManagerError, ManagerErrorKind,
        ManagerOperation, ManagerResult, PartialUpdateData, RawPayload, RequestContext,
    };
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
        REQUEST_ID_HEADER, SENSITIVE_HEADERS,
    };
    #[cfg(feature = "mock")]
    pub use crate::mock::{MockEntity, MockManager};
    pub use crate::observability::init_tracing;
    pub use crate::server::Server;

    pub use axum::{
        routing::{delete, get, patch, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
}
