//! Example: Serving the in-memory manager
//!
//! Mounts `MockManager` under `crud.base_path` (default `/e`) with the full
//! middleware stack.
//!
//! Run with: cargo run --example mock-server
//!
//! ```bash
//! curl -s -X POST localhost:8080/e -d '{"status_id": 1}'
//! curl -s localhost:8080/e
//! curl -s -X PATCH localhost:8080/e/<id> \
//!      -H 'content-type: application/merge-patch+json' -d '{"status_id": 2}'
//! curl -s -X DELETE localhost:8080/e/<id>
//! ```
//!
//! Override settings through the environment, e.g.
//! `CRUD_SERVICE__PORT=9000 CRUD_CRUD__EMPTY_LIST_AS_OK=true`.

use std::sync::Arc;

use crud_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_for_service("mock-server")?;
    init_tracing(&config)?;

    let manager = Arc::new(MockManager::new());
    let server = Server::new(config);
    let app = server.mount(manager);

    server.serve(app).await
}
