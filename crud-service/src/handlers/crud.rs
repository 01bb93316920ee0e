//! HTTP handlers binding an [`EntityManager`] to REST routes
//!
//! | Verb   | Path    | Success                 |
//! |--------|---------|-------------------------|
//! | GET    | `/`     | 200, JSON array         |
//! | POST   | `/`     | 201, created entity     |
//! | GET    | `/{id}` | 200, entity             |
//! | PUT    | `/{id}` | 200, replaced entity    |
//! | PATCH  | `/{id}` | 204                     |
//! | DELETE | `/{id}` | 202                     |
//!
//! Malformed identifiers and bodies are answered with 400 before the manager
//! is called. Manager failures go through
//! [`EntityManager::map_error_to_http_error`], except for create which
//! answers 500 unless [`CrudOptions::map_create_errors`] is set.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    routing::{self, MethodRouter},
    Router,
};

use super::decode::{decode_entity, decode_patch};
use super::error::{ApiError, ApiErrorKind, ApiOperation};
use super::response::{Accepted, EntityResponse, NoContent};
use crate::ids::EntityId;
use crate::manager::{EntityManager, ListModifiers, ManagerError, RawPayload, RequestContext};

/// Behavior switches for the CRUD handlers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrudOptions {
    /// Render an empty list (a `NotFound` from `get_list`) as `200 []`
    pub empty_list_as_ok: bool,
    /// Classify create failures with the manager instead of always 500
    pub map_create_errors: bool,
}

/// Route handlers for one entity manager
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use crud_service::handlers::CrudHandlers;
///
/// let crud = CrudHandlers::new(Arc::new(OrderManager::connect().await?));
///
/// let app = Router::new()
///     .nest("/orders", crud.router())
///     .route("/health", get(health));
/// ```
pub struct CrudHandlers<M> {
    manager: Arc<M>,
    options: CrudOptions,
}

impl<M> Clone for CrudHandlers<M> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            options: self.options,
        }
    }
}

impl<M: EntityManager> CrudHandlers<M> {
    /// Handlers with default options
    pub fn new(manager: Arc<M>) -> Self {
        Self {
            manager,
            options: CrudOptions::default(),
        }
    }

    /// Replace the handler options
    #[must_use]
    pub fn with_options(mut self, options: CrudOptions) -> Self {
        self.options = options;
        self
    }

    /// The shared manager
    pub fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    /// Current options
    pub fn options(&self) -> CrudOptions {
        self.options
    }

    /// `GET /{id}`
    pub fn get<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        routing::get(get_entity::<M>).with_state(self.clone())
    }

    /// `GET /`, query parameters become [`ListModifiers`]
    pub fn list<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        routing::get(list_entities::<M>).with_state(self.clone())
    }

    /// `POST /`
    pub fn create<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        routing::post(create_entity::<M>).with_state(self.clone())
    }

    /// `PUT /{id}`
    pub fn replace<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        routing::put(replace_entity::<M>).with_state(self.clone())
    }

    /// `PATCH /{id}` with a merge-patch body
    pub fn partial_update<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        routing::patch(patch_entity::<M>).with_state(self.clone())
    }

    /// `DELETE /{id}`
    pub fn delete<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        routing::delete(delete_entity::<M>).with_state(self.clone())
    }

    /// All six routes, ready to be nested under a base path
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new()
            .route("/", self.list().merge(self.create()))
            .route(
                "/{id}",
                self.get()
                    .merge(self.replace())
                    .merge(self.partial_update())
                    .merge(self.delete()),
            )
    }

    fn manager_error(
        &self,
        ctx: &RequestContext,
        operation: ApiOperation,
        id: Option<&EntityId>,
        err: &ManagerError,
    ) -> ApiError {
        let mut api = if operation == ApiOperation::Create && !self.options.map_create_errors {
            ApiError::internal(operation)
        } else {
            self.manager.map_error_to_http_error(err)
        };

        if api.kind == ApiErrorKind::InternalError {
            tracing::error!(
                operation = %operation,
                request_id = ctx.request_id(),
                error = %err,
                "Entity manager failed"
            );
        }

        if api.entity_id.is_none() {
            if let Some(id) = id {
                api = api.with_entity_id(id.as_str());
            }
        }

        api.with_operation(operation)
            .with_request_id(ctx.request_id())
    }
}

fn parse_id<M: EntityManager>(
    ctx: &RequestContext,
    operation: ApiOperation,
    path: Result<Path<String>, PathRejection>,
) -> Result<EntityId, ApiError> {
    let Path(raw) = path.map_err(|rejection| {
        ApiError::bad_request(operation, rejection.body_text()).with_request_id(ctx.request_id())
    })?;

    EntityId::parse(&raw, M::ID_PREFIX).map_err(|err| {
        ApiError::bad_request(operation, format!("Invalid entity ID: {}", err))
            .with_entity_id(raw)
            .with_request_id(ctx.request_id())
    })
}

fn read_body(
    ctx: &RequestContext,
    operation: ApiOperation,
    body: Result<Bytes, BytesRejection>,
) -> Result<RawPayload, ApiError> {
    body.map(RawPayload::from).map_err(|rejection| {
        ApiError::from_body_rejection(operation, &rejection).with_request_id(ctx.request_id())
    })
}

fn invalid_body(ctx: &RequestContext, operation: ApiOperation, err: serde_json::Error) -> ApiError {
    ApiError::bad_request(operation, format!("Invalid request body: {}", err))
        .with_request_id(ctx.request_id())
}

async fn get_entity<M: EntityManager>(
    State(crud): State<CrudHandlers<M>>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<EntityResponse<M::Entity>, ApiError> {
    let operation = ApiOperation::Get;
    let id = parse_id::<M>(&ctx, operation, path)?;

    let entity = crud
        .manager
        .get(&ctx, &id)
        .await
        .map_err(|err| crud.manager_error(&ctx, operation, Some(&id), &err))?;

    tracing::debug!(
        operation = %operation,
        request_id = ctx.request_id(),
        entity_id = %id,
        status = 200,
        "Fetched entity"
    );
    Ok(EntityResponse::ok(operation, entity))
}

async fn list_entities<M: EntityManager>(
    State(crud): State<CrudHandlers<M>>,
    ctx: RequestContext,
    modifiers: ListModifiers,
) -> Result<EntityResponse<Vec<M::Entity>>, ApiError> {
    let operation = ApiOperation::List;

    let entities = match crud.manager.get_list(&ctx, modifiers).await {
        Ok(entities) => entities,
        Err(err) if err.is_not_found() && crud.options.empty_list_as_ok => Vec::new(),
        Err(err) => return Err(crud.manager_error(&ctx, operation, None, &err)),
    };

    tracing::debug!(
        operation = %operation,
        request_id = ctx.request_id(),
        count = entities.len(),
        status = 200,
        "Listed entities"
    );
    Ok(EntityResponse::ok(operation, entities))
}

async fn create_entity<M: EntityManager>(
    State(crud): State<CrudHandlers<M>>,
    ctx: RequestContext,
    body: Result<Bytes, BytesRejection>,
) -> Result<EntityResponse<M::Entity>, ApiError> {
    let operation = ApiOperation::Create;
    let payload = read_body(&ctx, operation, body)?;

    let entity = decode_entity(crud.manager.new_empty_entity(), payload.as_bytes())
        .map_err(|err| invalid_body(&ctx, operation, err))?;

    let created = crud
        .manager
        .create(&ctx, entity, &payload)
        .await
        .map_err(|err| crud.manager_error(&ctx, operation, None, &err))?;

    tracing::debug!(
        operation = %operation,
        request_id = ctx.request_id(),
        status = 201,
        "Created entity"
    );
    Ok(EntityResponse::created(created))
}

async fn replace_entity<M: EntityManager>(
    State(crud): State<CrudHandlers<M>>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<EntityResponse<M::Entity>, ApiError> {
    let operation = ApiOperation::Replace;
    let id = parse_id::<M>(&ctx, operation, path)?;
    let payload = read_body(&ctx, operation, body)?;

    let entity = decode_entity(crud.manager.new_empty_entity(), payload.as_bytes())
        .map_err(|err| invalid_body(&ctx, operation, err).with_entity_id(id.as_str()))?;

    let replaced = crud
        .manager
        .update(&ctx, &id, entity, &payload)
        .await
        .map_err(|err| crud.manager_error(&ctx, operation, Some(&id), &err))?;

    tracing::debug!(
        operation = %operation,
        request_id = ctx.request_id(),
        entity_id = %id,
        status = 200,
        "Replaced entity"
    );
    Ok(EntityResponse::ok(operation, replaced))
}

async fn patch_entity<M: EntityManager>(
    State(crud): State<CrudHandlers<M>>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<NoContent, ApiError> {
    let operation = ApiOperation::PartialUpdate;
    let id = parse_id::<M>(&ctx, operation, path)?;
    let payload = read_body(&ctx, operation, body)?;

    let patch = decode_patch(payload.as_bytes())
        .map_err(|err| invalid_body(&ctx, operation, err).with_entity_id(id.as_str()))?;

    crud.manager
        .partial_update(&ctx, &id, patch, &payload)
        .await
        .map_err(|err| crud.manager_error(&ctx, operation, Some(&id), &err))?;

    tracing::debug!(
        operation = %operation,
        request_id = ctx.request_id(),
        entity_id = %id,
        status = 204,
        "Patched entity"
    );
    Ok(NoContent)
}

async fn delete_entity<M: EntityManager>(
    State(crud): State<CrudHandlers<M>>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Accepted, ApiError> {
    let operation = ApiOperation::Delete;
    let id = parse_id::<M>(&ctx, operation, path)?;

    crud.manager
        .delete(&ctx, &id)
        .await
        .map_err(|err| crud.manager_error(&ctx, operation, Some(&id), &err))?;

    tracing::debug!(
        operation = %operation,
        request_id = ctx.request_id(),
        entity_id = %id,
        status = 202,
        "Deleted entity"
    );
    Ok(Accepted)
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::manager::ManagerOperation;
    use crate::mock::{MockEntity, MockManager};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const ALL_OPERATIONS: [ManagerOperation; 6] = [
        ManagerOperation::Create,
        ManagerOperation::Get,
        ManagerOperation::GetList,
        ManagerOperation::Update,
        ManagerOperation::PartialUpdate,
        ManagerOperation::Delete,
    ];

    fn app(manager: &Arc<MockManager>) -> Router {
        CrudHandlers::new(Arc::clone(manager)).router()
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Bytes) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes)
    }

    fn json_of(bytes: &Bytes) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn create(app: &Router, body: &str) -> MockEntity {
        let (status, bytes) = send(app, Method::POST, "/", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let created = create(&app, r#"{"status_id": 5}"#).await;
        let id = created.id.clone().unwrap();
        assert!(!id.is_nil());
        assert_eq!(created.status_id, 5);

        let (status, bytes) = send(&app, Method::GET, &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: MockEntity = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let a = create(&app, "{}").await;
        let b = create(&app, "{}").await;
        assert_ne!(a.id, b.id);
        assert_eq!(a.status_id, 0);
        assert_eq!(manager.len(), 2);
    }

    #[tokio::test]
    async fn test_client_cannot_choose_id() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let supplied = EntityId::generate("ent");
        let created = create(&app, &format!(r#"{{"id": "{}", "status_id": 1}}"#, supplied)).await;
        assert_ne!(created.id, Some(supplied));
    }

    #[tokio::test]
    async fn test_lifecycle_scenario() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let (status, bytes) = send(&app, Method::POST, "/", Some(r#"{"status_id":1}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let body = json_of(&bytes);
        assert_eq!(body["status_id"], 1);
        let id = body["id"].as_str().unwrap().to_string();
        let uri = format!("/{}", id);

        let (status, bytes) = send(&app, Method::PATCH, &uri, Some(r#"{"status_id":2}"#)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(bytes.is_empty());

        let (status, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&bytes)["status_id"], 2);

        let (status, bytes) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(bytes.is_empty());

        let (status, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body = json_of(&bytes);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["entity_id"], id.as_str());
    }

    #[tokio::test]
    async fn test_list() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        create(&app, r#"{"status_id": 1}"#).await;
        create(&app, r#"{"status_id": 2}"#).await;
        create(&app, r#"{"status_id": 2}"#).await;

        let (status, bytes) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        let all: Vec<MockEntity> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));

        let (status, bytes) = send(&app, Method::GET, "/?status_id=2", None).await;
        assert_eq!(status, StatusCode::OK);
        let filtered: Vec<MockEntity> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.status_id == 2));
    }

    #[tokio::test]
    async fn test_list_empty_is_404() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let (status, bytes) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&bytes)["operation"], "list");
    }

    #[tokio::test]
    async fn test_list_empty_as_ok() {
        let manager = Arc::new(MockManager::new());
        let app: Router = CrudHandlers::new(Arc::clone(&manager))
            .with_options(CrudOptions {
                empty_list_as_ok: true,
                ..Default::default()
            })
            .router();

        let (status, bytes) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&bytes), json!([]));
    }

    #[tokio::test]
    async fn test_replace() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let created = create(&app, r#"{"status_id": 1}"#).await;
        let id = created.id.unwrap();
        let uri = format!("/{}", id);

        let (status, bytes) = send(&app, Method::PUT, &uri, Some(r#"{"status_id": 9}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let replaced: MockEntity = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(replaced.status_id, 9);
        assert_eq!(replaced.id.as_ref(), Some(&id));

        let (status, bytes) = send(&app, Method::PUT, &uri, Some("{}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&bytes)["status_id"], 0);
    }

    #[tokio::test]
    async fn test_missing_entity_is_404() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);
        let uri = format!("/{}", EntityId::generate("ent"));

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::PUT, &uri, Some(r#"{"status_id": 1}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::PATCH, &uri, Some(r#"{"status_id": 1}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_without_required_key_is_400() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let created = create(&app, r#"{"status_id": 1}"#).await;
        let existing = format!("/{}", created.id.unwrap());
        let missing = format!("/{}", EntityId::generate("ent"));

        for uri in [existing, missing] {
            let (status, bytes) = send(&app, Method::PATCH, &uri, Some(r#"{"other": 3}"#)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json_of(&bytes)["error"], "BAD_REQUEST");
        }
    }

    #[tokio::test]
    async fn test_patch_wrong_type_is_400() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let created = create(&app, r#"{"status_id": 1}"#).await;
        let uri = format!("/{}", created.id.unwrap());

        let (status, _) = send(&app, Method::PATCH, &uri, Some(r#"{"status_id": "two"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(json_of(&bytes)["status_id"], 1);
    }

    #[tokio::test]
    async fn test_malformed_ids_never_reach_manager() {
        let manager = Arc::new(MockManager::new());
        for op in ALL_OPERATIONS {
            manager.fail_on(op);
        }
        let app = app(&manager);

        let bad_ids = [
            "not-an-id",
            "ent_123",
            "usr_01h455vb4pex5vsknk084sn02q",
            "ent_00000000000000000000000000",
        ];

        for bad in bad_ids {
            let uri = format!("/{}", bad);
            let (status, _) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "GET {}", bad);
            let (status, _) = send(&app, Method::PUT, &uri, Some("{}")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "PUT {}", bad);
            let (status, _) = send(&app, Method::PATCH, &uri, Some(r#"{"status_id": 1}"#)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "PATCH {}", bad);
            let (status, _) = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "DELETE {}", bad);
        }
    }

    #[tokio::test]
    async fn test_malformed_bodies_never_reach_manager() {
        let manager = Arc::new(MockManager::new());
        for op in ALL_OPERATIONS {
            manager.fail_on(op);
        }
        let app = app(&manager);
        let uri = format!("/{}", EntityId::generate("ent"));

        for body in ["", "{", "not json", r#"{"status_id": "x"}"#, "{} {}"] {
            let (status, _) = send(&app, Method::POST, "/", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "POST {:?}", body);
            let (status, _) = send(&app, Method::PUT, &uri, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "PUT {:?}", body);
        }

        for body in ["", "[1]", "\"text\"", "{"] {
            let (status, _) = send(&app, Method::PATCH, &uri, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "PATCH {:?}", body);
        }
    }

    #[tokio::test]
    async fn test_patch_content_type_not_enforced() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);
        let created = create(&app, r#"{"status_id": 1}"#).await;

        let request = Request::builder()
            .method(Method::PATCH)
            .uri(format!("/{}", created.id.unwrap()))
            .header("content-type", "application/merge-patch+json")
            .body(Body::from(r#"{"status_id": 4}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_manager_failures_are_500() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);
        let created = create(&app, r#"{"status_id": 1}"#).await;
        let uri = format!("/{}", created.id.unwrap());

        for op in ALL_OPERATIONS {
            manager.fail_on(op);
        }

        let (status, bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_of(&bytes);
        assert_eq!(body["message"], "An internal error occurred");

        let (status, _) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (status, _) = send(&app, Method::POST, "/", Some("{}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (status, _) = send(&app, Method::PUT, &uri, Some("{}")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (status, _) = send(&app, Method::PATCH, &uri, Some(r#"{"status_id": 3}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        manager.clear_failures();
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_create_errors_are_500_unless_mapped() {
        let ctx = RequestContext::default();
        let err = ManagerError::forbidden(ManagerOperation::Create, "quota exceeded");

        let crud = CrudHandlers::new(Arc::new(MockManager::new()));
        let api = crud.manager_error(&ctx, ApiOperation::Create, None, &err);
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let crud = crud.with_options(CrudOptions {
            map_create_errors: true,
            ..Default::default()
        });
        let api = crud.manager_error(&ctx, ApiOperation::Create, None, &err);
        assert_eq!(api.status(), StatusCode::FORBIDDEN);
        assert_eq!(api.message, "quota exceeded");
    }

    #[test]
    fn test_manager_error_attaches_path_id() {
        let ctx = RequestContext::default();
        let id = EntityId::generate("ent");
        let err = ManagerError::internal(ManagerOperation::Update, "disk full");

        let crud = CrudHandlers::new(Arc::new(MockManager::new()));
        let api = crud.manager_error(&ctx, ApiOperation::Replace, Some(&id), &err);
        assert_eq!(api.entity_id.as_deref(), Some(id.as_str()));
        assert_eq!(api.operation, ApiOperation::Replace);
    }

    #[tokio::test]
    async fn test_nested_under_base_path() {
        let manager = Arc::new(MockManager::new());
        let app: Router = Router::new().nest("/e", app(&manager));

        let (status, bytes) = send(&app, Method::POST, "/e", Some(r#"{"status_id": 7}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = json_of(&bytes)["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, Method::GET, &format!("/e/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405() {
        let manager = Arc::new(MockManager::new());
        let app = app(&manager);

        let (status, _) = send(&app, Method::DELETE, "/", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
