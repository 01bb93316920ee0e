//! The entity manager contract
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! be written with plain `async fn` and no `async_trait`.

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};

use super::context::{RawPayload, RequestContext};
use super::error::{ManagerError, ManagerResult};
use super::modifiers::ListModifiers;
use super::patch::PartialUpdateData;
use crate::handlers::ApiError;
use crate::ids::EntityId;

/// Prefix used for entity IDs when a manager does not choose its own
pub const DEFAULT_ID_PREFIX: &str = "ent";

/// Pluggable backing store behind the CRUD handlers
///
/// A manager owns its entities and everything about storing them, including
/// synchronization: handlers run concurrently and share the manager through
/// an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use crud_service::manager::*;
///
/// impl EntityManager for OrderManager {
///     type Entity = Order;
///     const ID_PREFIX: &'static str = "ord";
///
///     fn new_empty_entity(&self) -> Order {
///         Order::default()
///     }
///
///     async fn get(&self, _ctx: &RequestContext, id: &EntityId) -> ManagerResult<Order> {
///         self.orders
///             .get(id)
///             .map(|o| o.clone())
///             .ok_or_else(|| ManagerError::not_found(ManagerOperation::Get, id.as_str()))
///     }
///
///     // ... other methods
/// }
/// ```
pub trait EntityManager: Send + Sync + 'static {
    /// Record type exchanged with clients as JSON
    type Entity: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// TypeID prefix of the identifiers this manager issues
    const ID_PREFIX: &'static str = DEFAULT_ID_PREFIX;

    /// Zero-valued entity used as the decode template for POST and PUT
    ///
    /// Fields missing from a request body keep the template's values.
    fn new_empty_entity(&self) -> Self::Entity;

    /// Persist a new entity, assign its identifier and return the stored value
    fn create(
        &self,
        ctx: &RequestContext,
        entity: Self::Entity,
        payload: &RawPayload,
    ) -> impl Future<Output = ManagerResult<Self::Entity>> + Send;

    /// Fetch one entity; `NotFound` if the identifier is unknown
    fn get(
        &self,
        ctx: &RequestContext,
        id: &EntityId,
    ) -> impl Future<Output = ManagerResult<Self::Entity>> + Send;

    /// Fetch the entities selected by `modifiers`; `NotFound` when none match
    fn get_list(
        &self,
        ctx: &RequestContext,
        modifiers: ListModifiers,
    ) -> impl Future<Output = ManagerResult<Vec<Self::Entity>>> + Send;

    /// Replace the stored entity entirely; `NotFound` if the identifier is unknown
    fn update(
        &self,
        ctx: &RequestContext,
        id: &EntityId,
        entity: Self::Entity,
        payload: &RawPayload,
    ) -> impl Future<Output = ManagerResult<Self::Entity>> + Send;

    /// Apply a merge-patch
    ///
    /// Implementations reject a patch lacking a key they require with
    /// `BadRequest`, and an unknown identifier with `NotFound`.
    fn partial_update(
        &self,
        ctx: &RequestContext,
        id: &EntityId,
        patch: PartialUpdateData,
        payload: &RawPayload,
    ) -> impl Future<Output = ManagerResult<()>> + Send;

    /// Remove an entity; `NotFound` if the identifier is unknown
    fn delete(
        &self,
        ctx: &RequestContext,
        id: &EntityId,
    ) -> impl Future<Output = ManagerResult<()>> + Send;

    /// Classify a manager error into an HTTP error
    ///
    /// The default maps `NotFound` to 404, `Forbidden` to 403, `BadRequest`
    /// to 400 and everything else to a 500 without internal details.
    fn map_error_to_http_error(&self, error: &ManagerError) -> ApiError {
        ApiError::from(error)
    }
}
