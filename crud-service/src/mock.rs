//! In-memory entity manager
//!
//! [`MockManager`] keeps [`MockEntity`] values in a `DashMap` and implements
//! the whole [`EntityManager`] contract. It backs the handler tests and the
//! `mock-server` example, and shows what a real manager has to do.
//!
//! Failures can be injected per operation with [`MockManager::fail_on`]; an
//! injected failure surfaces as an `Internal` manager error.
//!
//! `get_list` understands one modifier, `status_id`, and keeps the entities
//! whose status matches any of its values.

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::EntityId;
use crate::manager::{
    EntityManager, ListModifiers, ManagerError, ManagerOperation, ManagerResult,
    PartialUpdateData, RawPayload, RequestContext,
};

/// Key a partial update must carry
pub const STATUS_KEY: &str = "status_id";

/// Entity stored by [`MockManager`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockEntity {
    /// Assigned on create, absent in the empty template
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub status_id: i64,
}

/// Concurrency-safe in-memory manager
#[derive(Debug, Default)]
pub struct MockManager {
    entities: DashMap<EntityId, MockEntity>,
    failures: DashSet<ManagerOperation>,
}

impl MockManager {
    /// Empty store with no injected failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `operation` fail with an internal error
    pub fn fail_on(&self, operation: ManagerOperation) {
        self.failures.insert(operation);
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// True if an entity with `id` is stored
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    fn check_failure(&self, operation: ManagerOperation) -> ManagerResult<()> {
        if self.failures.contains(&operation) {
            return Err(ManagerError::internal(operation, "injected failure"));
        }
        Ok(())
    }
}

fn status_matches(entity: &MockEntity, wanted: Option<&[String]>) -> bool {
    match wanted {
        None => true,
        Some(values) => values
            .iter()
            .any(|v| v.trim().parse::<i64>() == Ok(entity.status_id)),
    }
}

impl EntityManager for MockManager {
    type Entity = MockEntity;

    fn new_empty_entity(&self) -> MockEntity {
        MockEntity::default()
    }

    async fn create(
        &self,
        _ctx: &RequestContext,
        entity: MockEntity,
        _payload: &RawPayload,
    ) -> ManagerResult<MockEntity> {
        self.check_failure(ManagerOperation::Create)?;

        let id = EntityId::generate(Self::ID_PREFIX);
        let stored = MockEntity {
            id: Some(id.clone()),
            ..entity
        };
        self.entities.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, _ctx: &RequestContext, id: &EntityId) -> ManagerResult<MockEntity> {
        self.check_failure(ManagerOperation::Get)?;

        self.entities
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ManagerError::not_found(ManagerOperation::Get, id.as_str()))
    }

    async fn get_list(
        &self,
        _ctx: &RequestContext,
        modifiers: ListModifiers,
    ) -> ManagerResult<Vec<MockEntity>> {
        self.check_failure(ManagerOperation::GetList)?;

        let wanted = modifiers.get(STATUS_KEY);
        let mut entities: Vec<MockEntity> = self
            .entities
            .iter()
            .filter(|entry| status_matches(entry.value(), wanted))
            .map(|entry| entry.value().clone())
            .collect();

        if entities.is_empty() {
            return Err(ManagerError::empty_list());
        }

        entities.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entities)
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        id: &EntityId,
        entity: MockEntity,
        _payload: &RawPayload,
    ) -> ManagerResult<MockEntity> {
        self.check_failure(ManagerOperation::Update)?;

        let mut slot = self
            .entities
            .get_mut(id)
            .ok_or_else(|| ManagerError::not_found(ManagerOperation::Update, id.as_str()))?;

        let replaced = MockEntity {
            id: Some(id.clone()),
            ..entity
        };
        *slot = replaced.clone();
        Ok(replaced)
    }

    async fn partial_update(
        &self,
        _ctx: &RequestContext,
        id: &EntityId,
        patch: PartialUpdateData,
        _payload: &RawPayload,
    ) -> ManagerResult<()> {
        self.check_failure(ManagerOperation::PartialUpdate)?;
        patch
            .require(STATUS_KEY)
            .map_err(|err| err.with_entity_id(id.as_str()))?;

        let mut slot = self.entities.get_mut(id).ok_or_else(|| {
            ManagerError::not_found(ManagerOperation::PartialUpdate, id.as_str())
        })?;

        let mut document = serde_json::to_value(&*slot).map_err(|err| {
            ManagerError::internal(ManagerOperation::PartialUpdate, err.to_string())
        })?;
        patch.apply_to(&mut document);
        // Identifiers are immutable
        document["id"] = Value::from(id.as_str());

        *slot = serde_json::from_value(document).map_err(|err| {
            ManagerError::bad_request(ManagerOperation::PartialUpdate, err.to_string())
                .with_entity_id(id.as_str())
        })?;
        Ok(())
    }

    async fn delete(&self, _ctx: &RequestContext, id: &EntityId) -> ManagerResult<()> {
        self.check_failure(ManagerOperation::Delete)?;

        self.entities
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ManagerError::not_found(ManagerOperation::Delete, id.as_str()))
    }
}
