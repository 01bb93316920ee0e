//! Entity manager error types
//!
//! Managers report failures as a [`ManagerError`] whose [`ManagerErrorKind`]
//! drives the HTTP status chosen by
//! [`EntityManager::map_error_to_http_error`](super::EntityManager::map_error_to_http_error).
//!
//! # Example
//!
//! ```rust
//! use crud_service::manager::{ManagerError, ManagerErrorKind, ManagerOperation};
//!
//! let error = ManagerError::not_found(ManagerOperation::Get, "ent_01h455vb4pex5vsknk084sn02q");
//! assert!(matches!(error.kind, ManagerErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Result type returned by every manager operation
pub type ManagerResult<T> = std::result::Result<T, ManagerError>;

/// Operation being performed when the manager error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerOperation {
    /// Creating a new entity
    Create,
    /// Fetching one entity by ID
    Get,
    /// Listing entities with modifiers
    GetList,
    /// Replacing an entity
    Update,
    /// Applying a merge-patch to an entity
    PartialUpdate,
    /// Deleting an entity
    Delete,
}

impl fmt::Display for ManagerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Get => write!(f, "get"),
            Self::GetList => write!(f, "get_list"),
            Self::Update => write!(f, "update"),
            Self::PartialUpdate => write!(f, "partial_update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of manager error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerErrorKind {
    /// No entity has the requested identifier, or a list is empty
    NotFound,
    /// The caller may not perform the operation
    Forbidden,
    /// The payload is missing data the manager requires
    BadRequest,
    /// Storage or any other unclassified failure
    Internal,
}

impl fmt::Display for ManagerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Structured manager error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerError {
    /// The operation being performed when the error occurred
    pub operation: ManagerOperation,
    /// The category of error
    pub kind: ManagerErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl ManagerError {
    /// Create a new manager error
    pub fn new(
        operation: ManagerOperation,
        kind: ManagerErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_id: None,
        }
    }

    /// No entity with the given identifier
    pub fn not_found(operation: ManagerOperation, entity_id: impl Into<String>) -> Self {
        Self::new(operation, ManagerErrorKind::NotFound, "entity not found")
            .with_entity_id(entity_id)
    }

    /// Empty result set from a list operation
    pub fn empty_list() -> Self {
        Self::new(
            ManagerOperation::GetList,
            ManagerErrorKind::NotFound,
            "no entity matches the list modifiers",
        )
    }

    /// Access denied
    pub fn forbidden(operation: ManagerOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ManagerErrorKind::Forbidden, message)
    }

    /// Payload rejected by the manager
    pub fn bad_request(operation: ManagerOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ManagerErrorKind::BadRequest, message)
    }

    /// A required merge-patch key is absent
    pub fn missing_key(key: &str) -> Self {
        Self::bad_request(
            ManagerOperation::PartialUpdate,
            format!("required key '{}' is missing", key),
        )
    }

    /// Storage or other internal failure
    pub fn internal(operation: ManagerOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ManagerErrorKind::Internal, message)
    }

    /// Attach the identifier of the entity involved
    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ManagerOperation) -> Self {
        self.operation = operation;
        self
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        self.kind == ManagerErrorKind::NotFound
    }
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Manager {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref entity_id) = self.entity_id {
            write!(f, " [{}]", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ManagerError {}
