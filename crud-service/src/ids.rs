//! Type-safe identifiers in the TypeID format
//!
//! Both entity identifiers and request identifiers are
//! [TypeIDs](https://github.com/jetpack-io/typeid/blob/main/spec/SPEC.md): a
//! lowercase prefix, an underscore and a 26 character base32 encoding of a
//! UUIDv7. They are URL-safe, globally unique and sort by creation time.
//!
//! ```rust
//! use crud_service::ids::EntityId;
//!
//! let id = EntityId::generate("ent");
//! assert!(id.as_str().starts_with("ent_"));
//! assert!(!id.is_nil());
//!
//! let parsed = EntityId::parse(id.as_str(), "ent").unwrap();
//! assert_eq!(parsed, id);
//! ```

use http::Request;
use mti::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Identifier of an entity owned by an entity manager.
///
/// Generated by the manager when an entity is created and never supplied by
/// the client. The wire form is `<prefix>_<suffix>`, e.g.
/// `ent_01h455vb4pex5vsknk084sn02q`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(MagicTypeId);

impl EntityId {
    /// Generates a fresh, time-sortable identifier with the given prefix.
    #[must_use]
    pub fn generate(prefix: &'static str) -> Self {
        Self(prefix.create_type_id::<V7>())
    }

    /// Parses an identifier taken from a request path.
    ///
    /// Fails when the input is empty, is not a valid TypeID, carries a
    /// different prefix than `expected_prefix`, or is the nil identifier.
    pub fn parse(input: &str, expected_prefix: &str) -> Result<Self, EntityIdError> {
        let id = Self::from_str(input)?;

        if id.prefix() != expected_prefix {
            return Err(EntityIdError::InvalidPrefix {
                expected: expected_prefix.to_string(),
                actual: id.prefix().to_string(),
            });
        }

        if id.is_nil() {
            return Err(EntityIdError::Nil);
        }

        Ok(id)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the prefix portion of the identifier.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.prefix().as_str()
    }

    /// Returns the base32 suffix portion of the identifier.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.as_str()
            .rsplit_once('_')
            .map_or(self.as_str(), |(_, suffix)| suffix)
    }

    /// True for the all-zero identifier.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.suffix().bytes().all(|b| b == b'0')
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(EntityIdError::Empty);
        }
        let mti = MagicTypeId::from_str(s).map_err(EntityIdError::Parse)?;
        Ok(Self(mti))
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0.to_string()
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw).map_err(de::Error::custom)
    }
}

/// Error type for entity ID parsing.
#[derive(Debug, thiserror::Error)]
pub enum EntityIdError {
    /// No identifier was supplied.
    #[error("entity ID is empty")]
    Empty,

    /// The ID could not be parsed as a valid TypeID.
    #[error("failed to parse entity ID: {0}")]
    Parse(MagicTypeIdError),

    /// The prefix was not the one the manager issues.
    #[error("invalid prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix {
        /// The expected prefix.
        expected: String,
        /// The actual prefix found.
        actual: String,
    },

    /// The all-zero identifier is never assigned to an entity.
    #[error("entity ID is nil")]
    Nil,
}

/// A type-safe request identifier for distributed tracing.
///
/// Request IDs follow the TypeID format: `req_<base32-encoded-uuidv7>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7 (time-sortable).
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `MakeRequestId` implementation that generates `RequestId`s for tower-http.
///
/// Used by [`request_id_layer`](crate::middleware::request_id_layer) so every
/// request reaching a handler carries an `x-request-id` header, which
/// [`RequestContext`](crate::manager::RequestContext) then exposes to managers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}
