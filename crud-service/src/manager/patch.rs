//! Partial update payloads (JSON merge-patch, RFC 7386)
//!
//! A PATCH body is decoded into [`PartialUpdateData`] and handed to the
//! manager untouched. Managers decide which keys they accept; [`merge_patch`]
//! is available for those that store entities as JSON-compatible values.
//!
//! ```rust
//! use crud_service::manager::{merge_patch, PartialUpdateData};
//! use serde_json::json;
//!
//! let patch: PartialUpdateData = serde_json::from_value(json!({
//!     "title": "Hello!",
//!     "author": { "familyName": null },
//!     "tags": ["example"]
//! })).unwrap();
//!
//! let mut doc = json!({
//!     "title": "Goodbye!",
//!     "author": { "givenName": "John", "familyName": "Doe" },
//!     "tags": ["example", "sample"],
//!     "content": "This will be unchanged"
//! });
//! patch.apply_to(&mut doc);
//!
//! assert_eq!(doc, json!({
//!     "title": "Hello!",
//!     "author": { "givenName": "John" },
//!     "tags": ["example"],
//!     "content": "This will be unchanged"
//! }));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ManagerError;

/// Field name to decoded JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialUpdateData(Map<String, Value>);

impl PartialUpdateData {
    /// Empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, `Some(&Value::Null)` when the patch removes it
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True if the patch mentions `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Value for a key the manager cannot do without
    pub fn require(&self, key: &str) -> Result<&Value, ManagerError> {
        self.0.get(key).ok_or_else(|| ManagerError::missing_key(key))
    }

    /// Set a member of the patch
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Keys mentioned by the patch
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for `{}`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply this patch to `target` following RFC 7386
    pub fn apply_to(&self, target: &mut Value) {
        merge_patch(target, &self.to_value());
    }

    /// The patch as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Unwrap into the underlying map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for PartialUpdateData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Apply a JSON merge-patch to `target` (RFC 7386 section 2)
///
/// An object patch is merged member by member, `null` members remove the
/// target member. Any other patch value replaces the target outright.
pub use json_patch::merge as merge_patch;
