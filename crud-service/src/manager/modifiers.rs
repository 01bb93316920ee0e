//! List modifiers parsed from the request query string
//!
//! The handler layer never interprets modifiers. Filtering, sorting and
//! pagination keys are whatever the manager decides they are.
//!
//! ```rust
//! use crud_service::manager::ListModifiers;
//!
//! let uri = "/e?orderby=name%20ASC&orderby=created%20DESC&status=1".parse().unwrap();
//! let modifiers = ListModifiers::from_uri(&uri);
//!
//! assert_eq!(modifiers.get("orderby").unwrap(), ["name ASC", "created DESC"]);
//! assert_eq!(modifiers.first("status"), Some("1"));
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use http::{request::Parts, Uri};
use serde::{Deserialize, Serialize};

/// Query-parameter name to one or more values, in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListModifiers(BTreeMap<String, Vec<String>>);

impl ListModifiers {
    /// Empty modifiers
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the query string of a URI
    ///
    /// Undecodable query strings yield empty modifiers.
    pub fn from_uri(uri: &Uri) -> Self {
        match Query::<Vec<(String, String)>>::try_from_uri(uri) {
            Ok(Query(pairs)) => pairs.into_iter().collect(),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Ignoring undecodable query string");
                Self::default()
            }
        }
    }

    /// Append a value to `key`, keeping earlier values
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replace all values of `key`
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        self.0.insert(key.into(), values)
    }

    /// All values for `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// First value for `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// True if `key` was present in the query string
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no modifiers were supplied
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keys and their values
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    /// Unwrap into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl<S> FromRequestParts<S> for ListModifiers
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}

impl FromIterator<(String, String)> for ListModifiers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut modifiers = Self::default();
        for (key, value) in iter {
            modifiers.append(key, value);
        }
        modifiers
    }
}

impl From<BTreeMap<String, Vec<String>>> for ListModifiers {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl IntoIterator for ListModifiers {
    type Item = (String, Vec<String>);
    type IntoIter = btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ListModifiers {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
