//! Request-scoped data handed to every manager call

use std::convert::Infallible;

use axum::{body::Bytes, extract::FromRequestParts};
use http::{request::Parts, HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;

use crate::middleware::REQUEST_ID_HEADER;

/// Request-scoped context
///
/// Extracted from the request head by every handler. It lives only as long
/// as the request; managers that run long operations can read the request
/// ID or headers from it, and the whole manager call is dropped when the
/// client goes away.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    request_id: Option<String>,
}

impl RequestContext {
    /// Build a context from explicit parts
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            method,
            uri,
            headers,
            request_id,
        }
    }

    /// Request method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of `x-request-id`, if the request carried one
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
        ))
    }
}

/// The request body exactly as received
///
/// Handlers decode from this buffer and then pass it to the manager, so a
/// manager that needs more than the decoded value can read the payload again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayload(Bytes);

impl RawPayload {
    /// Wrap a body buffer
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for an empty body
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the payload again as `T`
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.0)
    }

    /// Unwrap into the underlying buffer
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for RawPayload {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for RawPayload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
