//! Request tracking middleware
//!
//! Generates a typed request ID for every inbound request, echoes it on the
//! response and masks credentials in trace output. Handlers read the ID back
//! through [`RequestContext`](crate::manager::RequestContext).

use http::HeaderName;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::ids::MakeTypedRequestId;

/// Header carrying the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Create a request ID layer that generates type-safe request IDs.
///
/// Example format: `req_01h455vb4pex5vsknk084sn02q`
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeTypedRequestId)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER))
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .map(|h| HeaderName::from_static(*h))
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}
