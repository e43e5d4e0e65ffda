//! Turns an `Endpoint` into a `WireRequest`.
//!
//! Pure and synchronous: no I/O happens here. The only failures are those of
//! the endpoint's encoding strategy.

use crate::codec::Codec;
use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::http::WireRequest;

pub const CONTENT_TYPE: &str = "Content-Type";

/// Build the request for a plain call.
pub fn build<C: Codec>(endpoint: &Endpoint, codec: &C) -> Result<WireRequest, NetworkError> {
    let mut request = WireRequest::new(endpoint.method(), endpoint.url().clone());
    for (name, value) in endpoint.headers().iter() {
        request.headers.set(name, value);
    }
    endpoint
        .encoding()
        .apply(request, endpoint.parameters(), codec)
}

/// Build the request for an upload: `data` becomes the body and
/// `mime_type` overrides any `Content-Type` the endpoint or its encoding set.
pub fn build_upload<C: Codec>(
    endpoint: &Endpoint,
    data: Vec<u8>,
    mime_type: &str,
    codec: &C,
) -> Result<WireRequest, NetworkError> {
    let mut request = build(endpoint, codec)?;
    request.headers.set(CONTENT_TYPE, mime_type);
    request.body = Some(data);
    Ok(request)
}
