//! Strategies for merging endpoint parameters into a request.
//!
//! # Design
//! Each strategy is a pure function from a request-in-progress plus the
//! endpoint's parameters to a new request. `UrlEncoded` writes the query
//! string, `JsonEncoded` writes the body through the client's `Codec`, and
//! `Custom` hands body production to a caller-supplied fallible closure.
//! Strategies only touch the URL or the body; headers such as `Content-Type`
//! belong to the endpoint.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::codec::Codec;
use crate::error::{CodecError, NetworkError};
use crate::http::WireRequest;

/// Endpoint parameters. A sorted map keeps query output deterministic.
pub type Parameters = BTreeMap<String, Value>;

type EncodeFn = dyn Fn() -> Result<Vec<u8>, CodecError> + Send + Sync;

/// Caller-supplied body producer for `ParameterEncoding::Custom`.
#[derive(Clone)]
pub struct CustomEncoder(Arc<EncodeFn>);

impl CustomEncoder {
    pub fn new<F>(encode: F) -> Self
    where
        F: Fn() -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        Self(Arc::new(encode))
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        (self.0)()
    }
}

impl fmt::Debug for CustomEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomEncoder(..)")
    }
}

/// How an endpoint's parameters end up on the wire.
#[derive(Debug, Clone, Default)]
pub enum ParameterEncoding {
    /// Percent-encoded into the query string.
    #[default]
    UrlEncoded,
    /// Serialized as a JSON object into the body.
    JsonEncoded,
    /// Body bytes come from the closure verbatim; parameters are ignored.
    Custom(CustomEncoder),
}

impl ParameterEncoding {
    pub fn custom<F>(encode: F) -> Self
    where
        F: Fn() -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        ParameterEncoding::Custom(CustomEncoder::new(encode))
    }

    /// Apply this strategy to `request`.
    pub fn apply<C: Codec>(
        &self,
        mut request: WireRequest,
        parameters: Option<&Parameters>,
        codec: &C,
    ) -> Result<WireRequest, NetworkError> {
        match self {
            ParameterEncoding::UrlEncoded => {
                let Some(parameters) = parameters.filter(|p| !p.is_empty()) else {
                    return Ok(request);
                };
                if request.body.is_some() {
                    return Err(NetworkError::InvalidUrl(
                        "query parameters conflict with an existing request body".to_string(),
                    ));
                }
                request
                    .url
                    .query_pairs_mut()
                    .extend_pairs(query_pairs(parameters));
                Ok(request)
            }
            ParameterEncoding::JsonEncoded => {
                if let Some(parameters) = parameters {
                    let body = codec.encode(parameters).map_err(NetworkError::Encoding)?;
                    request.body = Some(body);
                }
                Ok(request)
            }
            ParameterEncoding::Custom(encoder) => {
                let body = encoder.encode().map_err(NetworkError::Encoding)?;
                request.body = Some(body);
                Ok(request)
            }
        }
    }
}

/// Flatten parameters into `(key, value)` pairs.
///
/// Arrays become repeated `key[]` pairs and objects become `key[field]`
/// pairs, recursively. `null` renders as an empty value.
pub fn query_pairs(parameters: &Parameters) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(parameters.len());
    for (key, value) in parameters {
        flatten(key, value, &mut pairs);
    }
    pairs
}

fn flatten(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => out.push((key.to_string(), String::new())),
        Value::Bool(b) => out.push((key.to_string(), b.to_string())),
        Value::Number(n) => out.push((key.to_string(), n.to_string())),
        Value::String(s) => out.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            let nested = format!("{key}[]");
            for item in items {
                flatten(&nested, item, out);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                flatten(&format!("{key}[{field}]"), item, out);
            }
        }
    }
}
