//! Declarative description of a single HTTP call.
//!
//! An `Endpoint` is assembled with `EndpointBuilder` and is immutable once
//! built. Building resolves `path` against `base_url` (RFC 3986 reference
//! resolution, the same rules a browser applies to a relative link), so an
//! `Endpoint` that exists always has a valid absolute `http`/`https` URL.

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::encoding::{ParameterEncoding, Parameters};
use crate::error::{CodecError, NetworkError};
use crate::http::{Headers, HttpMethod};

#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: Url,
    path: String,
    url: Url,
    method: HttpMethod,
    headers: Headers,
    parameters: Option<Parameters>,
    encoding: ParameterEncoding,
}

impl Endpoint {
    pub fn builder(base_url: impl Into<String>, path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new(base_url, path)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `path` resolved against `base_url`.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.parameters.as_ref()
    }

    pub fn encoding(&self) -> &ParameterEncoding {
        &self.encoding
    }
}

/// Builder for `Endpoint`. Defaults to `GET` with URL-encoded parameters.
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    base_url: String,
    path: String,
    method: HttpMethod,
    headers: Headers,
    parameters: Option<Parameters>,
    encoding: ParameterEncoding,
}

impl EndpointBuilder {
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            method: HttpMethod::Get,
            headers: Headers::new(),
            parameters: None,
            encoding: ParameterEncoding::default(),
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a header; a later header with the same name (any case) wins.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters
            .get_or_insert_with(Parameters::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Use the fields of any serializable struct or map as parameters.
    ///
    /// Fails with `Encoding` if `value` cannot be serialized or does not
    /// serialize to an object. `None`/unit clears the parameters.
    pub fn parameters_from<T: Serialize + ?Sized>(
        mut self,
        value: &T,
    ) -> Result<Self, NetworkError> {
        let value = serde_json::to_value(value).map_err(|e| NetworkError::Encoding(e.into()))?;
        self.parameters = match value {
            Value::Object(fields) => Some(fields.into_iter().collect()),
            Value::Null => None,
            other => {
                return Err(NetworkError::Encoding(CodecError::new(format!(
                    "parameters must serialize to an object, got {}",
                    json_kind(&other)
                ))))
            }
        };
        Ok(self)
    }

    pub fn encoding(mut self, encoding: ParameterEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn build(self) -> Result<Endpoint, NetworkError> {
        let (base_url, url) = resolve(&self.base_url, &self.path)?;
        Ok(Endpoint {
            base_url,
            path: self.path,
            url,
            method: self.method,
            headers: self.headers,
            parameters: self.parameters,
            encoding: self.encoding,
        })
    }
}

/// Parse `base_url` and join `path` onto it.
fn resolve(base_url: &str, path: &str) -> Result<(Url, Url), NetworkError> {
    let base = Url::parse(base_url)
        .map_err(|e| NetworkError::InvalidUrl(format!("base URL {base_url:?}: {e}")))?;
    let url = base.join(path).map_err(|e| {
        NetworkError::InvalidUrl(format!("cannot resolve {path:?} against {base}: {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok((base, url)),
        other => Err(NetworkError::InvalidUrl(format!(
            "unsupported scheme {other:?} in {url}"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
