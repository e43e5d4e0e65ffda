//! HTTP wire types shared by the builder, the transport and the classifier.
//!
//! # Design
//! Requests and responses are plain data. The core builds `WireRequest`
//! values and classifies `TransportOutcome` values without touching the
//! network; a `Transport` implementation performs the actual I/O in between.
//! All fields are owned so values move freely across the async boundary.

use std::fmt;

use url::Url;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header list with case-insensitive names.
///
/// `set` is last-write-wins and is what request building uses; `append`
/// keeps repeated names, for response headers such as `Set-Cookie`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing value whose name matches
    /// case-insensitively. The replaced entry keeps its position but takes
    /// the new spelling of the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Add a header without replacing existing values of the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

/// A concrete HTTP request, built once per call and handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl WireRequest {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            url,
            method,
            headers: Headers::new(),
            body: None,
        }
    }
}

/// Response metadata reported by the transport.
///
/// `status` is `None` when the transport produced a response that is not an
/// HTTP response (the classifier treats that as an unknown failure).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    pub url: Option<Url>,
    pub status: Option<u16>,
    pub headers: Headers,
}

impl ResponseMeta {
    pub fn http(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }
}

/// The raw result of executing a `WireRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// The exchange finished; body and metadata are whatever arrived.
    Completed {
        body: Option<Vec<u8>>,
        meta: Option<ResponseMeta>,
    },
    /// The exchange never produced a response.
    Failed(TransportError),
}

impl TransportOutcome {
    /// Convenience for a complete HTTP response. An empty `body` is recorded
    /// as no body at all.
    pub fn response(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        TransportOutcome::Completed {
            body: (!body.is_empty()).then_some(body),
            meta: Some(ResponseMeta::http(status)),
        }
    }
}
