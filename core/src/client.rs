//! Async client composing request building, transport and classification.
//!
//! # Design
//! `ApiClient` holds only shared, immutable handles (the transport and the
//! codec), so clones are cheap and concurrent calls share no mutable state.
//! Each operation builds one `WireRequest`, awaits exactly one transport
//! call, and classifies the outcome for its call shape. Nothing is retried.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::classify;
use crate::codec::{Codec, JsonCodec};
use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::http::{ResponseMeta, TransportOutcome, WireRequest};
use crate::request;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy)]
enum CallShape {
    Fetch,
    Upload,
    Download,
}

pub struct ApiClient<C = JsonCodec> {
    transport: Arc<dyn Transport>,
    codec: Arc<C>,
}

impl ApiClient<JsonCodec> {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_codec(transport, JsonCodec)
    }
}

#[cfg(feature = "ureq")]
impl ApiClient<JsonCodec> {
    /// Client over a `UreqTransport` configured from the environment.
    pub fn from_env() -> Self {
        let config = crate::config::TransportConfig::from_env();
        Self::new(crate::transport::http::UreqTransport::new(&config))
    }
}

impl<C: Codec> ApiClient<C> {
    pub fn with_codec(transport: impl Transport + 'static, codec: C) -> Self {
        Self {
            transport: Arc::new(transport),
            codec: Arc::new(codec),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Call `endpoint` and decode a 2xx body into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, NetworkError> {
        let request = request::build(endpoint, self.codec())?;
        let outcome = self.send(request, CallShape::Fetch).await;
        log_failure(classify::classify_decoded(outcome, self.codec()))
    }

    /// Call `endpoint` and accept any 2xx response, ignoring its body.
    pub async fn fetch_void(&self, endpoint: &Endpoint) -> Result<(), NetworkError> {
        let request = request::build(endpoint, self.codec())?;
        let outcome = self.send(request, CallShape::Fetch).await;
        log_failure(classify::classify_void(outcome))
    }

    /// Send `data` as the body with `Content-Type: mime_type` and return the
    /// raw response body.
    pub async fn upload(
        &self,
        endpoint: &Endpoint,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Result<Vec<u8>, NetworkError> {
        let request = request::build_upload(endpoint, data, mime_type, self.codec())?;
        let outcome = self.send(request, CallShape::Upload).await;
        log_failure(classify::classify_bytes(outcome))
    }

    /// Fetch raw bytes with the response metadata.
    ///
    /// The status code is not checked: a 404 page with a body comes back as
    /// `Ok`. Use `download_checked` to reject non-2xx responses.
    pub async fn download(
        &self,
        endpoint: &Endpoint,
    ) -> Result<(Vec<u8>, ResponseMeta), NetworkError> {
        let request = request::build(endpoint, self.codec())?;
        let outcome = self.send(request, CallShape::Download).await;
        log_failure(classify::classify_download(outcome))
    }

    /// `download`, with the status and metadata checks of the other calls.
    pub async fn download_checked(
        &self,
        endpoint: &Endpoint,
    ) -> Result<(Vec<u8>, ResponseMeta), NetworkError> {
        let request = request::build(endpoint, self.codec())?;
        let outcome = self.send(request, CallShape::Download).await;
        log_failure(classify::classify_download_checked(outcome))
    }

    async fn send(&self, request: WireRequest, shape: CallShape) -> TransportOutcome {
        debug!(method = %request.method, url = %request.url, ?shape, "sending request");
        let outcome = match shape {
            CallShape::Fetch => self.transport.execute(request).await,
            CallShape::Upload => self.transport.upload(request).await,
            CallShape::Download => self.transport.download(request).await,
        };
        match &outcome {
            TransportOutcome::Failed(err) => warn!(error = %err, "transport failed"),
            TransportOutcome::Completed { body, meta } => debug!(
                status = ?meta.as_ref().and_then(|m| m.status),
                bytes = body.as_ref().map_or(0, Vec::len),
                "response received"
            ),
        }
        outcome
    }
}

fn log_failure<T>(result: Result<T, NetworkError>) -> Result<T, NetworkError> {
    if let Err(err) = &result {
        match err {
            NetworkError::Server { status, .. } => warn!(status, "request rejected by server"),
            other => debug!(error = %other, "request failed"),
        }
    }
    result
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<C> fmt::Debug for ApiClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}
