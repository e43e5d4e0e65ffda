//! Callback- and stream-shaped front ends over `ApiClient`.
//!
//! Both adapters delegate to the async client; neither builds requests nor
//! classifies responses on its own. Each call delivers exactly one terminal
//! outcome: callbacks are `FnOnce`, streams yield a single item and end.

use futures::stream::{self, BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::client::ApiClient;
use crate::codec::{Codec, JsonCodec};
use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::http::ResponseMeta;

/// Runs client calls on a tokio runtime and hands each result to a
/// completion closure.
///
/// Dropping the returned `JoinHandle` does not cancel the call; aborting it
/// does, in which case the completion is never invoked.
#[derive(Debug, Clone)]
pub struct CompletionClient<C = JsonCodec> {
    client: ApiClient<C>,
    runtime: Handle,
}

impl<C: Codec> CompletionClient<C> {
    pub fn new(client: ApiClient<C>, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    pub fn fetch<T, F>(&self, endpoint: Endpoint, completion: F) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, NetworkError>) + Send + 'static,
    {
        let client = self.client.clone();
        self.runtime
            .spawn(async move { completion(client.fetch(&endpoint).await) })
    }

    pub fn fetch_void<F>(&self, endpoint: Endpoint, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), NetworkError>) + Send + 'static,
    {
        let client = self.client.clone();
        self.runtime
            .spawn(async move { completion(client.fetch_void(&endpoint).await) })
    }

    pub fn upload<F>(
        &self,
        endpoint: Endpoint,
        data: Vec<u8>,
        mime_type: impl Into<String>,
        completion: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Result<Vec<u8>, NetworkError>) + Send + 'static,
    {
        let client = self.client.clone();
        let mime_type = mime_type.into();
        self.runtime.spawn(async move {
            completion(client.upload(&endpoint, data, &mime_type).await)
        })
    }

    pub fn download<F>(&self, endpoint: Endpoint, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<(Vec<u8>, ResponseMeta), NetworkError>) + Send + 'static,
    {
        let client = self.client.clone();
        self.runtime
            .spawn(async move { completion(client.download(&endpoint).await) })
    }
}

impl<C: Codec> ApiClient<C> {
    /// `fetch` as a one-item stream.
    pub fn fetch_stream<T>(&self, endpoint: Endpoint) -> BoxStream<'static, Result<T, NetworkError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        stream::once(async move { client.fetch(&endpoint).await }).boxed()
    }

    pub fn fetch_void_stream(
        &self,
        endpoint: Endpoint,
    ) -> BoxStream<'static, Result<(), NetworkError>> {
        let client = self.clone();
        stream::once(async move { client.fetch_void(&endpoint).await }).boxed()
    }

    pub fn upload_stream(
        &self,
        endpoint: Endpoint,
        data: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> BoxStream<'static, Result<Vec<u8>, NetworkError>> {
        let client = self.clone();
        let mime_type = mime_type.into();
        stream::once(async move { client.upload(&endpoint, data, &mime_type).await }).boxed()
    }

    pub fn download_stream(
        &self,
        endpoint: Endpoint,
    ) -> BoxStream<'static, Result<(Vec<u8>, ResponseMeta), NetworkError>> {
        let client = self.clone();
        stream::once(async move { client.download(&endpoint).await }).boxed()
    }
}
