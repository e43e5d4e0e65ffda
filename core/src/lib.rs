//! Declarative HTTP API client core.
//!
//! # Overview
//! Callers describe a call as an `Endpoint` (method, path, headers,
//! parameters, encoding strategy). `ApiClient` turns it into a `WireRequest`,
//! hands that to a `Transport` for the actual I/O, and classifies the raw
//! `TransportOutcome` into a typed value or a `NetworkError`.
//!
//! # Design
//! - Request building (`request`, `encoding`) and response classification
//!   (`classify`) are pure and synchronous; the transport call is the only
//!   suspension point.
//! - `Transport` and `Codec` are traits, so the network stack and the
//!   serialization format are swappable. `UreqTransport` (feature `ureq`)
//!   and `JsonCodec` are the defaults.
//! - Four call shapes: typed fetch, void fetch, upload, download. Callback
//!   and stream front ends live in `adapter` and reuse the same pipeline.
//!
//! ```no_run
//! use apiclient_core::{ApiClient, Endpoint, NetworkError};
//!
//! # async fn run() -> Result<(), NetworkError> {
//! let client = ApiClient::from_env();
//! let endpoint = Endpoint::builder("https://api.example.com/v1/", "users")
//!     .parameter("page", 2)
//!     .build()?;
//! let users: Vec<serde_json::Value> = client.fetch(&endpoint).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod classify;
pub mod client;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use adapter::CompletionClient;
pub use client::ApiClient;
pub use codec::{Codec, JsonCodec};
pub use config::TransportConfig;
pub use encoding::{CustomEncoder, ParameterEncoding, Parameters};
pub use endpoint::{Endpoint, EndpointBuilder};
pub use error::{CodecError, NetworkError, TransportError};
pub use http::{Headers, HttpMethod, ResponseMeta, TransportOutcome, WireRequest};
pub use transport::Transport;

#[cfg(feature = "ureq")]
pub use transport::http::UreqTransport;
