//! The seam between the client and whatever performs network I/O.
//!
//! Available transports:
//! - `http` - blocking ureq agent driven from tokio's blocking pool
//!   (requires the `ureq` feature, on by default)
//!
//! Anything else (a platform stack, a recorded-response stub) only needs to
//! implement `Transport`.

use async_trait::async_trait;

use crate::http::{TransportOutcome, WireRequest};

#[cfg(feature = "ureq")]
pub mod http;

/// Executes a `WireRequest` and reports what came back.
///
/// Implementations never classify responses: non-2xx statuses are returned
/// as `TransportOutcome::Completed`, and only failures to obtain a response
/// at all are `TransportOutcome::Failed`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: WireRequest) -> TransportOutcome;

    /// Send `request.body` as an upload. Defaults to `execute`.
    async fn upload(&self, request: WireRequest) -> TransportOutcome {
        self.execute(request).await
    }

    /// Fetch a resource for download. Defaults to `execute`.
    async fn download(&self, request: WireRequest) -> TransportOutcome {
        self.execute(request).await
    }
}
