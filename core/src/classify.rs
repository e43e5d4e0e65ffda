//! Maps a raw `TransportOutcome` to a typed result or a `NetworkError`.
//!
//! # Design
//! Every call shape shares the same prelude, applied in a fixed order:
//!
//! 1. transport failure → `Unknown` (cause kept as the error source)
//! 2. missing or non-HTTP metadata → `Unknown`
//! 3. status outside 200..=299 → `Server { status, body }`
//!
//! and then diverges on what it expects from the body. The order matters: a
//! 500 with an empty body is a `Server` error, not `NoData`.
//!
//! `classify_download` skips steps 2 and 3: it returns whatever bytes arrived
//! together with the metadata, whatever the status. Callers that want the
//! uniform behaviour use `classify_download_checked`.
//!
//! Typed fetches, uploads and `Server` error bodies treat an empty body as no
//! body. Downloads keep the distinction, so an empty file is a success.

use serde::de::DeserializeOwned;

use crate::codec::Codec;
use crate::error::NetworkError;
use crate::http::{ResponseMeta, TransportOutcome};

/// A 2xx HTTP response that passed the shared prelude.
#[derive(Debug)]
struct Success {
    body: Option<Vec<u8>>,
    meta: ResponseMeta,
}

fn check_http(outcome: TransportOutcome) -> Result<Success, NetworkError> {
    let (body, meta) = match outcome {
        TransportOutcome::Failed(cause) => return Err(NetworkError::unknown(Some(cause))),
        TransportOutcome::Completed { body, meta } => (body, meta),
    };
    let Some(meta) = meta else {
        return Err(NetworkError::unknown(None));
    };
    let Some(status) = meta.status else {
        return Err(NetworkError::unknown(None));
    };
    if !(200..=299).contains(&status) {
        return Err(NetworkError::Server {
            status,
            body: non_empty(body),
        });
    }
    Ok(Success { body, meta })
}

fn non_empty(body: Option<Vec<u8>>) -> Option<Vec<u8>> {
    body.filter(|bytes| !bytes.is_empty())
}

/// Decode a 2xx body into `T`.
pub fn classify_decoded<T, C>(outcome: TransportOutcome, codec: &C) -> Result<T, NetworkError>
where
    T: DeserializeOwned,
    C: Codec,
{
    let bytes = non_empty(check_http(outcome)?.body).ok_or(NetworkError::NoData)?;
    codec.decode(&bytes).map_err(NetworkError::Decoding)
}

/// Return a 2xx body as raw bytes.
pub fn classify_bytes(outcome: TransportOutcome) -> Result<Vec<u8>, NetworkError> {
    non_empty(check_http(outcome)?.body).ok_or(NetworkError::NoData)
}

/// Accept any 2xx response, ignoring the body.
pub fn classify_void(outcome: TransportOutcome) -> Result<(), NetworkError> {
    check_http(outcome).map(|_| ())
}

/// Return body and metadata verbatim, for any status.
pub fn classify_download(
    outcome: TransportOutcome,
) -> Result<(Vec<u8>, ResponseMeta), NetworkError> {
    match outcome {
        TransportOutcome::Failed(cause) => Err(NetworkError::unknown(Some(cause))),
        TransportOutcome::Completed { body, meta } => match (body, meta) {
            (Some(bytes), Some(meta)) => Ok((bytes, meta)),
            _ => Err(NetworkError::NoData),
        },
    }
}

/// Like `classify_download`, but non-2xx and non-HTTP responses fail the
/// same way they do for the other call shapes.
pub fn classify_download_checked(
    outcome: TransportOutcome,
) -> Result<(Vec<u8>, ResponseMeta), NetworkError> {
    let Success { body, meta } = check_http(outcome)?;
    let bytes = body.ok_or(NetworkError::NoData)?;
    Ok((bytes, meta))
}
