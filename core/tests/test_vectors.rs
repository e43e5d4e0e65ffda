//! Verify request building and response classification against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each build vector describes an endpoint and the wire request (or error) it
//! must produce; each classify vector describes a simulated transport outcome
//! and the result a given call shape must report. Bodies are compared as
//! parsed JSON to avoid false negatives from field ordering.

use apiclient_core::classify;
use apiclient_core::request;
use apiclient_core::{
    Endpoint, HttpMethod, JsonCodec, NetworkError, ParameterEncoding, Parameters, ResponseMeta,
    TransportError, TransportOutcome,
};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        "PATCH" => HttpMethod::Patch,
        "HEAD" => HttpMethod::Head,
        "OPTIONS" => HttpMethod::Options,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn error_name(err: &NetworkError) -> &'static str {
    match err {
        NetworkError::InvalidUrl(_) => "InvalidUrl",
        NetworkError::Encoding(_) => "Encoding",
        NetworkError::Server { .. } => "Server",
        NetworkError::NoData => "NoData",
        NetworkError::Decoding(_) => "Decoding",
        NetworkError::Unknown { .. } => "Unknown",
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

fn endpoint_from(def: &Value) -> Result<Endpoint, NetworkError> {
    let mut builder = Endpoint::builder(
        def["base_url"].as_str().unwrap(),
        def["path"].as_str().unwrap(),
    )
    .method(parse_method(def["method"].as_str().unwrap()));

    for (name, value) in pairs(&def["headers"]) {
        builder = builder.header(name, value);
    }
    if !def["parameters"].is_null() {
        let parameters: Parameters = serde_json::from_value(def["parameters"].clone()).unwrap();
        builder = builder.parameters(parameters);
    }
    builder = builder.encoding(match def["encoding"].as_str().unwrap() {
        "url" => ParameterEncoding::UrlEncoded,
        "json" => ParameterEncoding::JsonEncoded,
        other => panic!("unknown encoding: {other}"),
    });
    builder.build()
}

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = endpoint_from(&case["endpoint"]).and_then(|e| request::build(&e, &JsonCodec));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(error_name(&err), expected_error.as_str().unwrap(), "{name}: error kind");
            continue;
        }

        let req = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));
        let expected_req = &case["expected_request"];
        let method = parse_method(expected_req["method"].as_str().unwrap());
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url.as_str(), expected_req["url"].as_str().unwrap(), "{name}: url");

        let headers: Vec<(String, String)> = req
            .headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(headers, pairs(&expected_req["headers"]), "{name}: headers");

        match req.body.as_deref() {
            None => assert!(expected_req["body"].is_null(), "{name}: body should be present"),
            Some(bytes) => {
                let body: Value = serde_json::from_slice(bytes).unwrap();
                assert_eq!(body, expected_req["body"], "{name}: body");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Classify
// ---------------------------------------------------------------------------

fn outcome_from(def: &Value) -> TransportOutcome {
    if let Some(message) = def.get("transport_error") {
        let message = message.as_str().unwrap().to_string();
        return TransportOutcome::Failed(TransportError::Other(message));
    }
    let body = def["body"].as_str().map(|s| s.as_bytes().to_vec());
    let meta = if def.get("no_meta").is_some() {
        None
    } else {
        match def["status"].as_u64() {
            Some(status) => Some(ResponseMeta::http(status as u16)),
            None => Some(ResponseMeta::default()),
        }
    };
    TransportOutcome::Completed { body, meta }
}

/// Run one call shape and reduce its success value to JSON for comparison.
fn classify_as(
    shape: &str,
    outcome: TransportOutcome,
) -> Result<(Value, Option<u16>), NetworkError> {
    let text = |bytes: Vec<u8>| Value::String(String::from_utf8(bytes).unwrap());
    match shape {
        "fetch" => classify::classify_decoded::<Value, _>(outcome, &JsonCodec).map(|v| (v, None)),
        "fetch_void" => classify::classify_void(outcome).map(|()| (Value::Null, None)),
        "upload" => classify::classify_bytes(outcome).map(|b| (text(b), None)),
        "download" => classify::classify_download(outcome).map(|(b, meta)| (text(b), meta.status)),
        "download_checked" => {
            classify::classify_download_checked(outcome).map(|(b, meta)| (text(b), meta.status))
        }
        other => panic!("unknown shape: {other}"),
    }
}

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let shape = case["shape"].as_str().unwrap();
        let expected = &case["expected"];
        let result = classify_as(shape, outcome_from(&case["outcome"]));

        if let Some(expected_error) = expected.get("error") {
            let err = result.unwrap_err();
            assert_eq!(error_name(&err), expected_error.as_str().unwrap(), "{name}: error kind");
            if let NetworkError::Server { status, body } = &err {
                let expected_status = expected["status"].as_u64().unwrap();
                assert_eq!(u64::from(*status), expected_status, "{name}: status");
                let body = body.as_ref().map(|b| String::from_utf8(b.clone()).unwrap());
                assert_eq!(body.as_deref(), expected["body"].as_str(), "{name}: error body");
            }
        } else {
            let (value, status) =
                result.unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));
            assert_eq!(value, expected["ok"], "{name}: value");
            if let Some(expected_status) = expected.get("status") {
                assert_eq!(status.map(u64::from), expected_status.as_u64(), "{name}: status");
            }
        }
    }
}
