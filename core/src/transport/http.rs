//! `Transport` backed by a ureq agent.
//!
//! ureq is blocking, so each request runs on tokio's blocking pool. The
//! agent is configured not to treat 4xx/5xx as errors; status handling is
//! the classifier's job.

use std::io;

use async_trait::async_trait;
use tracing::trace;
use ureq::{Agent, ResponseExt};
use url::Url;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::{ResponseMeta, TransportOutcome, WireRequest};
use crate::transport::Transport;

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    max_response_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .new_agent();
        Self {
            agent,
            max_response_bytes: config.max_response_bytes,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: WireRequest) -> TransportOutcome {
        let agent = self.agent.clone();
        let limit = self.max_response_bytes;
        match tokio::task::spawn_blocking(move || run(&agent, request, limit)).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => TransportOutcome::Failed(TransportError::Cancelled),
            Err(err) => TransportOutcome::Failed(TransportError::Other(format!(
                "transport task failed: {err}"
            ))),
        }
    }
}

fn run(agent: &Agent, request: WireRequest, limit: u64) -> TransportOutcome {
    let mut builder = ureq::http::Request::builder()
        .method(request.method.as_str())
        .uri(request.url.as_str());
    for (name, value) in request.headers.iter() {
        builder = builder.header(name, value);
    }

    let sent = match request.body {
        Some(body) => builder.body(body).map(|req| agent.run(req)),
        None => builder.body(()).map(|req| agent.run(req)),
    };
    let mut response = match sent {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => return TransportOutcome::Failed(transport_error(err)),
        Err(err) => {
            return TransportOutcome::Failed(TransportError::InvalidRequest(err.to_string()))
        }
    };

    // ureq follows redirects; report where the bytes actually came from.
    let url = Url::parse(&response.get_uri().to_string()).unwrap_or(request.url);
    let mut meta = ResponseMeta::http(response.status().as_u16()).with_url(url);
    for (name, value) in response.headers() {
        meta.headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
    }

    let body = match response.body_mut().with_config().limit(limit).read_to_vec() {
        Ok(body) => body,
        Err(err) => return TransportOutcome::Failed(transport_error(err)),
    };
    trace!(status = ?meta.status, bytes = body.len(), "ureq response read");

    TransportOutcome::Completed {
        body: Some(body),
        meta: Some(meta),
    }
}

fn transport_error(err: ureq::Error) -> TransportError {
    match &err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connect(err.to_string())
        }
        ureq::Error::Io(io_err) => match io_err.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted => TransportError::Connect(io_err.to_string()),
            io::ErrorKind::TimedOut => TransportError::Timeout,
            _ => TransportError::Io(io_err.to_string()),
        },
        ureq::Error::BadUri(_) => TransportError::InvalidRequest(err.to_string()),
        _ => TransportError::Other(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::http::HttpMethod;

    /// Serve one canned raw response per connection, in order, and return
    /// the base URL.
    fn serve_raw(responses: Vec<&'static [u8]>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                stream.write_all(response).unwrap();
            }
        });
        base
    }

    fn get(url: &str) -> WireRequest {
        WireRequest::new(HttpMethod::Get, Url::parse(url).unwrap())
    }

    fn completed(outcome: TransportOutcome) -> (Option<Vec<u8>>, ResponseMeta) {
        match outcome {
            TransportOutcome::Completed { body, meta } => (body, meta.unwrap()),
            other => panic!("expected a response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_response_headers_are_all_kept() {
        let base = serve_raw(vec![&b"HTTP/1.1 200 OK\r\n\
            Set-Cookie: a=1\r\n\
            Set-Cookie: b=2\r\n\
            X-Raw: caf\xff\r\n\
            Content-Length: 2\r\n\
            Connection: close\r\n\
            \r\n\
            ok"[..]]);

        let outcome = UreqTransport::default().execute(get(&format!("{base}/"))).await;
        let (body, meta) = completed(outcome);
        assert_eq!(body.as_deref(), Some(&b"ok"[..]));
        let cookies: Vec<&str> = meta.headers.get_all("set-cookie").collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(meta.headers.get("x-raw"), Some("caf\u{fffd}"));
    }

    #[tokio::test]
    async fn metadata_reports_url_after_redirect() {
        let base = serve_raw(vec![
            &b"HTTP/1.1 302 Found\r\n\
              Location: /final\r\n\
              Content-Length: 0\r\n\
              Connection: close\r\n\r\n"[..],
            &b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\nConnection: close\r\n\r\ndone"[..],
        ]);

        let outcome = UreqTransport::default().execute(get(&format!("{base}/old"))).await;
        let (body, meta) = completed(outcome);
        assert_eq!(body.as_deref(), Some(&b"done"[..]));
        assert_eq!(meta.status, Some(200));
        assert_eq!(meta.url.as_ref().map(Url::path), Some("/final"));
    }

    #[tokio::test]
    async fn empty_body_is_reported_as_received() {
        let base = serve_raw(vec![
            &b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"[..],
        ]);

        let outcome = UreqTransport::default()
            .execute(get(&format!("{base}/empty.txt")))
            .await;
        let (body, meta) = completed(outcome);
        assert_eq!(body, Some(Vec::new()));
        assert_eq!(meta.status, Some(200));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_failure() {
        // Port 9 (discard) on loopback is closed in test environments.
        let transport = UreqTransport::default();
        let outcome = transport.execute(get("http://127.0.0.1:9/")).await;
        assert!(matches!(outcome, TransportOutcome::Failed(_)), "{outcome:?}");
    }

    #[test]
    fn io_errors_map_by_kind() {
        let refused = ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(matches!(transport_error(refused), TransportError::Connect(_)));

        let timed_out = ureq::Error::Io(io::Error::from(io::ErrorKind::TimedOut));
        assert_eq!(transport_error(timed_out), TransportError::Timeout);

        let other = ureq::Error::Io(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(transport_error(other), TransportError::Io(_)));
    }
}
