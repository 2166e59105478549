//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then sends requests built with
//! coldcall options through a ureq-backed `Transport` and reads the responses
//! with status-based rules.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::OnceLock;

use bytes::Bytes;
use coldcall::{addr, body, header, status, Error, Method, Request, Response, Transport};
use mock_server::{Echo, StatusReport};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct Greeting {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct Failure {
    code: u16,
    reason: String,
}

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data and the reader rules decide what they mean.
struct Ureq {
    agent: ureq::Agent,
}

impl Ureq {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for Ureq {
    type Error = ureq::Error;

    fn send(&self, mut req: Request) -> Result<Response, ureq::Error> {
        let url = req.url.to_string();
        let mut payload = Vec::new();
        if let Some(mut body) = req.take_body() {
            body.read_to_end(&mut payload)?;
        }

        let mut response = if req.method == Method::GET {
            let mut builder = self.agent.get(&url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.to_str().unwrap_or_default());
            }
            builder.call()?
        } else if req.method == Method::DELETE {
            let mut builder = self.agent.delete(&url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.to_str().unwrap_or_default());
            }
            builder.call()?
        } else {
            let mut builder = match req.method {
                Method::PUT => self.agent.put(&url),
                Method::PATCH => self.agent.patch(&url),
                _ => self.agent.post(&url),
            };
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.to_str().unwrap_or_default());
            }
            builder.send(&payload[..])?
        };

        let status = response.status();
        let headers = response.headers().clone();
        let raw = response.body_mut().read_to_vec()?;
        Ok(Response {
            status,
            headers,
            body: coldcall::Body::from(Cursor::new(Bytes::from(raw))),
        })
    }
}

/// Base URL of a mock server shared by every test in this file.
fn base_url() -> &'static str {
    static BASE: OnceLock<String> = OnceLock::new();
    BASE.get_or_init(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });

        format!("http://{addr}")
    })
}

#[test]
fn get_with_query_map() {
    let req = coldcall::get(
        &format!("{}/get", base_url()),
        [addr::with_query_map([("foo", "bar"), ("lang", "rust")])],
    )
    .unwrap();

    let (value, raw) = coldcall::response(Ureq::new().send(req))
        .expect(status::is_200(), body::json_unmarshal(Echo::default))
        .read()
        .unwrap();

    let echo = value.downcast::<Echo>().unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.args.get("foo").map(String::as_str), Some("bar"));
    assert_eq!(echo.args.get("lang").map(String::as_str), Some("rust"));
    assert!(!raw.is_empty());
}

#[test]
fn post_json() {
    let req = coldcall::post(
        &format!("{}/post", base_url()),
        [
            header::content_type(header::APPLICATION_JSON),
            body::json(&Greeting {
                message: "hello world".to_string(),
            }),
        ],
    )
    .unwrap();

    let (value, _) = coldcall::response(Ureq::new().send(req))
        .expect(status::is_200(), body::json_unmarshal(Echo::default))
        .read()
        .unwrap();

    let echo = value.downcast::<Echo>().unwrap();
    assert_eq!(echo.json.unwrap()["message"], "hello world");
}

#[test]
fn post_form() {
    let req = coldcall::post(
        &format!("{}/post", base_url()),
        [
            header::content_type(header::APPLICATION_FORM_URLENCODED),
            body::form_map([("foo", "bar"), ("note", "a & b")]),
        ],
    )
    .unwrap();

    let (value, _) = coldcall::response(Ureq::new().send(req))
        .expect(status::is_200(), body::json_unmarshal(Echo::default))
        .read()
        .unwrap();

    let echo = value.downcast::<Echo>().unwrap();
    let expected: BTreeMap<String, String> = [("foo", "bar"), ("note", "a & b")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(echo.form, expected);
}

#[test]
fn repeated_header_reaches_the_server_twice() {
    let req = coldcall::put(
        &format!("{}/put", base_url()),
        [
            header::header("X-Trace", "first"),
            header::header("X-Trace", "second"),
            header::accept(header::APPLICATION_JSON),
            body::reader("payload"),
        ],
    )
    .unwrap();

    let (value, _) = coldcall::response(Ureq::new().send(req))
        .expect(status::is_200(), body::json_unmarshal(Echo::default))
        .read()
        .unwrap();

    let echo = value.downcast::<Echo>().unwrap();
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.headers["x-trace"], vec!["first", "second"]);
    assert_eq!(echo.data, "payload");
}

#[test]
fn failure_status_uses_the_failure_producer() {
    let req = coldcall::get(&format!("{}/status/404", base_url()), []).unwrap();

    let (value, _) = coldcall::response(Ureq::new().send(req))
        .expect(status::is_200(), body::json_unmarshal(Echo::default))
        .expect(status::is_failure(), body::json_unmarshal(Failure::default))
        .read()
        .unwrap();

    let failure = value.downcast::<Failure>().unwrap();
    assert_eq!(failure.code, 404);
    assert_eq!(failure.reason, "Not Found");
}

#[test]
fn unmatched_status_returns_raw_bytes() {
    let req = coldcall::delete(&format!("{}/status/418", base_url()), []).unwrap();

    let (value, raw) = coldcall::response(Ureq::new().send(req))
        .expect(status::is_success(), body::json_unmarshal(Echo::default))
        .expect(status::in_range(500, 600), body::json_unmarshal(Failure::default))
        .read()
        .unwrap();

    assert_eq!(value.downcast_ref::<Bytes>(), Some(&raw));
    let report: StatusReport = serde_json::from_slice(&raw).unwrap();
    assert_eq!(report.code, 418);
}

#[test]
fn connection_failure_is_a_transport_error() {
    // Bind then drop to find a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let req = coldcall::get(&format!("http://127.0.0.1:{port}/get"), []).unwrap();

    let reader = coldcall::response(Ureq::new().send(req))
        .expect(status::is_200(), body::json_unmarshal(Echo::default));
    assert!(reader.original().is_none());

    let err = reader.read().unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
