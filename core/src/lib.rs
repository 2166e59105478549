//! Functional options for building HTTP requests and reading HTTP responses.
//!
//! # Overview
//! A request is composed from small option values (address, headers, body)
//! applied in order; a response is read by a set of status-code conditions,
//! each paired with a producer that decodes the body. The caller's transport
//! executes the round-trip in between (host-does-IO pattern), so the crate is
//! synchronous and deterministic.
//!
//! ```no_run
//! use coldcall::{body, header, status, Transport};
//! # use coldcall::{Request, Response};
//! # struct Client;
//! # impl Transport for Client {
//! #     type Error = std::io::Error;
//! #     fn send(&self, _: Request) -> Result<Response, std::io::Error> { unimplemented!() }
//! # }
//!
//! #[derive(serde::Serialize)]
//! struct Greeting { message: String }
//!
//! #[derive(Default, serde::Deserialize)]
//! struct Echo { json: Option<serde_json::Value> }
//!
//! # fn run(client: &Client) -> Result<(), coldcall::Error> {
//! let req = coldcall::post(
//!     "http://localhost:3000/post",
//!     [
//!         header::content_type(header::APPLICATION_JSON),
//!         body::json(&Greeting { message: "hello world".into() }),
//!     ],
//! )?;
//!
//! let (value, _raw) = coldcall::response(client.send(req))
//!     .expect(status::is_200(), body::json_unmarshal(Echo::default))
//!     .read()?;
//! let echo = value.downcast::<Echo>().ok();
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `RequestOption` is the single option representation: an owned
//!   `FnOnce(&mut Request)`. Option families live in [`addr`], [`header`] and
//!   [`body`].
//! - Conditions ([`status`]) and producers are stateless `Arc` closures and
//!   can be shared across threads and readers.
//! - `Reader::read` consumes the reader; a response body is read once.

pub mod addr;
pub mod body;
pub mod client;
pub mod error;
pub mod header;
pub mod http;
pub mod option;
pub mod reader;
pub mod status;
pub mod types;

pub use client::{delete, get, patch, post, put, request};
pub use error::{BoxError, Error, Result};
pub use crate::http::{Address, Body, GetBody, Request, Response, Transport};
pub use option::RequestOption;
pub use reader::{produce, response, Reader};
pub use types::{Condition, Producer, Value};

pub use ::http::{HeaderMap, Method, StatusCode};
pub use bytes::Bytes;
pub use url::Url;
