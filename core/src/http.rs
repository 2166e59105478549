//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The crate
//! builds `Request` values and reads `Response` values without ever touching
//! the network; the caller (host) executes the round-trip through whatever
//! `Transport` it owns. Fields are public so custom options can reach them.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::Result;

/// Rebuilds a fresh, independent copy of a request body.
///
/// Transports call this when the body has to be sent again, for example
/// after following a redirect.
pub type GetBody = Arc<dyn Fn() -> Body + Send + Sync>;

/// A request or response body.
pub enum Body {
    /// Explicitly empty. Rebuilds of an empty body also return `Empty`.
    Empty,
    /// A finite in-memory source read through its own cursor.
    Bytes(Cursor<Bytes>),
    /// Any other byte stream. Its length is unknown.
    Stream(Box<dyn Read + Send>),
}

impl Body {
    /// Wrap an arbitrary reader as a body of unknown length.
    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        Body::Stream(Box::new(reader))
    }

    /// Whether this is the explicit empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Number of unread bytes, when the body is held in memory.
    pub fn remaining(&self) -> Option<u64> {
        match self {
            Body::Empty => Some(0),
            Body::Bytes(cursor) => {
                let len = cursor.get_ref().len() as u64;
                Some(len.saturating_sub(cursor.position()))
            }
            Body::Stream(_) => None,
        }
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Body::Empty => Ok(0),
            Body::Bytes(cursor) => cursor.read(buf),
            Body::Stream(reader) => reader.read(buf),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Bytes(cursor) => f
                .debug_struct("Body::Bytes")
                .field("len", &cursor.get_ref().len())
                .field("position", &cursor.position())
                .finish(),
            Body::Stream(_) => f.write_str("Body::Stream(..)"),
        }
    }
}

impl From<Cursor<Bytes>> for Body {
    fn from(cursor: Cursor<Bytes>) -> Self {
        Body::Bytes(cursor)
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(Cursor::new(bytes))
    }
}

impl From<BytesMut> for Body {
    fn from(buf: BytesMut) -> Self {
        Body::from(buf.freeze())
    }
}

impl From<Vec<u8>> for Body {
    fn from(buf: Vec<u8>) -> Self {
        Body::from(Bytes::from(buf))
    }
}

impl From<&'static [u8]> for Body {
    fn from(buf: &'static [u8]) -> Self {
        Body::from(Bytes::from_static(buf))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::from(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Body::from(Bytes::from_static(text.as_bytes()))
    }
}

/// Where a request goes.
///
/// Absolute URLs are fully parsed. Anything that only parses against a base
/// (`""`, `/users`, `../up?x=1`) is kept as written for the transport to
/// resolve, and has no host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    Absolute(Url),
    Relative(String),
}

impl Address {
    /// Parse an absolute URL or a relative reference.
    pub fn parse(address: &str) -> Result<Self> {
        match Url::parse(address) {
            Ok(url) => Ok(Address::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                // Resolving against any base rejects references that are malformed.
                Url::parse("http://localhost/")?.join(address)?;
                Ok(Address::Relative(address.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The parsed URL, when the address is absolute.
    pub fn url(&self) -> Option<&Url> {
        match self {
            Address::Absolute(url) => Some(url),
            Address::Relative(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Address::Absolute(url) => url.as_str(),
            Address::Relative(reference) => reference,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Address::Absolute(url) => url.path(),
            Address::Relative(reference) => {
                let end = reference.find(['?', '#']).unwrap_or(reference.len());
                &reference[..end]
            }
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Address::Absolute(url) => url.query(),
            Address::Relative(reference) => {
                let before_fragment = reference.split('#').next().unwrap_or_default();
                before_fragment.split_once('?').map(|(_, query)| query)
            }
        }
    }

    /// Replace the query, keeping the path and fragment. `None` removes it.
    pub fn set_query(&mut self, query: Option<&str>) {
        match self {
            Address::Absolute(url) => url.set_query(query),
            Address::Relative(reference) => {
                let (rest, fragment) = match reference.split_once('#') {
                    Some((rest, fragment)) => (rest, Some(fragment)),
                    None => (reference.as_str(), None),
                };
                let mut out = rest.split('?').next().unwrap_or_default().to_string();
                if let Some(query) = query {
                    out.push('?');
                    out.push_str(query);
                }
                if let Some(fragment) = fragment {
                    out.push('#');
                    out.push_str(fragment);
                }
                *reference = out;
            }
        }
    }

    /// `host[:port]`, empty for relative references. `Url` already drops
    /// empty and default ports.
    fn authority(&self) -> String {
        let Some(url) = self.url() else {
            return String::new();
        };
        let host = url.host_str().unwrap_or_default();
        match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

impl From<Url> for Address {
    fn from(url: Url) -> Self {
        Address::Absolute(url)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by [`crate::request`] and the per-verb helpers. The caller hands it
/// to a transport for execution.
pub struct Request {
    pub method: Method,
    pub url: Address,
    /// Value for the `Host` header, `host[:port]` with empty ports stripped.
    /// Empty while the address is relative.
    pub host: String,
    pub headers: HeaderMap,
    pub body: Option<Body>,
    /// Known body length. `0` means unknown or empty unless the body is
    /// [`Body::Empty`].
    pub content_length: u64,
    pub get_body: Option<GetBody>,
}

impl Request {
    /// A request with no body and no headers.
    ///
    /// `address` may be relative or empty; a later address option can
    /// replace it.
    pub fn new(method: Method, address: &str) -> Result<Self> {
        let url = Address::parse(address)?;
        Ok(Self {
            method,
            host: url.authority(),
            url,
            headers: HeaderMap::new(),
            body: None,
            content_length: 0,
            get_body: None,
        })
    }

    /// Point the request at `url`, deriving the host from its authority.
    pub fn set_url(&mut self, url: impl Into<Address>) {
        let url = url.into();
        self.host = url.authority();
        self.url = url;
    }

    /// A fresh copy of the body, if the body can be rebuilt.
    pub fn rebuild_body(&self) -> Option<Body> {
        self.get_body.as_ref().map(|get_body| get_body())
    }

    /// Take the body, leaving the request without one.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("host", &self.host)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("content_length", &self.content_length)
            .field("get_body", &self.get_body.is_some())
            .finish()
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing a `Request`, then wrapped in
/// a [`crate::Reader`] for decoding.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Body>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Executes a request and returns the response.
///
/// The crate ships no implementation. Connection handling, TLS, redirects,
/// timeouts and cancellation all belong to the implementor.
pub trait Transport {
    type Error: Into<crate::error::BoxError>;

    fn send(&self, request: Request) -> std::result::Result<Response, Self::Error>;
}
