//! Error types for request construction and response reading.
//!
//! # Design
//! Every failure is returned to the immediate caller. Request construction
//! stops at the first failing option; response reading stops at the first
//! failing step (carried transport error, then body read, then the matching
//! producer). Variants that happen after the body was read keep the bytes so
//! callers can still inspect what the server sent.

use bytes::Bytes;
use thiserror::Error;

/// Boxed error used for pluggable marshallers, unmarshalers and transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while building a request or reading a response.
#[derive(Debug, Error)]
pub enum Error {
    /// The address could not be parsed as a URL.
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    /// A header name or value is not acceptable on the wire.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// A marshalled body was requested but no value was supplied.
    #[error("no body to marshal")]
    NoBody,

    /// The marshaller failed to encode the body.
    #[error("bad body: {0}")]
    BadBody(#[source] BoxError),

    /// The transport call failed before a response was available.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Reading the response body failed. `partial` holds whatever was read.
    #[error("failed to read response body: {source}")]
    BodyRead {
        #[source]
        source: std::io::Error,
        partial: Bytes,
    },

    /// The matching producer could not decode the body.
    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: BoxError,
        raw: Bytes,
    },
}

impl Error {
    /// The response bytes attached to a read or decode failure, if any.
    pub fn raw(&self) -> Option<&Bytes> {
        match self {
            Error::BodyRead { partial, .. } => Some(partial),
            Error::Decode { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_address_wraps_parse_error() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert!(err.to_string().starts_with("invalid address"));
    }

    #[test]
    fn decode_error_keeps_raw_bytes() {
        let err = Error::Decode {
            source: "boom".into(),
            raw: Bytes::from_static(b"payload"),
        };
        assert_eq!(err.raw().map(|b| &b[..]), Some(&b"payload"[..]));
        assert_eq!(err.to_string(), "failed to decode response body: boom");
    }

    #[test]
    fn no_body_has_no_raw_bytes() {
        assert!(Error::NoBody.raw().is_none());
    }
}
