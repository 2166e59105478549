//! Rule-driven response decoding.
//!
//! # Design
//! A `Reader` wraps whatever the transport returned, response or error, so it
//! can be chained directly onto the transport call. Rules are
//! `(Condition, Producer)` pairs evaluated in registration order; the first
//! matching rule decodes the body and no later rule is consulted, even when
//! decoding fails. With no match the raw bytes come back as the value.
//!
//! `read` takes `self`: the body stream is drained once, so a reader is
//! single-use by construction.

use std::any::Any;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{BoxError, Error, Result};
use crate::http::Response;
use crate::types::{Condition, Producer, Value};

/// Wrap a transport result for rule-based reading.
///
/// Shorthand for [`Reader::new`].
pub fn response<E: Into<BoxError>>(result: std::result::Result<Response, E>) -> Reader {
    Reader::new(result)
}

/// Compose a [`Producer`] from a constructor and an unmarshaler.
///
/// Every invocation builds a fresh target with `constructor` before
/// unmarshaling into it, so one producer can serve any number of reads.
pub fn produce<T, C, U, E>(constructor: C, unmarshaler: U) -> Producer
where
    T: Any + Send,
    C: Fn() -> T + Send + Sync + 'static,
    U: Fn(&[u8], &mut T) -> std::result::Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Arc::new(move |raw: &[u8]| -> std::result::Result<Value, BoxError> {
        let mut target = constructor();
        if let Err(e) = unmarshaler(raw, &mut target) {
            return Err(e.into());
        }
        Ok(Value::new(target))
    })
}

struct Rule {
    condition: Condition,
    producer: Producer,
}

/// Builder for reading one response.
pub struct Reader {
    result: Result<Response>,
    rules: Vec<Rule>,
}

impl Reader {
    pub fn new<E: Into<BoxError>>(result: std::result::Result<Response, E>) -> Self {
        Self {
            result: result.map_err(|e| Error::Transport(e.into())),
            rules: Vec::new(),
        }
    }

    /// The response the transport returned, if any.
    pub fn original(&self) -> Option<&Response> {
        self.result.as_ref().ok()
    }

    /// The transport error carried into this reader, if any.
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }

    /// Decode with `producer` when `condition` holds.
    ///
    /// Rules are tried in the order they were added; when conditions
    /// overlap, the first one wins.
    pub fn expect(mut self, condition: Condition, producer: Producer) -> Self {
        self.rules.push(Rule { condition, producer });
        self
    }

    /// Read the body and decode it with the first matching rule.
    ///
    /// Returns the decoded value and the raw body. When no rule matches, the
    /// value is the raw body as [`Bytes`].
    pub fn read(self) -> Result<(Value, Bytes)> {
        let mut response = self.result?;

        debug!(status = %response.status, rules = self.rules.len(), "reading response");

        let mut buf = Vec::new();
        if let Err(source) = response.body.read_to_end(&mut buf) {
            return Err(Error::BodyRead {
                source,
                partial: Bytes::from(buf),
            });
        }
        let raw = Bytes::from(buf);

        for (index, rule) in self.rules.iter().enumerate() {
            if !(rule.condition)(&response) {
                continue;
            }
            trace!(rule = index, len = raw.len(), "rule matched");
            return match (rule.producer)(&raw) {
                Ok(value) => Ok((value, raw)),
                Err(source) => Err(Error::Decode { source, raw }),
            };
        }

        trace!(len = raw.len(), "no rule matched, returning raw body");
        Ok((Value::new(raw.clone()), raw))
    }
}
