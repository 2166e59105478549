//! The request option type.

use std::fmt;

use crate::error::Result;
use crate::http::Request;

/// A single modification applied to a [`Request`] before it hits the wire.
///
/// Options are applied once, in the order given, and consumed by the
/// application. Build custom ones with [`RequestOption::new`].
pub struct RequestOption(Box<dyn FnOnce(&mut Request) -> Result<()> + Send>);

impl RequestOption {
    pub fn new(apply: impl FnOnce(&mut Request) -> Result<()> + Send + 'static) -> Self {
        Self(Box::new(apply))
    }

    /// Modify `request` in place.
    pub fn apply(self, request: &mut Request) -> Result<()> {
        (self.0)(request)
    }
}

impl fmt::Debug for RequestOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestOption(..)")
    }
}
