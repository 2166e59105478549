//! Function-type contracts shared by the request and response sides.
//!
//! # Design
//! Conditions and producers are reference-counted closures with no interior
//! state, so one instance can be attached to any number of readers on any
//! number of threads. Decoded values are type-erased because a single reader
//! may decode a success body and an error body into different types.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::http::Response;

/// Decides whether a response should be decoded by the paired producer.
pub type Condition = Arc<dyn Fn(&Response) -> bool + Send + Sync>;

/// Turns raw response bytes into a decoded value.
///
/// Usually composed with [`crate::produce`] from a constructor and an
/// unmarshaler rather than written by hand.
pub type Producer = Arc<dyn Fn(&[u8]) -> Result<Value, BoxError> + Send + Sync>;

/// A decoded response value of any type.
///
/// When no rule matched, the value is the raw body as [`bytes::Bytes`].
pub struct Value(Box<dyn Any + Send>);

impl Value {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Recover the concrete value, or get `self` back if the type differs.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        self.0.downcast::<T>().map(|value| *value).map_err(Self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Value(..)")
    }
}
