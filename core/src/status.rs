//! Status-code conditions.

use std::sync::Arc;

use crate::http::Response;
use crate::types::Condition;

/// Holds when the status code equals `status`.
pub fn is(status: u16) -> Condition {
    Arc::new(move |response: &Response| response.status.as_u16() == status)
}

/// Holds when `start_inclusive <= status < end_exclusive`.
pub fn in_range(start_inclusive: u16, end_exclusive: u16) -> Condition {
    Arc::new(move |response: &Response| {
        let code = response.status.as_u16();
        code >= start_inclusive && code < end_exclusive
    })
}

/// Exactly 200 OK.
pub fn is_200() -> Condition {
    is(200)
}

/// 2xx.
pub fn is_success() -> Condition {
    in_range(200, 300)
}

/// 4xx and 5xx.
pub fn is_failure() -> Condition {
    in_range(400, 600)
}
