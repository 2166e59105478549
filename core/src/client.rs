//! Request construction from functional options.
//!
//! # Design
//! `request` parses the address into a bare request (no body, no headers)
//! and applies each option in order. The first failing option aborts
//! construction; nothing is rolled back because the partial request is
//! dropped. The per-verb helpers only fix the method.

use http::Method;
use tracing::debug;

use crate::error::Result;
use crate::http::Request;
use crate::option::RequestOption;

/// Build a request for `method` and `url`, then apply `options` in order.
///
/// `url` may be relative or empty. Fails with
/// [`crate::Error::InvalidAddress`] when it does not parse, or
/// with the error of the first option that fails.
pub fn request<I>(method: Method, url: &str, options: I) -> Result<Request>
where
    I: IntoIterator<Item = RequestOption>,
{
    let mut req = Request::new(method, url)?;
    let mut applied = 0usize;
    for option in options {
        option.apply(&mut req)?;
        applied += 1;
    }
    debug!(
        method = %req.method,
        url = %req.url,
        options = applied,
        content_length = req.content_length,
        "request built"
    );
    Ok(req)
}

pub fn get<I: IntoIterator<Item = RequestOption>>(url: &str, options: I) -> Result<Request> {
    request(Method::GET, url, options)
}

pub fn post<I: IntoIterator<Item = RequestOption>>(url: &str, options: I) -> Result<Request> {
    request(Method::POST, url, options)
}

pub fn put<I: IntoIterator<Item = RequestOption>>(url: &str, options: I) -> Result<Request> {
    request(Method::PUT, url, options)
}

pub fn patch<I: IntoIterator<Item = RequestOption>>(url: &str, options: I) -> Result<Request> {
    request(Method::PATCH, url, options)
}

pub fn delete<I: IntoIterator<Item = RequestOption>>(url: &str, options: I) -> Result<Request> {
    request(Method::DELETE, url, options)
}
