//! Header options.
//!
//! Header options append; they never replace. Applying `header("X-A", "1")`
//! and `header("X-A", "2")` leaves both values on the request, in order.

use http::header::{HeaderName, HeaderValue};

use crate::error::Error;
use crate::option::RequestOption;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const AUTHORIZATION: &str = "Authorization";

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";
pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Append `value` under `name`.
pub fn header(name: impl Into<String>, value: impl Into<String>) -> RequestOption {
    let name = name.into();
    let value = value.into();
    RequestOption::new(move |r| {
        let key = HeaderName::try_from(name.as_str()).map_err(|e| Error::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        let val = HeaderValue::try_from(value).map_err(|e| Error::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        r.headers.append(key, val);
        Ok(())
    })
}

/// Append a `Content-Type` header.
pub fn content_type(content_type: impl Into<String>) -> RequestOption {
    header(CONTENT_TYPE, content_type)
}

/// Append an `Accept` header.
pub fn accept(content_type: impl Into<String>) -> RequestOption {
    header(ACCEPT, content_type)
}

/// Append an `Authorization` header.
pub fn authorization(credentials: impl Into<String>) -> RequestOption {
    header(AUTHORIZATION, credentials)
}
