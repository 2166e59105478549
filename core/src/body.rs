//! Body options and the stock unmarshalers.
//!
//! # Design
//! Every request-side helper funnels into [`reader`], which decides whether
//! the body can be replayed. In-memory bodies get an exact content length and
//! a rebuild function that clones the cursor: a refcount bump on the shared
//! bytes plus the current position, so the rebuilt body starts where the
//! original did no matter how far the original has been read since.
//!
//! None of these options touch headers; pair them with
//! [`crate::header::content_type`].

use std::sync::Arc;

use serde::Serialize;

use crate::error::{BoxError, Error};
use crate::http::{Body, GetBody, Request};
use crate::option::RequestOption;

#[cfg(any(feature = "json", feature = "xml"))]
use crate::reader::produce;
#[cfg(any(feature = "json", feature = "xml"))]
use crate::types::Producer;
#[cfg(any(feature = "json", feature = "xml"))]
use serde::de::DeserializeOwned;
#[cfg(any(feature = "json", feature = "xml"))]
use std::any::Any;

/// Set `body` as the request body.
///
/// In-memory sources (`Bytes`, `BytesMut`, `Vec<u8>`, `String`, static
/// slices and strings, or a `Cursor<Bytes>`) set `content_length` and
/// `get_body`. Streams wrapped with [`Body::stream`] leave the length unknown
/// and cannot be rebuilt.
pub fn reader(body: impl Into<Body>) -> RequestOption {
    let body = body.into();
    RequestOption::new(move |r| {
        attach(r, body);
        Ok(())
    })
}

fn attach(req: &mut Request, body: Body) {
    req.content_length = body.remaining().unwrap_or(0);
    req.get_body = match &body {
        Body::Bytes(cursor) => {
            let snapshot = cursor.clone();
            let get_body: GetBody = Arc::new(move || Body::Bytes(snapshot.clone()));
            Some(get_body)
        }
        Body::Empty => Some(empty_get_body()),
        Body::Stream(_) => None,
    };
    req.body = Some(body);

    // Replayable and empty: use the explicit empty sentinel for both.
    if req.get_body.is_some() && req.content_length == 0 {
        req.body = Some(Body::Empty);
        req.get_body = Some(empty_get_body());
    }
}

fn empty_get_body() -> GetBody {
    Arc::new(|| Body::Empty)
}

/// Encode `body` with `marshaller` and set the result as the request body.
///
/// `None` fails with [`Error::NoBody`]; a marshaller error fails with
/// [`Error::BadBody`]. Any function shaped like `serde_json::to_vec` plugs
/// in directly. Encoding happens here, the error surfaces when the option is
/// applied.
pub fn marshal<T, M, E>(body: Option<&T>, marshaller: M) -> RequestOption
where
    T: ?Sized,
    M: FnOnce(&T) -> Result<Vec<u8>, E>,
    E: Into<BoxError>,
{
    let rendered = match body {
        None => Err(Error::NoBody),
        Some(value) => marshaller(value).map_err(|e| Error::BadBody(e.into())),
    };
    RequestOption::new(move |r| {
        attach(r, Body::from(rendered?));
        Ok(())
    })
}

/// Marshal `body` as JSON. Does not set `Content-Type`.
#[cfg(feature = "json")]
pub fn json<T: Serialize + ?Sized>(body: &T) -> RequestOption {
    marshal(Some(body), |v: &T| serde_json::to_vec(v))
}

/// Marshal `body` as XML, rooted at the type name. Does not set `Content-Type`.
#[cfg(feature = "xml")]
pub fn xml<T: Serialize + ?Sized>(body: &T) -> RequestOption {
    marshal(Some(body), |v: &T| quick_xml::se::to_string(v).map(String::into_bytes))
}

/// URL-encode `values` as the request body. Does not set `Content-Type`.
///
/// Slices of pairs keep their order; structs and maps serialize their fields.
pub fn form<T: Serialize + ?Sized>(values: &T) -> RequestOption {
    marshal(Some(values), |v: &T| serde_urlencoded::to_string(v).map(String::into_bytes))
}

/// URL-encode `kv` with unique keys in sorted order.
pub fn form_map<K, V>(kv: impl IntoIterator<Item = (K, V)>) -> RequestOption
where
    K: Into<String>,
    V: Into<String>,
{
    let values: std::collections::BTreeMap<String, String> =
        kv.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    form(&values)
}

/// Unmarshaler that decodes JSON into `target`.
///
/// `target` is replaced by the decoded value, not merged into.
#[cfg(feature = "json")]
pub fn json_into<T: DeserializeOwned>(raw: &[u8], target: &mut T) -> Result<(), serde_json::Error> {
    *target = serde_json::from_slice(raw)?;
    Ok(())
}

/// Unmarshaler that decodes XML into `target`.
///
/// `target` is replaced by the decoded value, not merged into.
#[cfg(feature = "xml")]
pub fn xml_into<T: DeserializeOwned>(raw: &[u8], target: &mut T) -> Result<(), quick_xml::de::DeError> {
    *target = quick_xml::de::from_reader(raw)?;
    Ok(())
}

/// Producer decoding JSON into a fresh value from `constructor` on every read.
///
/// The constructor only picks the target type: its value is overwritten by
/// the decoded one, so fields it pre-fills do not survive. A field missing
/// from the body fails decoding unless the type marks it `#[serde(default)]`.
#[cfg(feature = "json")]
pub fn json_unmarshal<T, C>(constructor: C) -> Producer
where
    T: DeserializeOwned + Any + Send,
    C: Fn() -> T + Send + Sync + 'static,
{
    produce(constructor, json_into::<T>)
}

/// Producer decoding XML into a fresh value from `constructor` on every read.
///
/// As with `json_unmarshal`, the constructed value is replaced, not filled
/// in; missing fields need `#[serde(default)]`.
#[cfg(feature = "xml")]
pub fn xml_unmarshal<T, C>(constructor: C) -> Producer
where
    T: DeserializeOwned + Any + Send,
    C: Fn() -> T + Send + Sync + 'static,
{
    produce(constructor, xml_into::<T>)
}
