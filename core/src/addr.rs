//! Address options.
//!
//! Each option replaces the request address (and the derived host) as a
//! whole, except [`with_query_map`], which only rewrites the query of the
//! address the request already has. String addresses may be relative.

use std::collections::BTreeMap;
use std::fmt;

use url::{form_urlencoded, Url};

use crate::http::Address;
use crate::option::RequestOption;

/// Set the request address.
pub fn url(u: Url) -> RequestOption {
    RequestOption::new(move |r| {
        r.set_url(u);
        Ok(())
    })
}

/// Parse `address`, absolute or relative, and set it as the request address.
pub fn string(address: impl Into<String>) -> RequestOption {
    let address = address.into();
    RequestOption::new(move |r| {
        r.set_url(Address::parse(&address)?);
        Ok(())
    })
}

/// Render the address from format arguments, e.g.
/// `addr::format(format_args!("http://{host}/users/{id}"))`.
pub fn format(args: fmt::Arguments<'_>) -> RequestOption {
    string(args.to_string())
}

/// Parse `base` and replace its query with `params`, in the order given.
pub fn with_query<K, V>(base: &str, params: impl IntoIterator<Item = (K, V)>) -> RequestOption
where
    K: Into<String>,
    V: Into<String>,
{
    let base = base.to_string();
    let pairs: Vec<(String, String)> = params.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    RequestOption::new(move |r| {
        let mut u = Address::parse(&base)?;
        set_query(&mut u, &pairs);
        r.set_url(u);
        Ok(())
    })
}

/// Replace the query of the current request address.
///
/// Keys are unique (the last value wins) and emitted in sorted order. Only
/// one value per key is supported.
pub fn with_query_map<K, V>(params: impl IntoIterator<Item = (K, V)>) -> RequestOption
where
    K: Into<String>,
    V: Into<String>,
{
    let map: BTreeMap<String, String> = params.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    RequestOption::new(move |r| {
        let mut u = r.url.clone();
        let pairs: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        set_query(&mut u, &pairs);
        r.set_url(u);
        Ok(())
    })
}

fn set_query<K, V>(u: &mut Address, pairs: &[(K, V)])
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if pairs.is_empty() {
        u.set_query(None);
        return;
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish();
    u.set_query(Some(&query));
}
