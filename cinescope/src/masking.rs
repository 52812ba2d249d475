//! Redaction of credentials in the diagnostic transcript.
//!
//! Off by default so transcripts match what went over the wire. Enabled from
//! `mask_sensitive` in `cinescope.toml` or `CINESCOPE_MASK_SENSITIVE`.

use http::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

const MASK: &str = "*****";

static MASK_SENSITIVE: AtomicBool = AtomicBool::new(false);

pub fn set_mask_sensitive(enabled: bool) {
    MASK_SENSITIVE.store(enabled, Ordering::Relaxed);
}

pub fn should_mask_sensitive() -> bool {
    MASK_SENSITIVE.load(Ordering::Relaxed)
}

const SENSITIVE_QUERY_PARAMS: &[&str] = &["access_token", "token", "password", "secret"];

const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// JSON keys whose values are replaced, compared case-insensitively.
const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "passwordrepeat",
    "accesstoken",
    "refreshtoken",
    "cardnumber",
    "securitycode",
];

fn is_sensitive(candidates: &[&str], name: &str) -> bool {
    let name = name.to_lowercase();
    candidates.iter().any(|c| *c == name)
}

/// Masks sensitive query parameter values, leaving the rest of the raw
/// query string untouched.
pub fn mask_url(url: &Url) -> Url {
    let Some(query) = url.query() else {
        return url.clone();
    };

    let masked = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive(SENSITIVE_QUERY_PARAMS, key) => format!("{key}={MASK}"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    let mut url = url.clone();
    url.set_query(Some(&masked));
    url
}

pub fn mask_headers(headers: &HeaderMap) -> HeaderMap {
    let mut masked = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let value = if is_sensitive(SENSITIVE_HEADERS, name.as_str()) {
            HeaderValue::from_static(MASK)
        } else {
            value.clone()
        };
        masked.append(name.clone(), value);
    }
    masked
}

/// Masks credential fields anywhere in a JSON document.
pub fn mask_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if is_sensitive(SENSITIVE_FIELDS, key) && !value.is_null() {
                    *value = Value::String(MASK.into());
                } else {
                    mask_json(value);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_json),
        _ => {}
    }
}
