//! Per-actor session context.
//!
//! A [`Session`] owns one transport (`reqwest::Client`) and the header set
//! applied to every outgoing request. Headers are never mutated in place:
//! authenticating produces a new `Session` sharing the same transport with
//! an `authorization` overlay. Two sessions built with [`Session::new`] share
//! nothing, so concurrently running actors cannot observe each other's token.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;

use crate::{Error, Result};

/// `Content-Type` and `Accept` set to JSON.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
    default_headers: Arc<HeaderMap>,
    headers: Arc<HeaderMap>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    /// Fresh transport with the JSON default headers.
    pub fn new() -> Session {
        Session::with_default_headers(HeaderMap::new())
    }

    /// Fresh transport with the JSON defaults overlaid by `overrides`.
    pub fn with_default_headers(overrides: HeaderMap) -> Session {
        let mut defaults = json_headers();
        for (name, value) in overrides.iter() {
            defaults.insert(name.clone(), value.clone());
        }
        let defaults = Arc::new(defaults);
        Session {
            client: reqwest::Client::new(),
            headers: defaults.clone(),
            default_headers: defaults,
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Headers every request starts from.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Copy of this session with one header replaced or added.
    pub fn with_header(&self, name: HeaderName, value: HeaderValue) -> Session {
        let mut headers = HeaderMap::clone(&self.headers);
        headers.insert(name, value);
        Session {
            client: self.client.clone(),
            default_headers: self.default_headers.clone(),
            headers: Arc::new(headers),
        }
    }

    /// Copy of this session carrying `Authorization: Bearer <token>`.
    pub fn with_bearer(&self, token: &str) -> Result<Session> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::InvalidHeader(format!("authorization: {e}")))?;
        value.set_sensitive(true);
        Ok(self.with_header(AUTHORIZATION, value))
    }

    /// Copy of this session with only the default headers.
    pub fn signed_out(&self) -> Session {
        Session {
            client: self.client.clone(),
            default_headers: self.default_headers.clone(),
            headers: self.default_headers.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }
}
