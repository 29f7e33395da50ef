use std::{collections::HashMap, time::Duration};

use bytes::Bytes;

/// Case-preserving response header map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.inner.insert(key.into().to_ascii_lowercase(), value.into());
    }

    /// Lookup is case-insensitive; header names are folded on insert.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Outcome of a conditional fetch.
#[derive(Clone, Debug)]
pub enum Conditional {
    /// Server sent a body; `validator` is the normalized entity tag, when
    /// the server supplied one.
    Fresh {
        bytes: Bytes,
        validator: Option<String>,
    },
    /// Server reported 304 against the supplied validator. No body.
    NotModified,
}

impl Conditional {
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Conditional::NotModified)
    }
}

/// Client construction options.
#[derive(Clone, Debug)]
pub struct NetOptions {
    pub request_timeout: Duration,
    /// Max idle connections kept per host by the connection pool.
    pub pool_max_idle_per_host: usize,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 2,
        }
    }
}

/// Strip the weak prefix and surrounding quotes from an entity tag.
///
/// Validators are opaque equality-only strings everywhere above this crate;
/// normalization happens exactly once, here at the response boundary.
pub fn normalize_validator(raw: &str) -> String {
    let s = raw.trim();
    let s = s.strip_prefix("W/").unwrap_or(s);
    let s = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s);
    s.to_string()
}
