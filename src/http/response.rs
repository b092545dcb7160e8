// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response snapshot produced by every executed request

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use url::Url;

use super::cookie::CookieJar;
use super::header_names::SET_COOKIE;

/// Parsed response headers
///
/// Ordinary headers map to their last value. `Set-Cookie` may repeat and is
/// kept separately as the full list of raw values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseHeaders {
    #[serde(flatten)]
    fields: HashMap<String, String>,
    #[serde(rename = "Set-Cookie")]
    set_cookies: Vec<String>,
    #[serde(skip)]
    cookie_values: HashMap<String, Vec<String>>,
}

impl ResponseHeaders {
    pub(crate) fn insert(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn push_set_cookie(&mut self, value: &str) {
        self.set_cookies.push(value.to_string());
    }

    pub(crate) fn record_cookie_value(&mut self, name: &str, value: &str) {
        self.cookie_values
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Get a header value; exact name first, then case-insensitive
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// All raw `Set-Cookie` values in arrival order
    pub fn set_cookies(&self) -> &[String] {
        &self.set_cookies
    }

    /// Every value a cookie name received in this response
    ///
    /// Informational only; the jar is updated from the raw header block.
    pub fn cookie_values(&self, name: &str) -> &[String] {
        self.cookie_values
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All per-name cookie values
    pub fn cookie_pairs(&self) -> &HashMap<String, Vec<String>> {
        &self.cookie_values
    }

    /// Iterate over ordinary headers
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct ordinary headers plus the Set-Cookie entry if any
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(!self.set_cookies.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a header is present (Set-Cookie included)
    pub fn contains(&self, name: &str) -> bool {
        if name.eq_ignore_ascii_case(SET_COOKIE) {
            return !self.set_cookies.is_empty();
        }
        self.get(name).is_some()
    }
}

/// Result of one executed request
#[derive(Debug, Clone, Serialize)]
pub struct ResponseData {
    /// Request URL
    pub url: Url,
    /// Response status code
    pub status_code: u16,
    /// Response body, already decompressed
    #[serde(serialize_with = "serialize_lossy")]
    pub body: Bytes,
    /// Raw header input if one was given, else the sent lines as JSON
    pub request_headers_raw: String,
    /// Header lines actually sent
    pub request_headers: Vec<String>,
    /// Full response header block
    pub response_headers_raw: String,
    /// Parsed response headers
    pub response_headers: ResponseHeaders,
    /// Jar used by the request
    #[serde(skip)]
    pub cookie_jar: CookieJar,
    /// Jar contents after this response was merged
    pub cookie_string: String,
    /// Round-trip duration
    pub elapsed: Duration,
}

impl ResponseData {
    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Get body as text, `None` if it is not valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get a response header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response_headers.get(name)
    }

    /// Get raw Set-Cookie values
    pub fn set_cookies(&self) -> &[String] {
        self.response_headers.set_cookies()
    }

    /// Every `name=value` pair the response set, grouped by cookie name
    pub fn cookie_pairs(&self) -> &HashMap<String, Vec<String>> {
        self.response_headers.cookie_pairs()
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

fn serialize_lossy<S: serde::Serializer>(body: &Bytes, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(body))
}
