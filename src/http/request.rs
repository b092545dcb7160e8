// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request configuration consumed by the executor

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use super::DEFAULT_TIMEOUT_SECS;
use crate::error::{Error, Result};

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Method {
    #[default]
    Get,
    Post,
    Head,
    Put,
    Options,
    Delete,
    Trace,
    Connect,
}

impl Method {
    /// All methods in numeric-code order
    pub const ALL: [Method; 8] = [
        Method::Get,
        Method::Post,
        Method::Head,
        Method::Put,
        Method::Options,
        Method::Delete,
        Method::Trace,
        Method::Connect,
    ];

    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Put => "PUT",
            Method::Options => "OPTIONS",
            Method::Delete => "DELETE",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }

    /// Numeric code (0=GET, 1=POST, 2=HEAD, 3=PUT, 4=OPTIONS, 5=DELETE, 6=TRACE, 7=CONNECT)
    pub fn code(&self) -> u8 {
        Self::ALL
            .iter()
            .position(|m| m == self)
            .map(|p| p as u8)
            .unwrap_or_default()
    }
}

impl TryFrom<u8> for Method {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| Error::config(format!("Unknown method code: {}", code)))
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::config(format!("Unknown method: {}", s)))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POST body: raw text or form fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestBody {
    /// Sent as-is
    Raw(String),
    /// Flat form fields, url-encoded in insertion order
    ///
    /// Sent as `application/x-www-form-urlencoded`, not `multipart/form-data`.
    /// Servers that only accept multipart need a [`RequestBody::Raw`] body
    /// with an explicit `Content-Type` header.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Build a form body from name/value pairs
    pub fn form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Check if this is a form with no fields
    pub fn is_empty_form(&self) -> bool {
        matches!(self, RequestBody::Form(fields) if fields.is_empty())
    }

    /// Encode the body for the wire
    pub fn to_bytes(&self) -> Bytes {
        match self {
            RequestBody::Raw(text) => Bytes::from(text.clone()),
            RequestBody::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields.iter())
                    .finish();
                Bytes::from(encoded)
            }
        }
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        RequestBody::Raw(s.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Raw(s)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for RequestBody {
    fn from(fields: Vec<(K, V)>) -> Self {
        RequestBody::form(fields)
    }
}

impl From<HashMap<String, String>> for RequestBody {
    fn from(fields: HashMap<String, String>) -> Self {
        RequestBody::Form(fields.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for RequestBody {
    fn from(fields: BTreeMap<String, String>) -> Self {
        RequestBody::Form(fields.into_iter().collect())
    }
}

/// One entry of a [`HeaderList`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderEntry {
    /// Raw `Key: Value` line; dropped at send time if it has no colon
    Line(String),
    /// Name/value pair rendered as `Name: Value`
    Field(String, String),
}

/// Ordered header entries
///
/// Setting a field whose name is already present replaces it in place, so
/// its position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderList {
    entries: Vec<HeaderEntry>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw header line
    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.entries.push(HeaderEntry::Line(line.into()));
        self
    }

    /// Set a named field, replacing an existing field with the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        let existing = self
            .entries
            .iter_mut()
            .find(|e| matches!(e, HeaderEntry::Field(n, _) if *n == name));

        match existing {
            Some(HeaderEntry::Field(_, v)) => *v = value,
            _ => self.entries.push(HeaderEntry::Field(name, value)),
        }
        self
    }

    /// Get a named field's value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            HeaderEntry::Field(n, v) if n == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = HeaderList::new();
        for (k, v) in iter {
            list.set(k, v);
        }
        list
    }
}

/// Request configuration
///
/// Read by the executor at execute time and never retained by it.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Target URL, validated at execute time
    pub url: Option<String>,
    /// Request method
    pub method: Method,
    /// Body, only sent with POST
    pub body: Option<RequestBody>,
    /// Raw header block, CRLF separated
    pub headers: String,
    /// Structured header entries, appended after the raw block
    pub header_list: HeaderList,
    /// Verify the server certificate chain
    pub tls_verify_peer: bool,
    /// Verify the certificate matches the host name
    pub tls_verify_host: bool,
    /// Proxy address, e.g. `127.0.0.1:7890`
    pub proxy: Option<String>,
    /// Proxy user name
    pub proxy_username: String,
    /// Proxy password
    pub proxy_password: String,
    /// Whole-request timeout; zero disables it
    pub timeout: Duration,
    /// Follow redirects
    pub follow_redirects: bool,
    /// Fill in the default protocol headers that are missing
    pub auto_default_headers: bool,
    /// Resolver overrides in `domain:port:ip` form
    pub host_overrides: Vec<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            url: None,
            method: Method::Get,
            body: None,
            headers: String::new(),
            header_list: HeaderList::new(),
            tls_verify_peer: false,
            tls_verify_host: false,
            proxy: None,
            proxy_username: String::new(),
            proxy_password: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            follow_redirects: false,
            auto_default_headers: true,
            host_overrides: Vec::new(),
        }
    }
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the raw header block
    pub fn headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = headers.into();
        self
    }

    /// Set a named header field
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_list.set(name, value);
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set follow redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Enable/disable the default protocol headers
    pub fn auto_default_headers(mut self, enabled: bool) -> Self {
        self.auto_default_headers = enabled;
        self
    }

    /// Set TLS verification flags
    pub fn tls_verification(mut self, verify_peer: bool, verify_host: bool) -> Self {
        self.tls_verify_peer = verify_peer;
        self.tls_verify_host = verify_host;
        self
    }

    /// Set proxy address and credentials
    pub fn proxy(
        mut self,
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let address = address.into();
        self.proxy = (!address.is_empty()).then_some(address);
        self.proxy_username = username.into();
        self.proxy_password = password.into();
        self
    }

    /// Add a resolver override (`domain:port:ip`)
    pub fn host_override(mut self, entry: impl Into<String>) -> Self {
        self.host_overrides.push(entry.into());
        self
    }

    /// Parse and validate the configured URL
    ///
    /// The URL must be absolute and carry a host.
    pub fn parsed_url(&self) -> Result<Url> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::validation("no URL set"))?;

        let url = Url::parse(raw).map_err(|e| Error::validation(format!("{}: {}", raw, e)))?;
        if !url.has_host() {
            return Err(Error::validation(format!("{}: missing host", raw)));
        }
        Ok(url)
    }

    /// Proxy credentials, only when both user and password are set
    pub fn proxy_credentials(&self) -> Option<(&str, &str)> {
        (!self.proxy_username.is_empty() && !self.proxy_password.is_empty())
            .then(|| (self.proxy_username.as_str(), self.proxy_password.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RequestConfig::default();
        assert_eq!(config.method, Method::Get);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(!config.tls_verify_peer);
        assert!(!config.tls_verify_host);
        assert!(!config.follow_redirects);
        assert!(config.auto_default_headers);
        assert!(config.url.is_none());
    }

    #[test]
    fn test_method_codes() {
        assert_eq!(Method::try_from(1).unwrap(), Method::Post);
        assert_eq!(Method::try_from(7).unwrap(), Method::Connect);
        assert!(Method::try_from(8).is_err());
        assert_eq!(Method::Head.code(), 2);
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
        assert_eq!(Method::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn test_url_validation() {
        assert!(RequestConfig::new().parsed_url().is_err());
        assert!(RequestConfig::new().url("").parsed_url().is_err());
        assert!(RequestConfig::new().url("not a url").parsed_url().is_err());
        assert!(RequestConfig::new().url("mailto:a@b.c").parsed_url().is_err());

        let url = RequestConfig::new()
            .url("https://example.com/path?q=1")
            .parsed_url()
            .unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_header_list_replaces_in_place() {
        let mut list = HeaderList::new();
        list.set("Accept", "*/*")
            .push_line("X-Raw: 1")
            .set("User-Agent", "A");
        list.set("Accept", "text/html");

        assert_eq!(list.len(), 3);
        assert_eq!(list.get("Accept"), Some("text/html"));
        assert_eq!(
            list.entries()[0],
            HeaderEntry::Field("Accept".into(), "text/html".into())
        );
    }

    #[test]
    fn test_form_body_encoding() {
        let body = RequestBody::form([("user", "a b"), ("pass", "x&y=z")]);
        assert_eq!(body.to_bytes(), Bytes::from("user=a+b&pass=x%26y%3Dz"));
        assert!(!body.is_empty_form());
        assert!(RequestBody::form(Vec::<(String, String)>::new()).is_empty_form());
        assert!(!RequestBody::from("").is_empty_form());
    }

    #[test]
    fn test_proxy_credentials() {
        let config = RequestConfig::new().proxy("127.0.0.1:7890", "user", "");
        assert_eq!(config.proxy.as_deref(), Some("127.0.0.1:7890"));
        assert!(config.proxy_credentials().is_none());

        let config = config.proxy("127.0.0.1:7890", "user", "pwd");
        assert_eq!(config.proxy_credentials(), Some(("user", "pwd")));

        assert!(RequestConfig::new().proxy("", "", "").proxy.is_none());
    }
}
