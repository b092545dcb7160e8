// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam between the executor and the network
//!
//! The executor turns a request configuration into a [`WireRequest`] and
//! hands it to a [`Transport`], which returns the raw response bytes with the
//! header block included.

mod reqwest_transport;
mod scripted;

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::{Error, Result};
use crate::http::Method;

pub use reqwest_transport::ReqwestTransport;
pub use scripted::ScriptedTransport;

/// Numeric transport error codes, following libcurl's numbering
pub mod codes {
    pub const UNKNOWN: i32 = 0;
    pub const UNSUPPORTED_PROTOCOL: i32 = 1;
    pub const URL_MALFORMAT: i32 = 3;
    pub const COULDNT_RESOLVE_HOST: i32 = 6;
    pub const COULDNT_CONNECT: i32 = 7;
    pub const WEIRD_SERVER_REPLY: i32 = 8;
    pub const OPERATION_TIMEDOUT: i32 = 28;
    pub const SSL_CONNECT_ERROR: i32 = 35;
    pub const TOO_MANY_REDIRECTS: i32 = 47;
    pub const RECV_ERROR: i32 = 56;
    pub const BAD_CONTENT_ENCODING: i32 = 61;
}

/// Performs one HTTP round trip
///
/// Implementations own their connection handle exclusively and must not
/// carry per-request state from one call into the next.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response
    ///
    /// Failures are reported as [`Error::Transport`] with a code from
    /// [`codes`].
    async fn round_trip(&mut self, request: &WireRequest) -> Result<RawResponse>;

    /// Short name for logging
    fn name(&self) -> &'static str {
        "transport"
    }
}

/// How the request verb is bound on the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Canonical GET
    Get,
    /// HEAD: no response body expected
    NoBody,
    /// Any other method, sent by name
    Custom(&'static str),
}

impl Verb {
    pub fn for_method(method: Method) -> Self {
        match method {
            Method::Get => Verb::Get,
            Method::Head => Verb::NoBody,
            other => Verb::Custom(other.as_str()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Verb::Get => "GET",
            Verb::NoBody => "HEAD",
            Verb::Custom(name) => name,
        }
    }
}

/// TLS verification switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlsOptions {
    pub verify_peer: bool,
    pub verify_host: bool,
}

impl TlsOptions {
    /// Whether invalid certificates are accepted
    ///
    /// The host-name check cannot be switched off on its own, so with
    /// `verify_peer` on the certificate is fully checked whatever
    /// `verify_host` says.
    pub fn accept_invalid_certs(&self) -> bool {
        !self.verify_peer
    }
}

/// Proxy address with optional credentials
#[derive(Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub address: String,
    pub credentials: Option<(String, String)>,
}

impl fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxySettings")
            .field("address", &self.address)
            .field("credentials", &self.credentials.as_ref().map(|(u, _)| (u, "***")))
            .finish()
    }
}

/// Resolver override parsed from `domain:port:ip[,ip...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOverride {
    pub host: String,
    pub port: u16,
    pub addrs: Vec<SocketAddr>,
}

impl FromStr for HostOverride {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::config(format!("Invalid host override '{}': {}", s, reason));

        let mut parts = s.trim().trim_start_matches('+').splitn(3, ':');
        let host = parts
            .next()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?;
        let port: u16 = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(|| invalid("missing or invalid port"))?;
        let addrs = parts
            .next()
            .ok_or_else(|| invalid("missing address"))?
            .split(',')
            .map(|a| a.trim().trim_start_matches('[').trim_end_matches(']'))
            .map(|a| a.parse::<IpAddr>().map(|ip| SocketAddr::new(ip, port)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            host: host.to_ascii_lowercase(),
            port,
            addrs,
        })
    }
}

impl HostOverride {
    /// Check if this override applies to the URL's host and port
    pub fn applies_to(&self, url: &Url) -> bool {
        url.host_str()
            .map_or(false, |h| h.eq_ignore_ascii_case(&self.host))
            && url.port_or_known_default() == Some(self.port)
    }
}

/// Fully assembled request as handed to the transport
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub verb: Verb,
    pub url: Url,
    /// Header lines in send order
    pub headers: Vec<String>,
    /// Serialized jar; a non-empty value replaces any caller `Cookie` line
    pub cookie: String,
    /// Only set for POST
    pub body: Option<Bytes>,
    /// Content type to add when the headers carry none
    pub content_type: Option<&'static str>,
    pub tls: TlsOptions,
    pub proxy: Option<ProxySettings>,
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
    pub host_overrides: Vec<HostOverride>,
}

/// Raw response: header block followed by the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub data: Bytes,
    /// Length of the header block (all blocks, when interim responses
    /// preceded the final one)
    pub header_len: usize,
}

impl RawResponse {
    pub fn new(status: u16, data: Bytes, header_len: usize) -> Self {
        Self {
            status,
            data,
            header_len,
        }
    }

    /// Parse a complete HTTP/1.x response, locating the header block
    ///
    /// Interim `1xx` blocks are skipped; their lines stay part of the
    /// header block.
    pub fn parse(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let mut offset = 0;

        loop {
            let rest = &data[offset..];
            let end = find_subsequence(rest, b"\r\n\r\n")
                .map(|pos| offset + pos + 4)
                .ok_or_else(|| {
                    Error::transport(codes::WEIRD_SERVER_REPLY, "unterminated header block")
                })?;
            let status = parse_status_line(&data[offset..end])?;

            let interim = (100..200).contains(&status) && data[end..].starts_with(b"HTTP/");
            if !interim {
                return Ok(Self::new(status, data, end));
            }
            offset = end;
        }
    }

    /// Header block bytes
    pub fn head(&self) -> &[u8] {
        &self.data[..self.split_at()]
    }

    /// Body bytes
    pub fn body(&self) -> Bytes {
        self.data.slice(self.split_at()..)
    }

    fn split_at(&self) -> usize {
        self.header_len.min(self.data.len())
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn parse_status_line(block: &[u8]) -> Result<u16> {
    let text = String::from_utf8_lossy(block);
    let line = text.lines().next().unwrap_or_default();
    let mut parts = line.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code
            .parse()
            .map_err(|_| Error::transport(codes::WEIRD_SERVER_REPLY, format!("bad status line: {}", line))),
        _ => Err(Error::transport(
            codes::WEIRD_SERVER_REPLY,
            format!("bad status line: {}", line),
        )),
    }
}
