// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network transport backed by reqwest

use std::error::Error as StdError;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Proxy, Response, StatusCode};
use url::Url;

use super::{codes, RawResponse, Transport, Verb, WireRequest};
use crate::error::{Error, Result};

/// Transport that performs real HTTP/1.1 requests
///
/// A fresh client is built for every round trip, so options from one request
/// (proxy, TLS switches, resolver overrides) never reach the next. Cookie
/// handling is left to the caller's jar.
///
/// Redirects are followed here rather than inside reqwest so that the header
/// block of every hop lands in the raw response, `Set-Cookie` lines of
/// intermediate `3xx` replies included. Header names in that block are
/// lowercase, and when a gzip or deflate body is decoded the
/// `Content-Encoding` and `Content-Length` lines are gone.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Maximum redirects to follow when redirects are enabled
    pub max_redirects: usize,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self { max_redirects: 10 }
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    fn build_client(&self, request: &WireRequest) -> Result<Client> {
        if request.tls.verify_peer && !request.tls.verify_host {
            tracing::debug!("Host name check cannot be disabled alone, verifying certificate fully");
        }

        let mut builder = Client::builder()
            .http1_only()
            .gzip(true)
            .deflate(true)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(request.tls.accept_invalid_certs());

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &request.proxy {
            Some(settings) => {
                let mut proxy = Proxy::all(settings.address.as_str()).map_err(|e| {
                    Error::config(format!("Invalid proxy URL {}: {}", settings.address, e))
                })?;
                if let Some((user, password)) = &settings.credentials {
                    proxy = proxy.basic_auth(user, password);
                }
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        for entry in request
            .host_overrides
            .iter()
            .filter(|o| o.applies_to(&request.url))
        {
            builder = builder.resolve_to_addrs(&entry.host, &entry.addrs);
        }

        builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn round_trip(&mut self, request: &WireRequest) -> Result<RawResponse> {
        let client = self.build_client(request)?;
        let mut method = match request.verb {
            Verb::Get => Method::GET,
            Verb::NoBody => Method::HEAD,
            Verb::Custom(name) => Method::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("Invalid method {}: {}", name, e)))?,
        };
        let mut headers = header_map(request);
        let mut body = request.body.clone();
        let mut url = request.url.clone();
        let mut head = String::new();
        let mut hops = 0;

        loop {
            let mut builder = client
                .request(method.clone(), url.clone())
                .headers(headers.clone());
            if let Some(ref body) = body {
                builder = builder.body(body.clone());
            }

            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status();
            append_head(&mut head, &response);

            let next = if request.follow_redirects {
                redirect_target(&url, &response)
            } else {
                None
            };
            let Some(next) = next else {
                let payload = response.bytes().await.map_err(transport_error)?;

                let mut data = BytesMut::with_capacity(head.len() + payload.len());
                data.extend_from_slice(head.as_bytes());
                data.extend_from_slice(&payload);

                return Ok(RawResponse::new(status.as_u16(), data.freeze(), head.len()));
            };

            if hops >= self.max_redirects {
                return Err(Error::transport(
                    codes::TOO_MANY_REDIRECTS,
                    format!("Maximum ({}) redirects followed", self.max_redirects),
                ));
            }
            hops += 1;

            if switches_to_get(status, &method) {
                method = Method::GET;
                body = None;
                if request.content_type.is_some() {
                    headers.remove(CONTENT_TYPE);
                }
            }

            tracing::debug!(
                from = %url,
                to = %next,
                status = status.as_u16(),
                "Following redirect"
            );
            url = next;
        }
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// Append the status line and headers of one hop, blank line included
fn append_head(head: &mut String, response: &Response) {
    let status = response.status();
    head.push_str(&format!(
        "{:?} {} {}\r\n",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    ));
    for (name, value) in response.headers() {
        head.push_str(name.as_str());
        head.push_str(": ");
        head.push_str(&String::from_utf8_lossy(value.as_bytes()));
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
}

/// Where a redirect response points, resolved against the current URL
fn redirect_target(current: &Url, response: &Response) -> Option<Url> {
    if !matches!(response.status().as_u16(), 301 | 302 | 303 | 307 | 308) {
        return None;
    }

    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    match current.join(location.trim()) {
        Ok(next) => Some(next),
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "Not following unparsable Location");
            None
        }
    }
}

/// 303 turns everything but HEAD into GET; 301 and 302 do so for POST
fn switches_to_get(status: StatusCode, method: &Method) -> bool {
    match status {
        StatusCode::SEE_OTHER => *method != Method::HEAD,
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => *method == Method::POST,
        _ => false,
    }
}

/// Convert the header lines, jar cookie and content type into a header map
fn header_map(request: &WireRequest) -> HeaderMap {
    let mut map = HeaderMap::new();

    for line in &request.headers {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        match (
            HeaderName::from_bytes(name.trim().as_bytes()),
            HeaderValue::from_str(value.trim()),
        ) {
            (Ok(name), Ok(value)) => {
                map.append(name, value);
            }
            _ => tracing::warn!(line = %line, "Skipping invalid header line"),
        }
    }

    if !request.cookie.is_empty() {
        match HeaderValue::from_str(&request.cookie) {
            Ok(value) => {
                map.insert(COOKIE, value);
            }
            Err(_) => tracing::warn!("Cookie jar produced an invalid header value"),
        }
    }

    if let Some(content_type) = request.content_type {
        if !map.contains_key(CONTENT_TYPE) {
            map.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }

    map
}

/// Map a reqwest failure onto a transport error code
fn transport_error(err: reqwest::Error) -> Error {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    let lower = message.to_ascii_lowercase();
    let code = if err.is_timeout() {
        codes::OPERATION_TIMEDOUT
    } else if err.is_connect() && lower.contains("dns error") {
        codes::COULDNT_RESOLVE_HOST
    } else if err.is_connect() && (lower.contains("certificate") || lower.contains("tls")) {
        codes::SSL_CONNECT_ERROR
    } else if err.is_connect() {
        codes::COULDNT_CONNECT
    } else if err.is_redirect() {
        codes::TOO_MANY_REDIRECTS
    } else if err.is_builder() && lower.contains("scheme") {
        codes::UNSUPPORTED_PROTOCOL
    } else if err.is_builder() {
        codes::URL_MALFORMAT
    } else if err.is_decode() {
        codes::BAD_CONTENT_ENCODING
    } else if err.is_body() || err.is_request() {
        codes::RECV_ERROR
    } else {
        codes::UNKNOWN
    };

    Error::transport(code, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::transport::TlsOptions;
    use url::Url;

    fn wire(headers: &[&str], cookie: &str) -> WireRequest {
        WireRequest {
            method: Method::Post,
            verb: Verb::Custom("POST"),
            url: Url::parse("http://example.com/").unwrap(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            cookie: cookie.to_string(),
            body: None,
            content_type: Some("application/x-www-form-urlencoded"),
            tls: TlsOptions::default(),
            proxy: None,
            timeout: None,
            follow_redirects: false,
            host_overrides: Vec::new(),
        }
    }

    #[test]
    fn test_header_map_cookie_supersedes() {
        let map = header_map(&wire(&["Cookie: stale=1", "X-A: 1", "X-A: 2"], "a=1"));
        assert_eq!(map.get_all(COOKIE).iter().count(), 1);
        assert_eq!(map.get(COOKIE).unwrap(), "a=1");
        assert_eq!(map.get_all("x-a").iter().count(), 2);
        assert_eq!(
            map.get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_header_map_keeps_caller_values() {
        let map = header_map(&wire(&["Cookie: mine=1", "Content-Type: text/plain"], ""));
        assert_eq!(map.get(COOKIE).unwrap(), "mine=1");
        assert_eq!(map.get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_header_map_skips_invalid_lines() {
        let map = header_map(&wire(&["Bad Name: x", "X-Ok: fine"], ""));
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("x-ok"));
    }

    #[test]
    fn test_redirect_method_rewrite() {
        assert!(switches_to_get(StatusCode::FOUND, &reqwest::Method::POST));
        assert!(switches_to_get(StatusCode::MOVED_PERMANENTLY, &reqwest::Method::POST));
        assert!(!switches_to_get(StatusCode::FOUND, &reqwest::Method::PUT));
        assert!(switches_to_get(StatusCode::SEE_OTHER, &reqwest::Method::PUT));
        assert!(!switches_to_get(StatusCode::SEE_OTHER, &reqwest::Method::HEAD));
        assert!(!switches_to_get(StatusCode::TEMPORARY_REDIRECT, &reqwest::Method::POST));
        assert!(!switches_to_get(StatusCode::PERMANENT_REDIRECT, &reqwest::Method::POST));
    }

    #[test]
    fn test_client_rejects_bad_proxy() {
        let mut request = wire(&[], "");
        request.proxy = Some(crate::transport::ProxySettings {
            address: "http://[invalid".to_string(),
            credentials: None,
        });
        let err = ReqwestTransport::new().build_client(&request).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
