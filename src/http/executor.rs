// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request execution pipeline
//!
//! Builds the wire request from a configuration and a cookie jar, runs it
//! through the transport, parses the response and merges `Set-Cookie` lines
//! back into the jar.

use std::time::Instant;

use super::cookie::CookieJar;
use super::header_names::CONTENT_TYPE;
use super::headers;
use super::request::{Method, RequestConfig};
use super::response::ResponseData;
use super::DELETED_COOKIE_VALUE;
use crate::error::{Error, Result};
use crate::transport::{
    HostOverride, ProxySettings, Transport, TlsOptions, Verb, WireRequest,
};

/// Content type used for POST bodies when the caller sets none
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Executes requests over an exclusively owned transport
pub struct RequestExecutor {
    transport: Box<dyn Transport>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl RequestExecutor {
    /// Create an executor over the given transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Create an executor over an already boxed transport
    pub fn from_boxed(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Assemble the wire request without sending it
    ///
    /// Fails before any network activity when the URL is missing or
    /// malformed, when a POST carries an empty form, or when a host override
    /// cannot be parsed.
    pub fn build_wire_request(config: &RequestConfig, jar: &CookieJar) -> Result<WireRequest> {
        let url = config.parsed_url()?;

        let is_post = config.method == Method::Post;
        if is_post && config.body.as_ref().map_or(false, |b| b.is_empty_form()) {
            return Err(Error::request_data("POST form data cannot be empty"));
        }

        let host_overrides = config
            .host_overrides
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| entry.parse::<HostOverride>())
            .collect::<Result<Vec<_>>>()?;

        let header_lines = headers::assemble_request_headers(config);

        let (body, content_type) = if is_post {
            let body = config.body.as_ref().map(|b| b.to_bytes()).unwrap_or_default();
            let content_type = (!headers::has_header(&header_lines, CONTENT_TYPE))
                .then_some(FORM_CONTENT_TYPE);
            (Some(body), content_type)
        } else {
            (None, None)
        };

        let proxy = config.proxy.as_ref().map(|address| ProxySettings {
            address: address.clone(),
            credentials: config
                .proxy_credentials()
                .map(|(user, password)| (user.to_string(), password.to_string())),
        });

        Ok(WireRequest {
            method: config.method,
            verb: Verb::for_method(config.method),
            url,
            headers: header_lines,
            cookie: jar.get_cookie_string(),
            body,
            content_type,
            tls: TlsOptions {
                verify_peer: config.tls_verify_peer,
                verify_host: config.tls_verify_host,
            },
            proxy,
            timeout: (!config.timeout.is_zero()).then_some(config.timeout),
            follow_redirects: config.follow_redirects,
            host_overrides,
        })
    }

    /// Execute one request and merge its cookies into the jar
    ///
    /// On failure the jar is left untouched and no response is produced.
    pub async fn execute(&mut self, config: &RequestConfig, jar: &CookieJar) -> Result<ResponseData> {
        let wire = Self::build_wire_request(config, jar)?;

        let request_headers_raw = if config.headers.is_empty() {
            serde_json::to_string(&wire.headers)?
        } else {
            config.headers.clone()
        };

        tracing::debug!(
            method = %wire.method,
            url = %wire.url,
            headers = wire.headers.len(),
            transport = self.transport.name(),
            "Request"
        );

        let start = Instant::now();
        let raw = match self.transport.round_trip(&wire).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(url = %wire.url, error = %e, "Request failed");
                return Err(e);
            }
        };
        let elapsed = start.elapsed();

        let response_headers_raw = String::from_utf8_lossy(raw.head()).into_owned();
        let response_headers = headers::parse_response_headers(&response_headers_raw);

        for (name, value) in headers::scan_set_cookies(&response_headers_raw) {
            if value.eq_ignore_ascii_case(DELETED_COOKIE_VALUE) {
                tracing::debug!(cookie = %name, "Cookie deleted by response");
                jar.set_cookie(name, DELETED_COOKIE_VALUE);
            } else {
                jar.set_cookie(name, value);
            }
        }

        tracing::info!(
            url = %wire.url,
            status = raw.status,
            time_ms = elapsed.as_millis() as u64,
            "Response"
        );

        Ok(ResponseData {
            status_code: raw.status,
            body: raw.body(),
            request_headers_raw,
            request_headers: wire.headers,
            response_headers_raw,
            response_headers,
            cookie_jar: jar.clone(),
            cookie_string: jar.get_cookie_string(),
            elapsed,
            url: wire.url,
        })
    }
}
