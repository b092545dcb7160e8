// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fluent request façade

use std::fmt;
use std::time::Duration;

use super::cookie::CookieJar;
use super::executor::RequestExecutor;
use super::header_names::USER_AGENT;
use super::request::{Method, RequestBody, RequestConfig};
use super::response::ResponseData;
use crate::error::{Error, Result};
use crate::transport::{ReqwestTransport, Transport};

/// A reusable HTTP request bound to a cookie jar
///
/// Each `send` replaces the stored response. Cookies set by responses are
/// merged into the jar and replayed on the next send.
///
/// # Example
///
/// ```rust,no_run
/// use easyhttp::{HttpRequest, Method};
///
/// #[tokio::main]
/// async fn main() -> easyhttp::Result<()> {
///     let mut request = HttpRequest::new("https://example.com/login", Method::Post);
///     request.set_cookie_string("lang=en");
///     request.send_body(vec![("user", "alice"), ("pass", "secret")]).await?;
///
///     request.open("https://example.com/account", Method::Get);
///     let response = request.send().await?.response().unwrap();
///     println!("{} {}", response.status_code, response.cookie_string);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct HttpRequest {
    config: RequestConfig,
    cookie_jar: CookieJar,
    executor: RequestExecutor,
    user_agent: Option<String>,
    response: Option<ResponseData>,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::with_transport(RequestConfig::default(), ReqwestTransport::new())
    }
}

impl HttpRequest {
    /// Create a request for the given URL over the network transport
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self::with_transport(
            RequestConfig::new().url(url).method(method),
            ReqwestTransport::new(),
        )
    }

    /// Create a request from a configuration and a transport
    pub fn with_transport(config: RequestConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            cookie_jar: CookieJar::new(),
            executor: RequestExecutor::new(transport),
            user_agent: None,
            response: None,
        }
    }

    /// Bind an existing jar, shared with whoever else holds it
    pub fn with_cookie_jar(mut self, jar: CookieJar) -> Self {
        self.cookie_jar = jar;
        self
    }

    /// Point the request at a new URL and method
    pub fn open(&mut self, url: impl Into<String>, method: Method) -> &mut Self {
        self.config.url = Some(url.into());
        self.config.method = method;
        self
    }

    /// Mutable access to the configuration
    pub fn configure(&mut self) -> &mut RequestConfig {
        &mut self.config
    }

    /// Current configuration
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Send the request with the configured body
    pub async fn send(&mut self) -> Result<&mut Self> {
        if let Some(ref agent) = self.user_agent {
            self.config.header_list.set(USER_AGENT, agent.clone());
        }

        let response = self.executor.execute(&self.config, &self.cookie_jar).await?;
        self.response = Some(response);
        Ok(self)
    }

    /// Send the request with a body
    ///
    /// The body is only used for POST; other methods ignore it.
    pub async fn send_body(&mut self, body: impl Into<RequestBody>) -> Result<&mut Self> {
        if self.config.method == Method::Post {
            let body = body.into();
            self.config.parsed_url()?;
            if body.is_empty_form() {
                return Err(Error::request_data("POST form data cannot be empty"));
            }
            self.config.body = Some(body);
        }
        self.send().await
    }

    /// Last response, `None` before the first successful send
    pub fn response(&self) -> Option<&ResponseData> {
        self.response.as_ref()
    }

    /// Handle to the cookie jar
    pub fn cookie_jar(&self) -> CookieJar {
        self.cookie_jar.clone()
    }

    /// Merge a `name=value; ...` string into the jar
    pub fn set_cookie_string(&mut self, raw: &str) -> &mut Self {
        self.cookie_jar.set_cookie_string(raw);
        self
    }

    /// Set proxy address and credentials; an empty address disables the proxy
    pub fn set_proxy(
        &mut self,
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> &mut Self {
        let address = address.into();
        self.config.proxy = (!address.is_empty()).then_some(address);
        self.config.proxy_username = username.into();
        self.config.proxy_password = password.into();
        self
    }

    /// Set the user agent sent with every request
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        let user_agent = user_agent.into();
        self.user_agent = (!user_agent.is_empty()).then_some(user_agent);
        self
    }

    /// Set TLS verification flags
    pub fn set_tls_verification(&mut self, verify_peer: bool, verify_host: bool) -> &mut Self {
        self.config.tls_verify_peer = verify_peer;
        self.config.tls_verify_host = verify_host;
        self
    }

    /// Set follow redirects
    pub fn set_follow_redirects(&mut self, follow: bool) -> &mut Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Set timeout
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the raw header block
    pub fn set_headers(&mut self, headers: impl Into<String>) -> &mut Self {
        self.config.headers = headers.into();
        self
    }

    /// Set a named header field
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.config.header_list.set(name, value);
        self
    }

    /// Add a resolver override (`domain:port:ip`)
    pub fn add_host_override(&mut self, entry: impl Into<String>) -> &mut Self {
        self.config.host_overrides.push(entry.into());
        self
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.response {
            Some(ref response) => f.write_str(&response.text_lossy()),
            None => Ok(()),
        }
    }
}
