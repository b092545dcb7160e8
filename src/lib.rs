// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # easyhttp - HTTP requests with a synchronized cookie jar
//!
//! Issues one HTTP call at a time and keeps a cookie jar in step with the
//! server: the jar is sent as the `Cookie` header of every request and
//! `Set-Cookie` lines from every response are merged back into it.
//!
//! ## Features
//!
//! - Fluent request façade with reusable configuration
//! - Flat name -> value cookie jar, shareable between requests
//! - Default protocol headers filled in when missing
//! - Raw and parsed response headers, repeated `Set-Cookie` preserved
//! - Proxy, TLS verification, redirect, timeout and resolver overrides
//! - Pluggable transport, with a scripted transport for offline tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use easyhttp::{HttpRequest, Method};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut request = HttpRequest::new("https://example.com", Method::Get);
//!     request.send().await?;
//!
//!     if let Some(response) = request.response() {
//!         println!("status: {}", response.status_code);
//!         println!("cookies: {}", response.cookie_string);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod transport;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    CookieJar, HeaderEntry, HeaderList, HttpRequest, Method, RequestBody, RequestConfig,
    RequestExecutor, ResponseData, ResponseHeaders, DEFAULT_USER_AGENT,
};

// Transport
pub use transport::{RawResponse, ReqwestTransport, ScriptedTransport, Transport, WireRequest};

/// easyhttp version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
