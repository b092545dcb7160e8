// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for easyhttp
//!
//! Request configuration, the execution pipeline, response snapshots and the
//! cookie jar that ties consecutive requests together.

mod client;
mod cookie;
mod executor;
pub mod headers;
mod request;
mod response;

pub use client::HttpRequest;
pub use cookie::CookieJar;
pub use executor::RequestExecutor;
pub use request::{HeaderEntry, HeaderList, Method, RequestBody, RequestConfig};
pub use response::{ResponseData, ResponseHeaders};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.87 Safari/537.36";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Cookie value that removes the cookie instead of storing it
pub const DELETED_COOKIE_VALUE: &str = "deleted";

/// Common HTTP header names
pub mod header_names {
    pub const ACCEPT: &str = "Accept";
    pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
    pub const CONNECTION: &str = "Connection";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const COOKIE: &str = "Cookie";
    pub const PRAGMA: &str = "Pragma";
    pub const REFERER: &str = "Referer";
    pub const SET_COOKIE: &str = "Set-Cookie";
    pub const USER_AGENT: &str = "User-Agent";
}
