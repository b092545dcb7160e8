// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header assembly for outgoing requests and header-block parsing for
//! responses

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::header_names::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, PRAGMA, REFERER, SET_COOKIE, USER_AGENT,
};
use super::request::{HeaderEntry, RequestConfig};
use super::response::ResponseHeaders;
use super::DEFAULT_USER_AGENT;

lazy_static! {
    static ref SET_COOKIE_LINE: Regex =
        Regex::new(r"(?mi)^Set-Cookie:[ \t]*([^\r\n]+)").expect("valid Set-Cookie pattern");
}

/// Protocol headers added when the request does not name them itself.
/// The referer takes the request URL.
const PROTOCOL_DEFAULTS: [(&str, Option<&str>); 6] = [
    (ACCEPT, Some("*/*")),
    (ACCEPT_LANGUAGE, Some("zh-cn")),
    (USER_AGENT, Some(DEFAULT_USER_AGENT)),
    (REFERER, None),
    (PRAGMA, Some("no-cache")),
    (CONNECTION, Some("Keep-Alive")),
];

/// Split a raw CRLF header block into non-blank lines
pub fn split_header_block(block: &str) -> Vec<String> {
    block
        .trim()
        .split("\r\n")
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Name part of a `Name: value` line
pub fn header_name(line: &str) -> Option<&str> {
    line.split_once(':').map(|(name, _)| name.trim())
}

/// Check if any line carries the given header name (case-insensitive)
pub fn has_header(lines: &[String], name: &str) -> bool {
    lines
        .iter()
        .filter_map(|l| header_name(l))
        .any(|n| n.eq_ignore_ascii_case(name))
}

/// Build the ordered list of header lines for a request
///
/// Raw block lines come first, then the header list, then any missing
/// protocol defaults. Duplicates are removed by exact line, keeping the
/// first occurrence; two lines with the same name but different values
/// both survive.
pub fn assemble_request_headers(config: &RequestConfig) -> Vec<String> {
    let mut lines = split_header_block(&config.headers);

    for entry in config.header_list.entries() {
        match entry {
            HeaderEntry::Line(line) if line.contains(':') => lines.push(line.clone()),
            HeaderEntry::Line(line) => {
                tracing::debug!(line = %line, "Dropping header line without colon");
            }
            HeaderEntry::Field(name, value) => lines.push(format!("{}: {}", name, value)),
        }
    }

    if config.auto_default_headers {
        let present: HashSet<String> = lines
            .iter()
            .filter_map(|l| header_name(l))
            .map(str::to_ascii_lowercase)
            .collect();

        let referer = config.url.as_deref().unwrap_or_default();
        for (name, value) in PROTOCOL_DEFAULTS {
            if !present.contains(&name.to_ascii_lowercase()) {
                lines.push(format!("{}: {}", name, value.unwrap_or(referer)));
            }
        }
    }

    let mut seen = HashSet::new();
    lines.retain(|line| seen.insert(line.clone()));
    lines
}

/// Parse a response header block
///
/// Lines without a colon (status lines, blanks) are skipped. Ordinary
/// headers keep their last value. Every `Set-Cookie` value is kept in
/// order, and its leading `name=value` pair is recorded per cookie name.
pub fn parse_response_headers(block: &str) -> ResponseHeaders {
    let mut headers = ResponseHeaders::default();

    for line in block.trim().split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        if !name.eq_ignore_ascii_case(SET_COOKIE) {
            headers.insert(name, value);
            continue;
        }

        if let Some((cookie_name, cookie_value)) = cookie_pair(value) {
            headers.record_cookie_value(cookie_name, cookie_value);
        }
        headers.push_set_cookie(value);
    }

    headers
}

/// Collect every `Set-Cookie` name/value pair in a raw header block
pub fn scan_set_cookies(block: &str) -> Vec<(String, String)> {
    SET_COOKIE_LINE
        .captures_iter(block)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| cookie_pair(m.as_str()))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// `name=value` before the first `;` of a Set-Cookie value
fn cookie_pair(set_cookie: &str) -> Option<(&str, &str)> {
    let pair = set_cookie.split(';').next().unwrap_or_default();
    let (name, value) = pair.split_once('=')?;
    Some((name.trim(), value.trim()))
}
