// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar shared by every request bound to it
//!
//! Cookies are a flat name -> value map. There is no domain, path or expiry
//! scoping: whatever is in the jar is sent with the next request.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::DELETED_COOKIE_VALUE;

/// Name -> value cookie storage
///
/// Cloning a `CookieJar` yields another handle to the same storage, so a jar
/// handed out by one request and bound to another is updated by both.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<DashMap<String, String>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie
    ///
    /// A value of `"deleted"` removes the cookie, an empty value is ignored.
    pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) -> &Self {
        let name = name.into();
        let value = value.into();

        if value == DELETED_COOKIE_VALUE {
            self.cookies.remove(&name);
        } else if !value.is_empty() {
            self.cookies.insert(name, value);
        }
        self
    }

    /// Merge a `name=value; name=value` string into the jar
    pub fn set_cookie_string(&self, raw: &str) -> &Self {
        if raw.trim().is_empty() {
            return self;
        }

        for segment in raw.split(';') {
            let Some((name, value)) = segment.trim().split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.set_cookie(percent_decode(name), percent_decode(value.trim()));
        }
        self
    }

    /// Serialize the jar as a `Cookie` header value
    pub fn get_cookie_string(&self) -> String {
        self.cookies
            .iter()
            .map(|entry| {
                format!(
                    "{}={}",
                    percent_encode(entry.key()),
                    percent_encode(entry.value())
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Get a cookie value
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).map(|v| v.value().clone())
    }

    /// Check if a cookie is present
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Remove a cookie, returning its value
    pub fn remove(&self, name: &str) -> Option<String> {
        self.cookies.remove(name).map(|(_, v)| v)
    }

    /// Clear all cookies
    pub fn clear(&self) -> &Self {
        self.cookies.clear();
        self
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Snapshot of the current contents
    pub fn to_map(&self) -> HashMap<String, String> {
        self.cookies
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Check if two handles share the same storage
    pub fn same_jar(&self, other: &CookieJar) -> bool {
        Arc::ptr_eq(&self.cookies, &other.cookies)
    }
}

/// RFC 3986 percent-encoding, keeping only unreserved characters
fn percent_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char)
            }
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}

/// Decode `%XX` escapes; malformed escapes are kept verbatim
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_delete() {
        let jar = CookieJar::new();
        jar.set_cookie("session", "abc").set_cookie("theme", "dark");
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("session").as_deref(), Some("abc"));

        jar.set_cookie("session", "deleted");
        assert!(!jar.contains("session"));

        // Deleting an absent cookie is fine
        jar.set_cookie("missing", "deleted");
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_empty_value_is_noop() {
        let jar = CookieJar::new();
        jar.set_cookie("a", "1");
        jar.set_cookie("a", "");
        jar.set_cookie("b", "");
        assert_eq!(jar.get("a").as_deref(), Some("1"));
        assert!(!jar.contains("b"));
    }

    #[test]
    fn test_cookie_string_parsing() {
        let parsed = CookieJar::new();
        parsed.set_cookie_string("a=1; b=2");

        let manual = CookieJar::new();
        manual.set_cookie("a", "1").set_cookie("b", "2");

        assert_eq!(parsed.to_map(), manual.to_map());
    }

    #[test]
    fn test_cookie_string_edge_cases() {
        let jar = CookieJar::new();
        jar.set_cookie_string("");
        jar.set_cookie_string("   ");
        assert!(jar.is_empty());

        jar.set_cookie_string("token=a=b==; novalue; =orphan;  spaced  =  x  ");
        assert_eq!(jar.get("token").as_deref(), Some("a=b=="));
        assert_eq!(jar.get("spaced").as_deref(), Some("x"));
        assert_eq!(jar.len(), 2);

        jar.set_cookie_string("token=deleted");
        assert!(!jar.contains("token"));
    }

    #[test]
    fn test_get_cookie_string() {
        let jar = CookieJar::new();
        assert_eq!(jar.get_cookie_string(), "");

        jar.set_cookie("a", "1");
        assert_eq!(jar.get_cookie_string(), "a=1");

        jar.clear().set_cookie("msg", "hello world;").set_cookie("k", "v");
        let serialized = jar.get_cookie_string();
        assert!(serialized.contains("msg=hello%20world%3B"));
        assert!(serialized.contains("k=v"));
        assert!(!serialized.ends_with("; "));
    }

    #[test]
    fn test_round_trip() {
        let jar = CookieJar::new();
        jar.set_cookie("user", "张三")
            .set_cookie("path", "/a b/c")
            .set_cookie("id", "42");

        let copy = CookieJar::new();
        copy.set_cookie_string(&jar.get_cookie_string());
        assert_eq!(copy.to_map(), jar.to_map());
    }

    #[test]
    fn test_shared_handle() {
        let jar = CookieJar::new();
        let bound = jar.clone();
        bound.set_cookie("a", "1");

        assert_eq!(jar.get("a").as_deref(), Some("1"));
        assert!(jar.same_jar(&bound));
        assert!(!jar.same_jar(&CookieJar::new()));
    }

    #[test]
    fn test_percent_decode_malformed() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz1"), "%zz1");
        assert_eq!(percent_decode("a%3Db"), "a=b");
    }
}
