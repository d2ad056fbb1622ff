//! HTTP Request types
//!
//! The engine never touches a socket: a [`Request`] is the read-only input
//! handed over by whatever transport sits in front of it. The path is split
//! into segments and the query string into ordered name/value pairs once, at
//! construction, so that matching never re-parses.

use crate::{Error, Result};
use smallvec::SmallVec;

/// HTTP Methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
}

impl Method {
    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "CONNECT" => Ok(Method::Connect),
            "TRACE" => Ok(Method::Trace),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Connect => "CONNECT",
            Method::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP Request
///
/// Immutable once built. Matching works on `segments` and `query`; the raw
/// `path` is kept for logging only.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Request path (without query string)
    pub path: String,
    /// Path split into non-empty segments
    pub segments: Vec<String>,
    /// Query name/value pairs, in request order (repeated names preserved)
    pub query: Vec<(String, String)>,
    /// Request headers (stack-allocated for small header counts)
    pub headers: SmallVec<[(String, String); 16]>,
    /// Request body
    pub body: bytes::Bytes,
}

impl Request {
    /// Create a new request for the given method and path
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let segments = split_segments(&path);
        Self {
            method,
            path,
            segments,
            query: Vec::new(),
            headers: SmallVec::new(),
            body: bytes::Bytes::new(),
        }
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Get content-type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// All values for a query parameter name, in request order
    pub fn query_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.query
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value for a query parameter name
    pub fn query_first<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        self.query_all(name).next()
    }
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.segments == other.segments
            && self.query == other.query
            && self.body == other.body
    }
}

/// Split a path into its non-empty segments
fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parse a raw query string (without leading `?`) into ordered pairs
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// Percent-decode a query component (`+` as space)
fn decode_component(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (hex_val(bytes.get(i + 1)), hex_val(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push(hi * 16 + lo);
                    i += 3;
                }
                // Dangling percent passes through untouched
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: Option<&u8>) -> Option<u8> {
    match b {
        Some(b @ b'0'..=b'9') => Some(b - b'0'),
        Some(b @ b'a'..=b'f') => Some(b - b'a' + 10),
        Some(b @ b'A'..=b'F') => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Builder for constructing requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request: Request::new(method, path),
        }
    }

    /// Append a query parameter (repeated names are kept in order)
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.push((name.into(), value.into()));
        self
    }

    /// Parse and append a raw query string
    pub fn raw_query(mut self, raw: &str) -> Self {
        self.request.query.extend(parse_query(raw));
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments() {
        let req = Request::new(Method::Get, "/pet/42/");
        assert_eq!(req.segments, vec!["pet", "42"]);

        let req = Request::new(Method::Get, "/");
        assert!(req.segments.is_empty());
    }

    #[test]
    fn test_parse_query_order_and_repeats() {
        let pairs = parse_query("status=sold&status=pending&limit=5");
        assert_eq!(
            pairs,
            vec![
                ("status".to_string(), "sold".to_string()),
                ("status".to_string(), "pending".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_query_decodes() {
        let pairs = parse_query("name=fluffy%20the+cat");
        assert_eq!(pairs[0].1, "fluffy the cat");
    }

    #[test]
    fn test_header_case_insensitive() {
        let req = RequestBuilder::new(Method::Post, "/pet")
            .header("Content-Type", "application/json")
            .build();
        assert_eq!(req.content_type(), Some("application/json"));
    }

    #[test]
    fn test_query_all_request_order() {
        let req = RequestBuilder::new(Method::Get, "/pet/findByStatus")
            .query("status", "sold")
            .query("status", "pending")
            .build();
        let values: Vec<_> = req.query_all("status").collect();
        assert_eq!(values, vec!["sold", "pending"]);
        assert_eq!(req.query_first("status"), Some("sold"));
    }
}
