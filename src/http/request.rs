use bytes::Bytes;
use std::collections::HashMap;

use crate::http::cookie::Cookies;

/// Accept value used when the client sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP request methods.
///
/// Every method is parsed, but only GET and POST are routed to handlers;
/// the rest fall through to an empty default response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    /// Methods whose request carries a Content-Length delimited body.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

/// A fully parsed HTTP request.
///
/// Built once by the parser and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string (e.g. "/login")
    pub path: String,
    /// Raw query string after the first `?`, if the target had one
    pub raw_query: Option<String>,
    /// Decoded query parameters; pairs without `=` are left out
    pub query_params: HashMap<String, String>,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers, names as received
    pub headers: HashMap<String, String>,
    /// Cookies decoded from the Cookie header
    pub cookies: Cookies,
    /// Negotiated content type: first token of the Accept header
    pub accept: String,
    /// Raw request body
    pub body: Bytes,
    /// Form fields decoded from the body
    pub body_fields: HashMap<String, String>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Request target as it appears on the request line, query included.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Assembles the request the same way the wire parser does.
    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let target = self.target.ok_or("target missing")?;
        let version = self.version.unwrap_or_else(|| "HTTP/1.1".to_string());

        Ok(Request::assemble(
            method,
            &target,
            version,
            self.headers,
            Bytes::from(self.body),
        ))
    }
}

impl Request {
    /// Derives the query, cookie, Accept and form views from the raw parts.
    pub(crate) fn assemble(
        method: Method,
        target: &str,
        version: String,
        headers: HashMap<String, String>,
        body: Bytes,
    ) -> Self {
        let (path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };

        let query_params = raw_query
            .as_deref()
            .map(crate::http::parser::parse_query)
            .unwrap_or_default();

        let cookies = find_header(&headers, "Cookie")
            .map(Cookies::parse)
            .unwrap_or_default();

        let accept = find_header(&headers, "Accept")
            .map(negotiate_accept)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        // A body without Content-Type is treated as a form post.
        let is_form = find_header(&headers, "Content-Type")
            .is_none_or(|ct| ct.trim().starts_with(FORM_CONTENT_TYPE));

        let body_fields = if body.is_empty() || !is_form {
            HashMap::new()
        } else {
            crate::http::parser::parse_form(&String::from_utf8_lossy(&body))
        };

        Self {
            method,
            path,
            raw_query,
            query_params,
            version,
            headers,
            cookies,
            accept,
            body,
            body_fields,
        }
    }

    /// Retrieves a header value by its name as received.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Retrieves the Content-Length header value and parses it as a usize.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        find_header(&self.headers, "Content-Length")
            .map(parse_content_length)
            .unwrap_or(0)
    }

    /// True when the target carried a `?`, even an empty query.
    pub fn has_query(&self) -> bool {
        self.raw_query.is_some()
    }

    pub fn is_query_empty(&self) -> bool {
        self.query_params.is_empty()
    }

    /// Raw `&`-separated pairs of the query string. An empty query has none.
    pub fn query_pairs(&self) -> Vec<&str> {
        match self.raw_query.as_deref() {
            Some(query) if !query.is_empty() => query.split('&').collect(),
            _ => Vec::new(),
        }
    }

    /// True when some query pair fails [`is_valid_query_pair`].
    pub fn has_malformed_query(&self) -> bool {
        self.query_pairs().iter().any(|pair| !is_valid_query_pair(pair))
    }

    /// Session id carried by the auth cookie, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.cookies.auth_cookie()
    }
}

/// A query pair needs `=` followed by a non-empty value. `k=`, `k==` and
/// empty pairs (`a=b&&c=d`) are all invalid.
pub fn is_valid_query_pair(pair: &str) -> bool {
    pair.split_once('=')
        .is_some_and(|(_, value)| !value.trim_end_matches('=').is_empty())
}

/// Header lookup used for the few headers the server itself interprets.
///
/// An exact name match wins. Otherwise the case-insensitive match with the
/// smallest name is taken, so duplicates differing only in case always
/// resolve the same way.
pub(crate) fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    if let Some(value) = headers.get(name) {
        return Some(value.as_str());
    }

    headers
        .iter()
        .filter(|(key, _)| key.eq_ignore_ascii_case(name))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, value)| value.as_str())
}

/// First comma-delimited token of an Accept value.
pub(crate) fn negotiate_accept(value: &str) -> String {
    let first = value.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        DEFAULT_CONTENT_TYPE.to_string()
    } else {
        first.to_string()
    }
}

pub(crate) fn parse_content_length(value: &str) -> usize {
    value
        .split(',')
        .next()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
