use bytes::Bytes;

use crate::http::request::{DEFAULT_CONTENT_TYPE, Request};

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Account registered
/// - `Found` (302): Redirect after login
/// - `BadRequest` (400): Malformed request or query
/// - `Unauthorized` (401): Credentials rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 302 Found
    Found,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Found.as_u16(), 302);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::Found => 302,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Found => "Found",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Only the headers this server ever sends are modelled; they are written in
/// the fixed order Content-Type, Content-Length, Location, Set-Cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Protocol version echoed on the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// Content-Type value, passed through unchanged
    pub content_type: String,
    /// Redirect target
    pub location: Option<String>,
    /// Set-Cookie value
    pub set_cookie: Option<String>,
    /// Response body as bytes
    pub body: Bytes,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Found)
///     .content_type("text/html")
///     .location("/index.html")
///     .body(page)
///     .build();
/// ```
pub struct ResponseBuilder {
    version: String,
    status: StatusCode,
    content_type: String,
    location: Option<String>,
    set_cookie: Option<String>,
    body: Bytes,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            location: None,
            set_cookie: None,
            body: Bytes::new(),
        }
    }

    /// Starts a response that answers `request`: same protocol version and
    /// the content type negotiated from its Accept header.
    pub fn for_request(request: &Request, status: StatusCode) -> Self {
        Self::new(status)
            .version(request.version.clone())
            .content_type(request.accept.clone())
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn set_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            version: self.version,
            status: self.status,
            content_type: self.content_type,
            location: self.location,
            set_cookie: self.set_cookie,
            body: self.body,
        }
    }
}

impl Response {
    /// The response produced when a matched route has nothing to say.
    pub fn empty(request: &Request) -> Self {
        ResponseBuilder::for_request(request, StatusCode::Ok).build()
    }

    /// Plain-text 400 used when no error page can be loaded.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .content_type("text/plain")
            .body(Bytes::from_static(b"400 Bad Request"))
            .build()
    }

    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}
