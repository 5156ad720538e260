//! Request routing.
//!
//! A [`Dispatcher`] holds an ordered list of [`Route`]s and hands each request
//! to the first one whose predicate accepts it. The [`legacy`] module keeps
//! the older inline query-string login, reachable only from the connection
//! handler.

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod legacy;

pub use dispatcher::Dispatcher;
pub use error::RouteError;

use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::static_files::ContentLoader;

pub const INDEX_PAGE: &str = "/index.html";
pub const LOGIN_PAGE: &str = "/login.html";
pub const BAD_REQUEST_PAGE: &str = "/400.html";
pub const UNAUTHORIZED_PAGE: &str = "/401.html";

/// `Ok(None)` means the route took no action; the dispatcher then answers
/// with an empty default response.
pub type RouteResult = Result<Option<Response>, RouteError>;

/// A routable handler: a predicate plus per-method handlers.
pub trait Route: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn matches(&self, request: &Request) -> bool;

    fn get(&self, _request: &Request) -> RouteResult {
        Ok(None)
    }

    fn post(&self, _request: &Request) -> RouteResult {
        Ok(None)
    }

    fn handle(&self, request: &Request) -> RouteResult {
        match request.method {
            Method::GET => self.get(request),
            Method::POST => self.post(request),
            _ => Ok(None),
        }
    }
}

pub(crate) fn load_page(files: &dyn ContentLoader, path: &str) -> Result<Vec<u8>, RouteError> {
    files
        .load_file_content(path)
        .map_err(|source| RouteError::StaticFile {
            path: path.to_string(),
            source,
        })
}

/// Response whose body is the page at `path`.
pub(crate) fn page_response(
    files: &dyn ContentLoader,
    request: &Request,
    status: StatusCode,
    path: &str,
) -> Result<Response, RouteError> {
    let body = load_page(files, path)?;
    Ok(ResponseBuilder::for_request(request, status).body(body).build())
}

/// 302 to the index page, carrying the index page as body as well.
pub(crate) fn redirect_to_index(
    files: &dyn ContentLoader,
    request: &Request,
) -> Result<ResponseBuilder, RouteError> {
    let body = load_page(files, INDEX_PAGE)?;
    Ok(ResponseBuilder::for_request(request, StatusCode::Found)
        .location(INDEX_PAGE)
        .body(body))
}
