//! Inline query-string login.
//!
//! Older login path used by the connection handler for any GET whose target
//! carries a query string. It is stricter about pair order but more lenient
//! about failures than [`LoginRoute`](crate::routing::handlers::LoginRoute):
//! bad input becomes a 400 page and wrong credentials a 401 page instead of an
//! error. It never creates a session.

use std::sync::Arc;

use crate::auth::UserRepository;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::routing::handlers::LOGIN_PATH;
use crate::routing::{
    BAD_REQUEST_PAGE, RouteError, UNAUTHORIZED_PAGE, page_response, redirect_to_index,
};
use crate::static_files::ContentLoader;

const ACCOUNT_PREFIX: &str = "account=";
const PASSWORD_PREFIX: &str = "password=";

pub struct LegacyQueryLogin {
    users: Arc<dyn UserRepository>,
    files: Arc<dyn ContentLoader>,
}

impl LegacyQueryLogin {
    pub fn new(users: Arc<dyn UserRepository>, files: Arc<dyn ContentLoader>) -> Self {
        Self { users, files }
    }

    /// GET requests with a `?` anywhere in the target, `/?...` included.
    /// Only a bare `/` is left to the root greeting.
    pub fn applies_to(&self, request: &Request) -> bool {
        request.method == Method::GET && request.has_query()
    }

    pub fn respond(&self, request: &Request) -> Result<Response, RouteError> {
        if request.has_malformed_query() {
            return self.page(request, StatusCode::BadRequest, BAD_REQUEST_PAGE);
        }

        if !request.path.starts_with(LOGIN_PATH) {
            return Err(RouteError::RouteNotFound(format!(
                "{}?{}",
                request.path,
                request.raw_query.as_deref().unwrap_or_default()
            )));
        }

        self.login(request, &request.query_pairs())
    }

    fn login(&self, request: &Request, pairs: &[&str]) -> Result<Response, RouteError> {
        let [account_param, password_param, ..] = pairs else {
            return self.page(request, StatusCode::BadRequest, BAD_REQUEST_PAGE);
        };

        if !account_param.starts_with(ACCOUNT_PREFIX) || !password_param.starts_with(PASSWORD_PREFIX) {
            return self.page(request, StatusCode::BadRequest, BAD_REQUEST_PAGE);
        }

        let account = pair_value(account_param);
        let password = pair_value(password_param);

        if self.check_auth(account, password) {
            return Ok(redirect_to_index(self.files.as_ref(), request)?.build());
        }

        self.page(request, StatusCode::Unauthorized, UNAUTHORIZED_PAGE)
    }

    fn check_auth(&self, account: &str, password: &str) -> bool {
        match self.users.find_by_account(account) {
            Some(user) if user.check_password(password) => {
                tracing::info!(account = %user.account, "User authenticated via query string");
                true
            }
            _ => {
                tracing::warn!(account, "Query-string login rejected");
                false
            }
        }
    }

    fn page(&self, request: &Request, status: StatusCode, path: &str) -> Result<Response, RouteError> {
        page_response(self.files.as_ref(), request, status, path)
    }
}

/// Text between the first and second `=`.
fn pair_value(pair: &str) -> &str {
    pair.split('=').nth(1).unwrap_or_default()
}
