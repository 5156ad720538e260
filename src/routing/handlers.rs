//! Route handlers registered by [`Dispatcher::standard`](crate::routing::Dispatcher::standard).

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{SessionStore, User, UserRepository};
use crate::http::cookie::Cookies;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::routing::{
    BAD_REQUEST_PAGE, INDEX_PAGE, LOGIN_PAGE, Route, RouteError, RouteResult, load_page,
    page_response, redirect_to_index,
};
use crate::static_files::ContentLoader;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";

const GREETING: &str = "Hello world!";
const ACCOUNT: &str = "account";
const PASSWORD: &str = "password";
const EMAIL: &str = "email";

const PAGE_EXTENSIONS: [&str; 3] = [".css", ".js", ".html"];

/// `GET /` answers with a fixed greeting.
pub struct RootRoute;

impl Route for RootRoute {
    fn name(&self) -> &'static str {
        "root"
    }

    fn matches(&self, request: &Request) -> bool {
        request.path == "/"
    }

    fn get(&self, request: &Request) -> RouteResult {
        Ok(Some(
            ResponseBuilder::for_request(request, StatusCode::Ok)
                .body(GREETING)
                .build(),
        ))
    }
}

/// Login page, session check and credential submission.
///
/// - GET with a live session cookie: 302 to the index page
/// - GET without query parameters: the login page
/// - POST with `account` and `password`: new session + auth cookie, 302
pub struct LoginRoute {
    sessions: SessionStore,
    users: Arc<dyn UserRepository>,
    files: Arc<dyn ContentLoader>,
}

impl LoginRoute {
    pub fn new(
        sessions: SessionStore,
        users: Arc<dyn UserRepository>,
        files: Arc<dyn ContentLoader>,
    ) -> Self {
        Self {
            sessions,
            users,
            files,
        }
    }

    /// Query parameters, or the form body when the target has none.
    fn credentials<'a>(request: &'a Request) -> &'a HashMap<String, String> {
        if request.is_query_empty() {
            &request.body_fields
        } else {
            &request.query_params
        }
    }
}

impl Route for LoginRoute {
    fn name(&self) -> &'static str {
        "login"
    }

    fn matches(&self, request: &Request) -> bool {
        request.path == LOGIN_PATH
    }

    fn get(&self, request: &Request) -> RouteResult {
        let logged_in = request
            .session_id()
            .is_some_and(|id| self.sessions.is_authenticated(id));

        if logged_in {
            return Ok(Some(redirect_to_index(self.files.as_ref(), request)?.build()));
        }

        if request.is_query_empty() {
            let page = page_response(self.files.as_ref(), request, StatusCode::Ok, LOGIN_PAGE)?;
            return Ok(Some(page));
        }

        Ok(None)
    }

    fn post(&self, request: &Request) -> RouteResult {
        let params = Self::credentials(request);
        let (Some(account), Some(password)) = (params.get(ACCOUNT), params.get(PASSWORD)) else {
            return Err(RouteError::MissingCredentials);
        };

        let Some(user) = self
            .users
            .find_by_account(account)
            .filter(|user| user.check_password(password))
        else {
            tracing::warn!(account = %account, "Login rejected");
            return Err(RouteError::InvalidCredentials {
                account: account.clone(),
            });
        };

        let session = self.sessions.create(user);
        let mut cookies = Cookies::new();
        cookies.add_auth_cookie(session.id.as_str());

        tracing::info!(account = %session.user.account, "User logged in");

        let response = redirect_to_index(self.files.as_ref(), request)?
            .set_cookie(cookies.to_header_value())
            .build();
        Ok(Some(response))
    }
}

/// `POST /register` creates an account from form fields.
pub struct RegisterRoute {
    users: Arc<dyn UserRepository>,
    files: Arc<dyn ContentLoader>,
}

impl RegisterRoute {
    pub fn new(users: Arc<dyn UserRepository>, files: Arc<dyn ContentLoader>) -> Self {
        Self { users, files }
    }
}

impl Route for RegisterRoute {
    fn name(&self) -> &'static str {
        "register"
    }

    fn matches(&self, request: &Request) -> bool {
        request.path == REGISTER_PATH
    }

    fn post(&self, request: &Request) -> RouteResult {
        let fields = &request.body_fields;
        let (Some(account), Some(password)) = (fields.get(ACCOUNT), fields.get(PASSWORD)) else {
            return Err(RouteError::MissingCredentials);
        };

        if self.users.find_by_account(account).is_some() {
            tracing::info!(account = %account, "Registration refused, account exists");
            let page = page_response(
                self.files.as_ref(),
                request,
                StatusCode::BadRequest,
                BAD_REQUEST_PAGE,
            )?;
            return Ok(Some(page));
        }

        let email = fields.get(EMAIL).map(String::as_str).unwrap_or_default();
        self.users.save(User::new(account, email, password));
        tracing::info!(account = %account, "Account registered");

        let page = page_response(self.files.as_ref(), request, StatusCode::Created, INDEX_PAGE)?;
        Ok(Some(page))
    }
}

/// Static pages and assets by extension.
pub struct PageRoute {
    files: Arc<dyn ContentLoader>,
}

impl PageRoute {
    pub fn new(files: Arc<dyn ContentLoader>) -> Self {
        Self { files }
    }
}

impl Route for PageRoute {
    fn name(&self) -> &'static str {
        "page"
    }

    fn matches(&self, request: &Request) -> bool {
        PAGE_EXTENSIONS.iter().any(|ext| request.path.ends_with(ext))
    }

    fn get(&self, request: &Request) -> RouteResult {
        serve_file(self.files.as_ref(), request).map(Some)
    }
}

/// Anything unmatched is treated as a literal file path.
pub struct FallbackRoute {
    files: Arc<dyn ContentLoader>,
}

impl FallbackRoute {
    pub fn new(files: Arc<dyn ContentLoader>) -> Self {
        Self { files }
    }
}

impl Route for FallbackRoute {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn matches(&self, _request: &Request) -> bool {
        true
    }

    fn get(&self, request: &Request) -> RouteResult {
        serve_file(self.files.as_ref(), request).map(Some)
    }
}

fn serve_file(files: &dyn ContentLoader, request: &Request) -> Result<Response, RouteError> {
    let body = load_page(files, &request.path)?;
    Ok(ResponseBuilder::for_request(request, StatusCode::Ok)
        .body(body)
        .build())
}
