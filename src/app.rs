//! Shared per-server state handed to every connection task.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{InMemoryUserRepository, SessionStore, User, UserRepository};
use crate::config::{Config, ServerConfig};
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::routing::legacy::LegacyQueryLogin;
use crate::routing::{
    BAD_REQUEST_PAGE, Dispatcher, RouteError, UNAUTHORIZED_PAGE, page_response,
};
use crate::static_files::{ContentLoader, StaticFiles};

/// Per-connection read limits.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub read_timeout: Duration,
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        ConnectionLimits::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ConnectionLimits {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            read_timeout: cfg.read_timeout(),
            max_header_bytes: cfg.max_header_bytes,
            max_body_bytes: cfg.max_body_bytes,
        }
    }
}

/// Cheap to clone; all members are shared.
#[derive(Clone)]
pub struct AppContext {
    dispatcher: Arc<Dispatcher>,
    legacy: Arc<LegacyQueryLogin>,
    files: Arc<dyn ContentLoader>,
    sessions: SessionStore,
    limits: ConnectionLimits,
}

impl AppContext {
    pub fn new(
        files: Arc<dyn ContentLoader>,
        users: Arc<dyn UserRepository>,
        sessions: SessionStore,
        limits: ConnectionLimits,
    ) -> Self {
        let dispatcher = Dispatcher::standard(sessions.clone(), users.clone(), files.clone());
        let legacy = LegacyQueryLogin::new(users, files.clone());

        Self {
            dispatcher: Arc::new(dispatcher),
            legacy: Arc::new(legacy),
            files,
            sessions,
            limits,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let users = InMemoryUserRepository::with_users(cfg.users.iter().map(User::from));

        Self::new(
            Arc::new(StaticFiles::from_config(&cfg.static_files)),
            Arc::new(users),
            SessionStore::new(),
            ConnectionLimits::from(&cfg.server),
        )
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn limits(&self) -> ConnectionLimits {
        self.limits
    }

    /// Produces the response for one parsed request.
    ///
    /// GET targets carrying a query string take the legacy inline login path;
    /// everything else goes through the dispatcher.
    pub fn respond(&self, request: &Request) -> Result<Response, RouteError> {
        if self.legacy.applies_to(request) {
            return self.legacy.respond(request);
        }
        self.dispatcher.dispatch(request)
    }

    /// Like [`respond`](Self::respond), with client-caused failures turned
    /// into error pages. Loads files synchronously, so the connection runs
    /// it on the blocking pool.
    pub fn serve(&self, request: &Request) -> Result<Response, RouteError> {
        let err = match self.respond(request) {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        let Some(response) = self.recover(request, &err) else {
            return Err(err);
        };

        tracing::info!(
            path = %request.path,
            status = response.status.as_u16(),
            error = %err,
            "Request rejected"
        );
        Ok(response)
    }

    /// Error page for client-caused handler failures; `None` for failures
    /// that drop the connection.
    pub fn recover(&self, request: &Request, err: &RouteError) -> Option<Response> {
        if !err.is_client_error() {
            return None;
        }

        let (status, page) = match err {
            RouteError::InvalidCredentials { .. } => (StatusCode::Unauthorized, UNAUTHORIZED_PAGE),
            _ => (StatusCode::BadRequest, BAD_REQUEST_PAGE),
        };

        page_response(self.files.as_ref(), request, status, page)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load error page"))
            .ok()
    }

    /// 400 sent before closing a connection whose request could not be parsed.
    pub fn malformed_response(&self) -> Response {
        match self.files.load_file_content(BAD_REQUEST_PAGE) {
            Ok(page) => ResponseBuilder::new(StatusCode::BadRequest).body(page).build(),
            Err(_) => Response::bad_request(),
        }
    }
}
