use std::sync::Arc;

use crate::auth::{SessionStore, UserRepository};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::routing::handlers::{FallbackRoute, LoginRoute, PageRoute, RegisterRoute, RootRoute};
use crate::routing::{BAD_REQUEST_PAGE, Route, RouteError, page_response};
use crate::static_files::ContentLoader;

/// Routes requests to the first matching [`Route`], in registration order.
pub struct Dispatcher {
    routes: Vec<Box<dyn Route>>,
    files: Arc<dyn ContentLoader>,
}

impl Dispatcher {
    /// Creates a dispatcher with no routes.
    pub fn new(files: Arc<dyn ContentLoader>) -> Self {
        Self {
            routes: Vec::new(),
            files,
        }
    }

    /// The server's route table. The fallback must stay last.
    pub fn standard(
        sessions: SessionStore,
        users: Arc<dyn UserRepository>,
        files: Arc<dyn ContentLoader>,
    ) -> Self {
        let mut dispatcher = Self::new(files.clone());
        dispatcher.register(RootRoute);
        dispatcher.register(LoginRoute::new(sessions, users.clone(), files.clone()));
        dispatcher.register(RegisterRoute::new(users, files.clone()));
        dispatcher.register(PageRoute::new(files.clone()));
        dispatcher.register(FallbackRoute::new(files));
        tracing::debug!(routes = ?dispatcher.route_names(), "Route table ready");
        dispatcher
    }

    /// Appends a route; earlier registrations take precedence.
    pub fn register(&mut self, route: impl Route + 'static) {
        self.routes.push(Box::new(route));
    }

    pub fn route_names(&self) -> Vec<&'static str> {
        self.routes.iter().map(|r| r.name()).collect()
    }

    pub fn dispatch(&self, request: &Request) -> Result<Response, RouteError> {
        if request.has_malformed_query() {
            tracing::debug!(path = %request.path, "Rejecting malformed query string");
            return page_response(
                self.files.as_ref(),
                request,
                StatusCode::BadRequest,
                BAD_REQUEST_PAGE,
            );
        }

        let route = self
            .routes
            .iter()
            .find(|route| route.matches(request))
            .ok_or_else(|| RouteError::RouteNotFound(request.path.clone()))?;

        tracing::debug!(
            route = route.name(),
            method = ?request.method,
            path = %request.path,
            "Dispatching request"
        );

        Ok(route
            .handle(request)?
            .unwrap_or_else(|| Response::empty(request)))
    }
}
