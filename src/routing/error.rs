use std::io;

/// Failures raised while routing or handling a request.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("login requires both account and password")]
    MissingCredentials,
    #[error("invalid credentials for account {account:?}")]
    InvalidCredentials { account: String },
    #[error("no route defined for {0}")]
    RouteNotFound(String),
    #[error("failed to load {path}: {source}")]
    StaticFile {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl RouteError {
    /// Errors caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RouteError::MissingCredentials | RouteError::InvalidCredentials { .. }
        )
    }
}
