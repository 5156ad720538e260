#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use warden::app::{AppContext, ConnectionLimits};
use warden::auth::{InMemoryUserRepository, SessionStore, User};
use warden::http::request::{Method, Request, RequestBuilder};
use warden::routing::Dispatcher;
use warden::static_files::ContentLoader;

pub const INDEX: &[u8] = b"<html>index</html>";
pub const LOGIN: &[u8] = b"<html>login</html>";
pub const BAD_REQUEST: &[u8] = b"<html>400</html>";
pub const UNAUTHORIZED: &[u8] = b"<html>401</html>";
pub const STYLE: &[u8] = b"body { margin: 0; }";

/// Page set held in memory, keyed by request path.
pub struct MemoryFiles {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFiles {
    pub fn standard() -> Self {
        let files = [
            ("/index.html", INDEX),
            ("/login.html", LOGIN),
            ("/400.html", BAD_REQUEST),
            ("/401.html", UNAUTHORIZED),
            ("/style.css", STYLE),
        ]
        .into_iter()
        .map(|(path, body)| (path.to_string(), body.to_vec()))
        .collect();

        Self { files }
    }
}

impl ContentLoader for MemoryFiles {
    fn load_file_content(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

pub fn users() -> Arc<InMemoryUserRepository> {
    Arc::new(InMemoryUserRepository::with_users([User::new(
        "admin",
        "admin@example.com",
        "correct",
    )]))
}

pub fn dispatcher(sessions: SessionStore) -> Dispatcher {
    Dispatcher::standard(sessions, users(), Arc::new(MemoryFiles::standard()))
}

pub fn context(sessions: SessionStore) -> AppContext {
    AppContext::new(
        Arc::new(MemoryFiles::standard()),
        users(),
        sessions,
        ConnectionLimits::default(),
    )
}

pub fn request(method: Method, target: &str) -> Request {
    RequestBuilder::new()
        .method(method)
        .target(target)
        .build()
        .unwrap()
}
