//! Session store shared by every connection task.

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::user::User;

/// Binds an opaque session id to the user who logged in.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub user: User,
}

/// Concurrent id → session map.
///
/// Cloning shares the same underlying map. Sessions are never evicted.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session under a fresh random id.
    pub fn create(&self, user: User) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user,
        };
        self.sessions.insert(session.id.clone(), session.clone());

        tracing::debug!(
            session = %session.id,
            account = %session.user.account,
            "Session created"
        );

        session
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn is_authenticated(&self, id: &str) -> bool {
        !id.is_empty() && self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
