//! Authentication state
//!
//! Accounts live in a [`UserRepository`]; successful logins are recorded in
//! the shared [`SessionStore`] and carried between requests by the auth
//! cookie.

pub mod session;
pub mod user;

pub use session::{Session, SessionStore};
pub use user::{InMemoryUserRepository, User, UserRepository};
