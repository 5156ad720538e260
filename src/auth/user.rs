use dashmap::DashMap;

use crate::config::UserConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub account: String,
    pub email: String,
    password: String,
}

impl User {
    pub fn new(
        account: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

impl From<&UserConfig> for User {
    fn from(cfg: &UserConfig) -> Self {
        User::new(&cfg.account, &cfg.email, &cfg.password)
    }
}

/// Credential store consulted by the login and register routes.
pub trait UserRepository: Send + Sync {
    fn find_by_account(&self, account: &str) -> Option<User>;

    /// Stores `user`, replacing any account with the same name.
    fn save(&self, user: User);
}

/// Credential store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        for user in users {
            repo.save(user);
        }
        repo
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_account(&self, account: &str) -> Option<User> {
        self.users.get(account).map(|entry| entry.value().clone())
    }

    fn save(&self, user: User) {
        self.users.insert(user.account.clone(), user);
    }
}
