//! Cookie header codec.
//!
//! Decodes a `Cookie` request header into a map and encodes a map back into
//! a `Set-Cookie` value. Keys are kept in sorted order so encoding is
//! deterministic.

use std::collections::BTreeMap;
use std::fmt;

/// Cookie key carrying the session id.
pub const AUTH_COOKIE_KEY: &str = "JSESSIONID";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    cookies: BTreeMap<String, String>,
}

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `k1=v1; k2=v2` header value.
    ///
    /// Tokens without `=` (or with an empty key) are skipped and the last
    /// occurrence of a duplicate key wins.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();

        for part in header.split(';') {
            let Some((name, value)) = part.trim().split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            jar.cookies.insert(name.to_string(), value.trim().to_string());
        }

        jar
    }

    /// Sets the session cookie unless one is already present.
    pub fn add_auth_cookie(&mut self, value: impl Into<String>) {
        self.cookies
            .entry(AUTH_COOKIE_KEY.to_string())
            .or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cookies.get(key).map(|v| v.as_str())
    }

    pub fn auth_cookie(&self) -> Option<&str> {
        self.get(AUTH_COOKIE_KEY)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Serialize to a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.cookies.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Cookies {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cookies: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
