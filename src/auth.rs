use std::fmt;

use serde::{Deserialize, Serialize};

/// The username/password pair typed into the login and register forms.
/// Never persisted; kept after a submit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

/// Opaque credential handed out by `/login`, sent back verbatim as the
/// `Authorization` header.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Token(String);

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: Token,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str { &self.username }
    pub fn password(&self) -> &str { &self.password }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

// tokens end up in logs, only show a prefix
impl fmt::Debug for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(fmt, "Token({prefix}...)")
    }
}
