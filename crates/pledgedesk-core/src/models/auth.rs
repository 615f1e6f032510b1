//! Authentication models: login credentials, the wire login response and the
//! authenticated user kept in the session store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::string_id;

/// Login credentials. Transient: used for one attempt, never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /auth/staff/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(deserialize_with = "string_id::deserialize")]
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: String,
}

/// The user of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthUser {
    pub id: String,
    pub login: String,
    pub name: String,
    pub role: String,
    pub token: String,
}

impl From<LoginResponse> for AuthUser {
    fn from(response: LoginResponse) -> Self {
        let user = response.user;
        // Display name falls back to the login identifier
        let name = user
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| user.login.clone());

        Self {
            id: user.id,
            login: user.login,
            name,
            role: user.role,
            token: response.token,
        }
    }
}
