use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::cookie::Jar;
use reqwest::Url;
use tracing::{debug, warn};

use super::storage::{DurableStorage, MemoryStorage};
use crate::models::AuthUser;

/// Durable storage key for the raw session token
pub const TOKEN_KEY: &str = "auth_token";

/// Durable storage key for the JSON-serialized user record
pub const USER_KEY: &str = "auth_user";

/// Name of the cookie mirroring the token for server-side route checks
pub const AUTH_COOKIE: &str = "auth_token";

/// Cookie lifetime in days.
/// Expiry is enforced by the server; this is only a hint for the browser side.
const COOKIE_EXPIRY_DAYS: i64 = 7;

/// Expiry used to delete the cookie
const EXPIRED_COOKIE_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Persistent session state: the token and the user it belongs to.
///
/// The token is also mirrored into the cookie jar shared with the HTTP
/// client so every request carries it. Without a storage host the store is
/// detached and every read reports no session.
pub struct SessionStore {
    storage: Option<Arc<dyn DurableStorage>>,
    jar: Arc<Jar>,
    cookie_url: Url,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn DurableStorage>, jar: Arc<Jar>, cookie_url: Url) -> Self {
        Self {
            storage: Some(storage),
            jar,
            cookie_url,
        }
    }

    /// A store with no durable storage host: writes are dropped, reads are empty.
    pub fn detached(jar: Arc<Jar>, cookie_url: Url) -> Self {
        Self {
            storage: None,
            jar,
            cookie_url,
        }
    }

    /// A store over process memory with its own cookie jar
    pub fn in_memory(cookie_url: Url) -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(Jar::default()), cookie_url)
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    /// Cookie jar the HTTP client sends with every request
    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    pub fn cookie_url(&self) -> &Url {
        &self.cookie_url
    }

    // ===== Token =====

    /// Persist the token and mirror it into the auth cookie
    pub fn set_token(&self, token: &str) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        storage
            .set(TOKEN_KEY, token)
            .context("Failed to store session token")?;
        self.write_cookie(token, Utc::now() + Duration::days(COOKIE_EXPIRY_DAYS));
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Delete the token and expire the cookie.
    ///
    /// Token and user are cleared together, so the stored user goes as well.
    pub fn remove_token(&self) {
        self.clear();
    }

    // ===== User =====

    pub fn set_user(&self, user: &AuthUser) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let json = serde_json::to_string(user)?;
        storage
            .set(USER_KEY, &json)
            .context("Failed to store session user")?;
        Ok(())
    }

    /// Stored user record.
    ///
    /// An unreadable record is treated as a broken session: everything is
    /// cleared and `None` returned.
    pub fn user(&self) -> Option<AuthUser> {
        let storage = self.storage.as_ref()?;
        let json = match storage.get(USER_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read session user");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored session user is corrupt, clearing session");
                self.clear();
                None
            }
        }
    }

    /// Delete the stored user. The token goes with it.
    pub fn remove_user(&self) {
        self.clear();
    }

    // ===== Whole session =====

    /// Write a freshly authenticated session as one operation.
    ///
    /// The user record is written before the token; if either write fails
    /// the partial session is cleared again.
    pub fn establish(&self, user: &AuthUser) -> Result<()> {
        let result = self
            .set_user(user)
            .and_then(|_| self.set_token(&user.token));
        if result.is_err() {
            self.clear();
        }
        result
    }

    /// Remove token, user and cookie
    pub fn clear(&self) {
        if let Some(storage) = &self.storage {
            for key in [TOKEN_KEY, USER_KEY] {
                if let Err(e) = storage.remove(key) {
                    warn!(key, error = %e, "Failed to remove session entry");
                }
            }
        }
        self.expire_cookie();
    }

    /// Mirror a persisted token into a fresh cookie jar (process startup)
    pub fn restore_cookie(&self) {
        if let Some(token) = self.token() {
            debug!("Restoring auth cookie from stored session");
            self.write_cookie(&token, Utc::now() + Duration::days(COOKIE_EXPIRY_DAYS));
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn write_cookie(&self, token: &str, expires: DateTime<Utc>) {
        let cookie = format!(
            "{}={}; Path=/; Expires={}",
            AUTH_COOKIE,
            token,
            expires.format("%a, %d %b %Y %H:%M:%S GMT")
        );
        self.jar.add_cookie_str(&cookie, &self.cookie_url);
    }

    fn expire_cookie(&self) {
        let cookie = format!("{}=; Path=/; Expires={}", AUTH_COOKIE, EXPIRED_COOKIE_DATE);
        self.jar.add_cookie_str(&cookie, &self.cookie_url);
    }
}
