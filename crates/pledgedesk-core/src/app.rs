//! Application wiring for the dashboard core.
//!
//! `App` owns one instance of every component: the durable storage and
//! cookie jar behind the session store, the HTTP client, the auth service and
//! the feature API. Components receive their dependencies here and nowhere
//! else.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::cookie::Jar;
use reqwest::Url;
use tracing::{info, warn};

use crate::api::{ApiService, HttpClient};
use crate::auth::{AuthBackend, AuthService, AuthState, FileStorage, SessionStore};
use crate::config::Config;
use crate::mode::{self, Mode};

pub struct App {
    config: Config,
    mode: Mode,
    session: Arc<SessionStore>,
    auth: AuthService,
    api: ApiService,
}

impl App {
    /// Start the application: resolve the process mode, wire components and
    /// resume any stored session.
    pub fn start(config: Config) -> Result<Self> {
        let mode = mode::resolve_once(|| config.decide_mode());
        Self::with_mode(config, mode)
    }

    /// Like [`App::start`] with an explicit mode, bypassing process-wide resolution
    pub fn with_mode(config: Config, mode: Mode) -> Result<Self> {
        let cookie_url = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.api_base_url))?;
        let jar = Arc::new(Jar::default());

        let session = match config.data_dir() {
            Ok(dir) => {
                let storage = FileStorage::new(&dir);
                info!(path = %storage.path().display(), "Using session file");
                Arc::new(SessionStore::new(Arc::new(storage), jar, cookie_url))
            }
            Err(e) => {
                warn!(error = %e, "No data directory, sessions will not persist");
                Arc::new(SessionStore::detached(jar, cookie_url))
            }
        };

        let http = HttpClient::new(&config.api_base_url, session.clone(), config.request_timeout())
            .context("Failed to create HTTP client")?;
        let backend = AuthBackend::for_mode(mode, http.clone(), config.simulated_delay());
        let auth = AuthService::new(backend, session.clone());
        let api = ApiService::new(http);

        let state = auth.restore();
        info!(
            %mode,
            base_url = %config.api_base_url,
            authenticated = matches!(state, AuthState::Authenticated(_)),
            "Application started"
        );

        Ok(Self {
            config,
            mode,
            session,
            auth,
            api,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn api(&self) -> &ApiService {
        &self.api
    }

    /// Stop the application. The stored session is kept for the next start.
    pub fn shutdown(self) {
        info!(
            mode = %self.mode,
            authenticated = self.auth.is_authenticated(),
            "Application shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;

    use crate::models::Credentials;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            api_base_url: "http://dashboard.test/api".to_string(),
            data_dir: Some(dir.to_path_buf()),
            simulated_delay_ms: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let app = App::with_mode(config_in(dir.path()), Mode::Simulated).unwrap();
        assert_eq!(app.auth().state(), AuthState::Anonymous);
        let user = app
            .auth()
            .login(Credentials::new("admin", "admin123"))
            .await
            .unwrap();
        app.shutdown();

        let app = App::with_mode(config_in(dir.path()), Mode::Simulated).unwrap();
        assert_eq!(app.auth().state(), AuthState::Authenticated(user));

        let cookies = app
            .session()
            .jar()
            .cookies(app.session().cookie_url())
            .unwrap();
        assert_eq!(cookies.to_str().unwrap(), "auth_token=mock-token-xyz");
    }

    #[tokio::test]
    async fn test_logout_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let app = App::with_mode(config_in(dir.path()), Mode::Simulated).unwrap();
        app.auth()
            .login(Credentials::new("admin", "admin123"))
            .await
            .unwrap();
        app.auth().logout();
        app.shutdown();

        let app = App::with_mode(config_in(dir.path()), Mode::Simulated).unwrap();
        assert_eq!(app.auth().state(), AuthState::Anonymous);
        assert!(!app.auth().is_authenticated());
    }

    #[test]
    fn test_mode_is_passed_down() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::with_mode(config_in(dir.path()), Mode::Networked).unwrap();
        assert_eq!(app.mode(), Mode::Networked);
        assert_eq!(app.auth().mode(), Mode::Networked);
    }

    #[test]
    fn test_invalid_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.api_base_url = "not a url".to_string();
        assert!(App::with_mode(config, Mode::Simulated).is_err());
    }
}
