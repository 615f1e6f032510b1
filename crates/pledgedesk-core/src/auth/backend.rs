//! Login backends: the real staff login endpoint and an in-process stand-in
//! for hosts without a reachable API.
//!
//! Backends only verify credentials and describe the resulting user; writing
//! the session is left to [`AuthService`](super::AuthService) so there is a
//! single writer.

use std::time::Duration;

use tracing::{info, warn};

use super::AuthError;
use crate::api::HttpClient;
use crate::mode::Mode;
use crate::models::{AuthUser, Credentials, LoginResponse};

/// Staff login endpoint, relative to the API base
pub const LOGIN_ENDPOINT: &str = "/auth/staff/login";

/// The only login accepted by the simulated backend
pub const SIMULATED_LOGIN: &str = "admin";
pub const SIMULATED_PASSWORD: &str = "admin123";

/// Artificial latency of the simulated backend in milliseconds
pub const SIMULATED_DELAY_MS: u64 = 800;

/// Logs in against `POST {base}/auth/staff/login`
#[derive(Clone)]
pub struct NetworkBackend {
    http: HttpClient,
}

impl NetworkBackend {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        info!(login = %credentials.login, "Attempting staff login");
        let response: LoginResponse = self.http.post(LOGIN_ENDPOINT, credentials).await?;
        Ok(AuthUser::from(response))
    }
}

/// Accepts one fixed credential pair after a short delay
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(SIMULATED_DELAY_MS))
    }
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        info!(login = %credentials.login, "Simulated login attempt");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if credentials.login == SIMULATED_LOGIN && credentials.password == SIMULATED_PASSWORD {
            Ok(AuthUser {
                id: "mock-user-1".to_string(),
                login: SIMULATED_LOGIN.to_string(),
                name: "Admin User".to_string(),
                role: "admin".to_string(),
                token: "mock-token-xyz".to_string(),
            })
        } else {
            warn!(login = %credentials.login, "Simulated login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// The backend chosen for this process by the mode selector
#[derive(Clone)]
pub enum AuthBackend {
    Network(NetworkBackend),
    Simulated(SimulatedBackend),
}

impl AuthBackend {
    /// Pick the backend for `mode`
    pub fn for_mode(mode: Mode, http: HttpClient, simulated_delay: Duration) -> Self {
        match mode {
            Mode::Networked => AuthBackend::Network(NetworkBackend::new(http)),
            Mode::Simulated => AuthBackend::Simulated(SimulatedBackend::new(simulated_delay)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            AuthBackend::Network(_) => Mode::Networked,
            AuthBackend::Simulated(_) => Mode::Simulated,
        }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        match self {
            AuthBackend::Network(backend) => backend.authenticate(credentials).await,
            AuthBackend::Simulated(backend) => backend.authenticate(credentials).await,
        }
    }
}
