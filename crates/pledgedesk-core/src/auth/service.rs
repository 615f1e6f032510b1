use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use super::backend::AuthBackend;
use super::{AuthError, SessionStore};
use crate::mode::Mode;
use crate::models::{AuthUser, Credentials};

/// Capacity of the navigation channel; slow observers only miss old routes
const ROUTE_CHANNEL_CAPACITY: usize = 16;

/// Authentication state as observed by the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated(AuthUser),
    /// Last login failed; the message is ready for display
    Error(String),
}

impl AuthState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AuthState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Where the front-end should go after an auth transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
        }
    }
}

/// Login/logout orchestration over a backend and the session store.
///
/// Only this service writes the session. Every login or logout takes a new
/// attempt number; a login that finishes after a newer attempt is dropped
/// without touching the store, so the latest action always wins.
///
/// A login is only accepted while no session is active. When the session
/// could not be persisted the user is kept in memory for this process.
pub struct AuthService {
    backend: AuthBackend,
    session: Arc<SessionStore>,
    state: watch::Sender<AuthState>,
    routes: broadcast::Sender<Route>,
    attempt: Mutex<u64>,
    /// Session lives only in `state`; the store holds nothing
    in_memory_only: AtomicBool,
}

impl AuthService {
    pub fn new(backend: AuthBackend, session: Arc<SessionStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Anonymous);
        let (routes, _) = broadcast::channel(ROUTE_CHANNEL_CAPACITY);
        info!(mode = %backend.mode(), "Auth service created");

        Self {
            backend,
            session,
            state,
            routes,
            attempt: Mutex::new(0),
            in_memory_only: AtomicBool::new(false),
        }
    }

    pub fn mode(&self) -> Mode {
        self.backend.mode()
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Observe navigation requests
    pub fn routes(&self) -> broadcast::Receiver<Route> {
        self.routes.subscribe()
    }

    fn attempts(&self) -> MutexGuard<'_, u64> {
        self.attempt.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn navigate(&self, route: Route) {
        debug!(route = route.path(), "Navigating");
        // No subscribers is fine
        let _ = self.routes.send(route);
    }

    /// Bring the state in line with the persisted session (application startup).
    ///
    /// A stored token with a readable user resumes the session; anything
    /// else is repaired with a full logout.
    pub fn restore(&self) -> AuthState {
        let _guard = self.attempts();
        self.in_memory_only.store(false, Ordering::SeqCst);

        let restored = match (self.session.token(), self.session.user()) {
            (Some(_), Some(user)) => {
                info!(login = %user.login, "Resuming stored session");
                self.session.restore_cookie();
                AuthState::Authenticated(user)
            }
            (None, None) => AuthState::Anonymous,
            _ => {
                warn!("Stored session is incomplete, clearing it");
                self.session.clear();
                AuthState::Anonymous
            }
        };

        self.state.send_replace(restored.clone());
        restored
    }

    /// Log in with `credentials`.
    ///
    /// On success the session is written, observers see `Authenticated` and
    /// the landing route is requested. On failure the session is untouched
    /// and the state carries the display message. Fails with
    /// `AlreadyAuthenticated` while a session is active.
    pub async fn login(&self, credentials: Credentials) -> Result<AuthUser, AuthError> {
        let attempt = {
            let mut current = self.attempts();
            if matches!(*self.state.borrow(), AuthState::Authenticated(_)) {
                debug!(login = %credentials.login, "Login refused, session active");
                return Err(AuthError::AlreadyAuthenticated);
            }
            *current += 1;
            self.state.send_replace(AuthState::Authenticating);
            *current
        };
        debug!(attempt, login = %credentials.login, "Login started");

        let result = self.backend.authenticate(&credentials).await;

        let current = self.attempts();
        if *current != attempt {
            debug!(attempt, latest = *current, "Discarding superseded login");
            return Err(AuthError::Superseded);
        }

        match result {
            Ok(user) => {
                let persisted = match self.session.establish(&user) {
                    Ok(()) => self.session.has_storage(),
                    Err(e) => {
                        warn!(error = %e, "Failed to persist session");
                        false
                    }
                };
                if !persisted {
                    warn!("Session kept in memory only");
                }
                self.in_memory_only.store(!persisted, Ordering::SeqCst);
                self.state.send_replace(AuthState::Authenticated(user.clone()));
                drop(current);

                info!(login = %user.login, role = %user.role, "Login successful");
                self.navigate(Route::Landing);
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.state.send_replace(AuthState::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Acknowledge a login error
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, AuthState::Error(_)) {
                *state = AuthState::Anonymous;
                true
            } else {
                false
            }
        });
    }

    /// End the session. Also cancels any login still in flight.
    pub fn logout(&self) {
        {
            let mut current = self.attempts();
            *current += 1;
            self.in_memory_only.store(false, Ordering::SeqCst);
            self.session.clear();
            self.state.send_replace(AuthState::Anonymous);
        }
        info!("Logged out");
        self.navigate(Route::Login);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated() || self.in_memory_user().is_some()
    }

    fn in_memory_user(&self) -> Option<AuthUser> {
        if !self.in_memory_only.load(Ordering::SeqCst) {
            return None;
        }
        self.state.borrow().user().cloned()
    }

    /// User of the stored session, or of the in-memory one when nothing
    /// could be stored.
    ///
    /// A corrupt record clears the session and drops back to `Anonymous`.
    pub fn current_user(&self) -> Option<AuthUser> {
        let user = self.session.user().or_else(|| self.in_memory_user());
        if user.is_none() {
            self.state.send_if_modified(|state| {
                if matches!(state, AuthState::Authenticated(_)) {
                    *state = AuthState::Anonymous;
                    true
                } else {
                    false
                }
            });
        }
        user
    }
}
