//! Authentication module for staff sessions.
//!
//! This module provides:
//! - `SessionStore`: the persisted token and user, mirrored into the `auth_token` cookie
//! - `DurableStorage`: the key-value host behind the store (`FileStorage`, `MemoryStorage`)
//! - `AuthBackend`: the networked staff login or the simulated one
//! - `AuthService`: login/logout state machine and navigation signals
//!
//! Tokens never expire client-side; the server decides when a session ends.

pub mod backend;
pub mod error;
pub mod service;
pub mod session;
pub mod storage;

pub use backend::{AuthBackend, NetworkBackend, SimulatedBackend};
pub use error::AuthError;
pub use service::{AuthService, AuthState, Route};
pub use session::SessionStore;
pub use storage::{DurableStorage, FileStorage, MemoryStorage};
