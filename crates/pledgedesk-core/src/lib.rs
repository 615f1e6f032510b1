//! Core library for the pledgedesk crowdfunding admin dashboard.
//!
//! - `api`: HTTP client and typed feature endpoints
//! - `auth`: session store, login backends and the auth service
//! - `mode`: networked vs simulated backend selection
//! - `config`: on-disk configuration with environment overrides
//! - `app`: component wiring and lifecycle

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod mode;
pub mod models;
pub mod utils;

pub use api::{ApiError, ApiService, HttpClient, RequestOptions};
pub use app::App;
pub use auth::{AuthError, AuthService, AuthState, Route, SessionStore};
pub use config::Config;
pub use mode::Mode;
