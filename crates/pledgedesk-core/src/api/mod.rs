//! REST API access for the crowdfunding admin backend.
//!
//! This module provides the `HttpClient` request wrapper and the typed
//! `ApiService` feature endpoints built on it.
//!
//! Authorization relies on the session: the `auth_token` cookie from the
//! shared jar and a bearer token read from the session store.

pub mod client;
pub mod error;
pub mod service;

pub use client::{HttpClient, RequestOptions, REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
pub use service::{ApiService, ListParams};
