//! # Admin Console API
//!
//! REST gateway for the admin console.
//!
//! - [`ApiClient`]: one HTTP client with a bearer-credential request
//!   interceptor, a 401 response interceptor and normalized errors
//! - [`services`]: typed [`AuthApi`] and [`DashboardApi`] traits with HTTP
//!   implementations
//! - [`types`]: wire types, including the adapters that reconcile the two
//!   module-list response shapes
//! - [`storage`]: cookie-style credential storage
//!
//! ## Example
//!
//! ```ignore
//! use admin_console_api::{ApiClient, FileCookieJar, HttpAuthApi, AuthApi};
//! use std::sync::Arc;
//!
//! let jar = Arc::new(FileCookieJar::new("/tmp/admin-console/cookies.json"));
//! let client = ApiClient::new("https://api.example.com/v1", jar);
//! let auth = HttpAuthApi::new(client);
//!
//! let ack = auth.login(&LoginCredentials { email, password }).await?;
//! ```

pub mod client;
pub mod error;
pub mod services;
pub mod storage;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, StorageError};
pub use services::{AuthApi, CoordinatorPersistence, DashboardApi, HttpAuthApi, HttpDashboardApi};
pub use storage::{CredentialStorage, CredentialStorageExt, FileCookieJar, MemoryCookieJar};
