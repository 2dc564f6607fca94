//! # Admin Console
//!
//! Client core of the super-admin console: two feature stores, their effect
//! routines and the pieces that wire them to the REST API.
//!
//! ## Features
//!
//! - [`auth`]: credential login, OTP verification and resend, logout
//! - [`dashboard`]: module catalog, active module, profile, coordinator
//!   access and single-vendor mode
//!
//! ## Wiring
//!
//! - [`Console`]: composition root holding both stores
//! - [`ConsoleConfig`]: environment-driven configuration
//! - [`validation`]: input checks run before dispatch
//! - [`navigation`]: route changes requested by effects
//!
//! ## Example
//!
//! ```ignore
//! use admin_console::{Console, ConsoleConfig};
//!
//! let console = Console::from_config(&ConsoleConfig::from_env()?);
//!
//! console.login("root@example.com", "secret1").await?;
//! console.verify_otp("root@example.com", "123456").await?;
//!
//! let modules = console.dashboard_state().await.modules;
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod navigation;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use app::{AuthStore, Console, ConsoleError, DashboardStore};
pub use config::{ConfigError, ConsoleConfig, OtpFailurePolicy};
pub use navigation::{LogNavigator, Navigator};
pub use validation::ValidationErrors;
