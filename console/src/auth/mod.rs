//! Super-admin authentication.
//!
//! Credentials first, then a one-time passcode. Only a verified passcode
//! authenticates the session.

pub mod actions;
pub mod effects;
pub mod environment;
pub mod reducer;
pub mod state;

pub use actions::AuthAction;
pub use environment::AuthEnvironment;
pub use reducer::AuthReducer;
pub use state::AuthState;
