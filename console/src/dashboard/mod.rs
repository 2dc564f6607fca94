//! Module catalog, active module, profile, coordinator access and single-vendor mode.

pub mod actions;
pub mod effects;
pub mod environment;
pub mod reducer;
pub mod state;

pub use actions::DashboardAction;
pub use environment::DashboardEnvironment;
pub use reducer::DashboardReducer;
pub use state::DashboardState;
