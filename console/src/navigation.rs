//! Route changes requested by effects.

/// Routes the console navigates to
pub mod routes {
    /// Landing page with the login form
    pub const HOME: &str = "/";
    /// Dashboard shown after OTP verification
    pub const DASHBOARD: &str = "/dashboard";
}

/// Where effects send the user after a flow completes
pub trait Navigator: Send + Sync {
    /// Move to `route`
    fn navigate(&self, route: &str);
}

/// Navigator for headless use that only logs the route
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route, "Navigate");
    }
}
