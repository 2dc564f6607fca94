//! Navigator that remembers where it was sent.

use super::lock;
use crate::navigation::Navigator;
use std::sync::{Arc, Mutex};

/// [`Navigator`] recording every route.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    /// Create a navigator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes visited, oldest first
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        lock(&self.routes).clone()
    }

    /// Most recent route
    #[must_use]
    pub fn last(&self) -> Option<String> {
        lock(&self.routes).last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        lock(&self.routes).push(route.to_string());
    }
}
