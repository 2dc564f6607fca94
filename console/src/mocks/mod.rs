//! Scripted API and navigator doubles for testing.
//!
//! Responses are queued per endpoint and consumed in order; an endpoint with
//! nothing queued answers with [`ApiError::RequestSetup`]. Every call is
//! recorded so tests can assert on what reached the gateway.

pub mod auth;
pub mod dashboard;
pub mod navigator;

pub use auth::{AuthCall, MockAuthApi};
pub use dashboard::{DashboardCall, MockDashboardApi};
pub use navigator::RecordingNavigator;

use admin_console_api::ApiError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct Scripted<T> {
    delay: Duration,
    result: Result<T, ApiError>,
}

/// Responses queued for one endpoint
#[derive(Debug)]
pub(crate) struct Script<T> {
    queue: Arc<Mutex<VecDeque<Scripted<T>>>>,
}

impl<T> Clone for Script<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl<T> Script<T> {
    pub(crate) fn push(&self, delay: Duration, result: Result<T, ApiError>) {
        lock(&self.queue).push_back(Scripted { delay, result });
    }

    pub(crate) async fn next(&self, endpoint: &str) -> Result<T, ApiError> {
        let scripted = lock(&self.queue).pop_front();
        let Some(Scripted { delay, result }) = scripted else {
            return Err(ApiError::RequestSetup {
                detail: format!("no scripted response for {endpoint}"),
            });
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

/// Calls seen by a mock, in arrival order
#[derive(Debug)]
pub(crate) struct CallLog<C> {
    calls: Arc<Mutex<Vec<C>>>,
}

impl<C> Clone for CallLog<C> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<C> Default for CallLog<C> {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<C: Clone> CallLog<C> {
    pub(crate) fn record(&self, call: C) {
        lock(&self.calls).push(call);
    }

    pub(crate) fn snapshot(&self) -> Vec<C> {
        lock(&self.calls).clone()
    }
}
