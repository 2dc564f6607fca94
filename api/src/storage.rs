//! Client-side credential storage.
//!
//! The console keeps its session in three cookies: the bearer credential
//! (`token`), the signed-in user as JSON (`user`) and the last selected
//! module as JSON (`selectedModule`). Every cookie expires 30 days after it
//! was last written.
//!
//! Two jars are provided: [`MemoryCookieJar`] for tests and short-lived
//! processes, and [`FileCookieJar`] which survives restarts.

use crate::error::StorageError;
use admin_console_core::environment::{Clock, SystemClock};
use admin_console_core::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cookie names used by the console
pub mod keys {
    /// Bearer credential (the refresh-token string after OTP verification)
    pub const TOKEN: &str = "token";
    /// Signed-in user, JSON encoded
    pub const USER: &str = "user";
    /// Last module picked in the dashboard, JSON encoded
    pub const SELECTED_MODULE: &str = "selectedModule";
}

/// Lifetime of a cookie after it is written
pub const COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Key/value credential store with cookie semantics
///
/// Reads never fail: a missing, expired or unreadable cookie is `None`.
pub trait CredentialStorage: Send + Sync {
    /// Read a cookie
    fn get(&self, key: &str) -> Option<String>;

    /// Write a cookie, resetting its expiry
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the jar cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a cookie; deleting a missing cookie is not an error
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the jar cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON helpers over any [`CredentialStorage`]
pub trait CredentialStorageExt: CredentialStorage {
    /// Read and decode a JSON cookie; undecodable values read as `None`
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::debug!(key, %error, "Ignoring undecodable cookie");
                None
            },
        }
    }

    /// Encode and write a JSON cookie
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or persisting fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: CredentialStorage + ?Sized> CredentialStorageExt for S {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Cookie {
    value: String,
    expires: DateTime<Utc>,
}

impl Cookie {
    fn fresh(value: &str, now: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            expires: now + chrono::Duration::days(COOKIE_MAX_AGE_DAYS),
        }
    }

    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}

type Cookies = HashMap<String, Cookie>;

fn lock(cookies: &Mutex<Cookies>) -> MutexGuard<'_, Cookies> {
    cookies.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process cookie jar
///
/// Clones share the same cookies.
#[derive(Clone)]
pub struct MemoryCookieJar {
    cookies: Arc<Mutex<Cookies>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCookieJar {
    /// Empty jar on the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Empty jar that expires cookies against `clock`
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            cookies: Arc::new(Mutex::new(HashMap::new())),
            clock: Arc::new(clock),
        }
    }
}

impl Default for MemoryCookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCookieJar")
            .field("cookies", &lock(&self.cookies).len())
            .finish_non_exhaustive()
    }
}

impl CredentialStorage for MemoryCookieJar {
    fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        lock(&self.cookies)
            .get(key)
            .filter(|cookie| cookie.is_live(now))
            .map(|cookie| cookie.value.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let cookie = Cookie::fresh(value, self.clock.now());
        lock(&self.cookies).insert(key.to_string(), cookie);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.cookies).remove(key);
        Ok(())
    }
}

/// Cookie jar persisted as a JSON file
///
/// The file is re-read on every access so several console processes can
/// share one jar. Expired cookies are pruned whenever the jar is written.
#[derive(Clone)]
pub struct FileCookieJar {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    write_lock: Arc<Mutex<()>>,
}

impl FileCookieJar {
    /// Jar stored at `path` on the system clock
    ///
    /// The file and its parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }

    /// Jar stored at `path` that expires cookies against `clock`
    #[must_use]
    pub fn with_clock(path: impl Into<PathBuf>, clock: impl Clock + 'static) -> Self {
        Self {
            path: path.into(),
            clock: Arc::new(clock),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Cookies, StorageError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(error) => Err(error.into()),
        }
    }

    fn modify(&self, change: impl FnOnce(&mut Cookies)) -> Result<(), StorageError> {
        // Serializes read-modify-write cycles within this process
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut cookies = match self.load() {
            Ok(cookies) => cookies,
            Err(StorageError::Serialization(error)) => {
                tracing::warn!(path = %self.path.display(), %error, "Discarding undecodable cookie jar");
                HashMap::new()
            },
            Err(error) => return Err(error),
        };
        change(&mut cookies);
        let now = self.clock.now();
        cookies.retain(|_, cookie| cookie.is_live(now));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(&cookies)?;
        let staging = self.path.with_extension("tmp");
        std::fs::write(&staging, bytes)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl std::fmt::Debug for FileCookieJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCookieJar")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CredentialStorage for FileCookieJar {
    fn get(&self, key: &str) -> Option<String> {
        let cookies = match self.load() {
            Ok(cookies) => cookies,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "Unreadable cookie jar");
                return None;
            },
        };

        let now = self.clock.now();
        cookies
            .get(key)
            .filter(|cookie| cookie.is_live(now))
            .map(|cookie| cookie.value.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let cookie = Cookie::fresh(value, self.clock.now());
        self.modify(|cookies| {
            cookies.insert(key.to_string(), cookie);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|cookies| {
            cookies.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use admin_console_testing::{test_clock, ManualClock};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Selection {
        name: String,
    }

    #[test]
    fn memory_jar_round_trips_values() {
        let jar = MemoryCookieJar::with_clock(test_clock());

        jar.set(keys::TOKEN, "refresh-abc").unwrap();

        assert_eq!(jar.get(keys::TOKEN).as_deref(), Some("refresh-abc"));
        jar.remove(keys::TOKEN).unwrap();
        assert_eq!(jar.get(keys::TOKEN), None);
    }

    #[test]
    fn cookies_expire_after_thirty_days() {
        let clock = ManualClock::new(test_clock().now());
        let jar = MemoryCookieJar::with_clock(clock.clone());
        jar.set(keys::TOKEN, "refresh-abc").unwrap();

        clock.advance(chrono::Duration::days(COOKIE_MAX_AGE_DAYS - 1));
        assert!(jar.get(keys::TOKEN).is_some());

        clock.advance(chrono::Duration::days(1));
        assert_eq!(jar.get(keys::TOKEN), None);
    }

    #[test]
    fn json_helpers_encode_and_tolerate_garbage() {
        let jar = MemoryCookieJar::with_clock(test_clock());
        let selection = Selection {
            name: "E-learning".to_string(),
        };

        jar.set_json(keys::SELECTED_MODULE, &selection).unwrap();
        assert_eq!(jar.get_json::<Selection>(keys::SELECTED_MODULE), Some(selection));

        jar.set(keys::USER, "{not json").unwrap();
        assert_eq!(jar.get_json::<Selection>(keys::USER), None);
    }

    #[test]
    fn file_jar_survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("cookies.json");

        FileCookieJar::with_clock(&path, test_clock())
            .set(keys::TOKEN, "refresh-abc")
            .unwrap();

        let reopened = FileCookieJar::with_clock(&path, test_clock());
        assert_eq!(reopened.get(keys::TOKEN).as_deref(), Some("refresh-abc"));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn file_jar_prunes_expired_cookies_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let clock = ManualClock::new(test_clock().now());
        let jar = FileCookieJar::with_clock(&path, clock.clone());

        jar.set(keys::USER, "{}").unwrap();
        clock.advance(chrono::Duration::days(COOKIE_MAX_AGE_DAYS + 1));
        jar.set(keys::TOKEN, "fresh").unwrap();

        let raw: Cookies = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(!raw.contains_key(keys::USER));
        assert!(raw.contains_key(keys::TOKEN));
    }

    #[test]
    fn corrupt_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, b"{not json").unwrap();
        let jar = FileCookieJar::with_clock(&path, test_clock());

        assert_eq!(jar.get(keys::TOKEN), None);
        jar.set(keys::TOKEN, "refresh-abc").unwrap();

        assert_eq!(jar.get(keys::TOKEN).as_deref(), Some("refresh-abc"));
        std::fs::write(&path, b"[]").unwrap();
        jar.remove(keys::USER).unwrap();
        assert_eq!(jar.get(keys::TOKEN), None);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let jar = FileCookieJar::new(dir.path().join("absent.json"));

        assert_eq!(jar.get(keys::TOKEN), None);
        jar.remove(keys::TOKEN).unwrap();
    }
}
