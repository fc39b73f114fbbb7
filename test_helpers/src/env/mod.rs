//! Scoped mutation of process environment variables.
//!
//! Every mutation happens under one global re-entrant mutex and yields an
//! RAII guard that puts the previous value back (or removes the variable)
//! when dropped. Guards for the same key restore in LIFO order.
//!
//! A single guard only serialises the mutation itself. Tests that need the
//! environment to stay fixed while they load configuration should hold an
//! [`EnvScope`], which keeps the lock until it is dropped.
//!
//! # Examples
//!
//! ```
//! use nestconf_test_helpers::env;
//!
//! let _scope = env::vars([("APP_PORT", Some("8080")), ("APP_HOST", None)]);
//! assert_eq!(std::env::var("APP_PORT").as_deref(), Ok("8080"));
//! assert!(std::env::var("APP_HOST").is_err());
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

type Lock = ReentrantMutexGuard<'static, ()>;

/// Restores one variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvVarGuard {
    /// Name of the guarded variable.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn apply(key: String, value: Option<&OsStr>, _lock: &Lock) -> Self {
        let original = env::var_os(&key);
        // SAFETY: callers hold `ENV_MUTEX`.
        unsafe { write(&key, value) };
        Self { key, original }
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        // SAFETY: `ENV_MUTEX` is held for the restoration.
        unsafe { write(&self.key, self.original.as_deref()) };
    }
}

/// Set or remove `key`.
///
/// # Safety
///
/// The caller must hold `ENV_MUTEX`.
unsafe fn write(key: &str, value: Option<&OsStr>) {
    match value {
        Some(value) => unsafe { env::set_var(key, value) },
        None => unsafe { env::remove_var(key) },
    }
}

/// Holds the environment lock and a set of guards.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: Lock,
}

impl EnvScope {
    /// Number of variables the scope restores on drop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the scope guards no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        // Restore newest first, still under `_lock`.
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

/// Set `key` to `value` until the guard drops.
///
/// # Examples
///
/// ```
/// use nestconf_test_helpers::env;
///
/// let _guard = env::set_var("HELPERS_DOC_SET", "on");
/// assert_eq!(std::env::var("HELPERS_DOC_SET").as_deref(), Ok("on"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let lock = ENV_MUTEX.lock();
    EnvVarGuard::apply(key.into(), Some(value.as_ref()), &lock)
}

/// Remove `key` until the guard drops.
pub fn remove_var<K: Into<String>>(key: K) -> EnvVarGuard {
    let lock = ENV_MUTEX.lock();
    EnvVarGuard::apply(key.into(), None, &lock)
}

/// Apply every `(key, value)` pair and keep the environment locked for the
/// lifetime of the returned scope. A `None` value removes the variable.
pub fn vars<I, K, V>(pairs: I) -> EnvScope
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let lock = ENV_MUTEX.lock();
    let guards = pairs
        .into_iter()
        .map(|(key, value)| {
            let value: Option<&OsStr> = value.as_ref().map(|text| text.as_ref());
            EnvVarGuard::apply(key.into(), value, &lock)
        })
        .collect();
    EnvScope {
        guards,
        _lock: lock,
    }
}

/// Run `f` while holding the environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_MUTEX.lock();
    f()
}

#[cfg(test)]
mod tests;
