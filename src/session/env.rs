//! Environment seams for the session store: wall-clock time, persistent
//! credential storage, and the one-shot refresh timer.
//!
//! Each seam is a small trait so unit tests can substitute deterministic
//! fakes. The browser implementations live here too, with their bodies
//! gated on `hydrate` so the types compile (as inert stubs) on native
//! targets and on the server.

use parking_lot::Mutex;

/// Wall-clock time source.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Real clock. On wasm `SystemTime` is unavailable, so the browser build
/// reads `Date.now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        #[cfg(feature = "hydrate")]
        {
            #[allow(clippy::cast_possible_truncation)]
            {
                js_sys::Date::now() as i64
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
                .unwrap_or(0)
        }
    }
}

/// Persistent storage for the serialized credential tuple.
///
/// A single fixed key holds one JSON object; every write replaces the
/// whole value, so the persisted copy never disagrees with memory after
/// a store operation completes.
pub trait CredentialVault {
    fn load(&self) -> Option<String>;
    fn store(&self, raw: &str);
    fn clear(&self);
}

/// localStorage key for the credential tuple.
#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "portal_session";

/// Credential vault backed by browser localStorage. All operations are
/// silent no-ops when storage is unavailable (private browsing, server).
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageVault;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

impl CredentialVault for LocalStorageVault {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage().and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn store(&self, raw: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(STORAGE_KEY, raw);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = raw;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(STORAGE_KEY);
            }
        }
    }
}

/// One-shot, cancellable schedule for the proactive token refresh.
///
/// At most one task is armed at a time: arming replaces any pending task,
/// and `cancel` drops it without running it.
pub trait RefreshSchedule {
    fn arm(&self, delay_ms: i64, task: Box<dyn FnOnce() + Send>);
    fn cancel(&self);
}

/// Browser schedule backed by `setTimeout`. Only the integer timer handle
/// is retained, keeping the type thread-safe for the SSR build.
#[derive(Debug, Default)]
pub struct TimeoutSchedule {
    pending: Mutex<Option<i32>>,
}

impl RefreshSchedule for TimeoutSchedule {
    fn arm(&self, delay_ms: i64, task: Box<dyn FnOnce() + Send>) {
        self.cancel();
        #[cfg(feature = "hydrate")]
        {
            let delay = u32::try_from(delay_ms.max(0)).unwrap_or(u32::MAX);
            let handle = gloo_timers::callback::Timeout::new(delay, move || task()).forget();
            *self.pending.lock() = Some(handle);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (delay_ms, task);
        }
    }

    fn cancel(&self) {
        let handle = self.pending.lock().take();
        #[cfg(feature = "hydrate")]
        {
            if let (Some(handle), Some(window)) = (handle, web_sys::window()) {
                window.clear_timeout_with_handle(handle);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = handle;
        }
    }
}
