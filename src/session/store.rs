//! The session store: owner of the credential tuple and the token
//! lifecycle.
//!
//! DESIGN
//! ======
//! One `SessionStore` instance is constructed at startup and handed by
//! clone (it is a cheap `Arc` handle) to everything that needs it: the
//! authenticated-fetch wrapper, the login page, the nav bar. Nothing
//! reaches for it through a global.
//!
//! All mutable state lives behind a single mutex, and every
//! read-modify-write happens in one synchronous block with no await
//! inside, so a proactive-timer refresh and a 401-triggered refresh can
//! overlap in time without ever interleaving a partial write. Overlapping
//! refreshes are otherwise tolerated rather than collapsed: each call
//! produces one authoritative outcome, and a redundant refresh that loses
//! the race simply degrades to logout, which is always a safe state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::credentials::{ACCESS_TOKEN_FIELDS, Credentials, Role, first_string};
use super::env::{Clock, CredentialVault, RefreshSchedule};
use super::token;
use crate::net::api::REFRESH_TOKEN_PATH;
use crate::net::http::{HttpRequest, Transport};

/// The proactive timer fires this long before the access token's `exp`,
/// matching the validity skew so the token is replaced while still valid.
pub const REFRESH_LEAD_MS: i64 = token::EXPIRY_SKEW_SECS * 1000;

/// Derived, render-ready snapshot of the session. `authenticated` is
/// never persisted; it is recomputed by the store on every transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    /// True only while startup hydration is running. The route guard
    /// makes no navigation decision until this clears.
    pub loading: bool,
    pub authenticated: bool,
    pub role: Option<Role>,
    pub subject_id: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            loading: true,
            authenticated: false,
            role: None,
            subject_id: None,
        }
    }
}

type Observer = Arc<dyn Fn(SessionState) + Send + Sync>;

struct MutableState {
    credentials: Credentials,
    authenticated: bool,
    loading: bool,
}

struct Inner<C, V, T, S> {
    clock: C,
    vault: V,
    transport: T,
    schedule: S,
    state: Mutex<MutableState>,
    observer: Mutex<Option<Observer>>,
}

/// Single-instance session store. Clone the handle freely; all clones
/// share the same state.
pub struct SessionStore<C, V, T, S> {
    inner: Arc<Inner<C, V, T, S>>,
}

impl<C, V, T, S> Clone for SessionStore<C, V, T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, V, T, S> SessionStore<C, V, T, S>
where
    C: Clock + Send + Sync + 'static,
    V: CredentialVault + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
    S: RefreshSchedule + Send + Sync + 'static,
{
    pub fn new(clock: C, vault: V, transport: T, schedule: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                clock,
                vault,
                transport,
                schedule,
                state: Mutex::new(MutableState {
                    credentials: Credentials::default(),
                    authenticated: false,
                    loading: true,
                }),
                observer: Mutex::new(None),
            }),
        }
    }

    /// Register the single observer notified with a fresh [`SessionState`]
    /// after every transition. The current snapshot is pushed immediately.
    pub fn set_observer(&self, observer: impl Fn(SessionState) + Send + Sync + 'static) {
        *self.inner.observer.lock() = Some(Arc::new(observer));
        self.notify();
    }

    pub fn state(&self) -> SessionState {
        let state = self.inner.state.lock();
        SessionState {
            loading: state.loading,
            authenticated: state.authenticated,
            role: state.credentials.role,
            subject_id: state.credentials.subject_id.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.lock().authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().loading
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.state.lock().credentials.role
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.state.lock().credentials.access_token.clone()
    }

    pub(crate) fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// True iff the token decodes and its `exp` is outside the skew
    /// window. False for anything malformed; never panics.
    pub fn is_token_valid(&self, token: &str) -> bool {
        token::is_token_valid(token, self.inner.clock.now_ms() / 1000)
    }

    /// Adopt a successful login payload: normalize it into the credential
    /// tuple, persist, mark authenticated, and arm the proactive refresh
    /// timer. The token the server just issued is trusted as-is.
    pub fn login(&self, payload: &Value) {
        {
            let mut state = self.inner.state.lock();
            state.credentials = Credentials::from_login_response(payload);
            state.authenticated = true;
            self.persist_locked(&state.credentials);
        }
        self.arm_refresh_timer();
        self.notify();
    }

    /// Clear the session: wipe the tuple, the persisted copy, and any
    /// pending refresh timer. Safe to call repeatedly.
    pub fn logout(&self) {
        {
            let mut state = self.inner.state.lock();
            state.credentials.clear();
            state.authenticated = false;
        }
        self.inner.vault.clear();
        self.inner.schedule.cancel();
        self.notify();
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// `explicit` overrides the stored refresh token when provided. With
    /// no token available at all this logs out and resolves to `None`.
    /// On success only the access token is replaced (memory and storage)
    /// and the new token is returned; on any failure — non-2xx, network
    /// error, or a body without an access token — the session is logged
    /// out and `None` is returned.
    ///
    /// The proactive timer and the 401 retry path may both call this
    /// around the same time; calls are independent and each yields a
    /// single authoritative outcome.
    pub async fn refresh_access_token(&self, explicit: Option<String>) -> Option<String> {
        let refresh_token = explicit.or_else(|| {
            self.inner.state.lock().credentials.refresh_token.clone()
        });
        let Some(refresh_token) = refresh_token else {
            self.logout();
            return None;
        };

        let request = HttpRequest::post(REFRESH_TOKEN_PATH)
            .with_json(serde_json::json!({ "refresh": refresh_token }));
        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                leptos::logging::warn!("token refresh failed: {error}");
                self.logout();
                return None;
            }
        };

        if !response.is_success() {
            leptos::logging::warn!("token refresh rejected: {}", response.message());
            self.logout();
            return None;
        }

        let Some(access) = first_string(&response.body, ACCESS_TOKEN_FIELDS) else {
            leptos::logging::warn!("token refresh response carried no access token");
            self.logout();
            return None;
        };

        {
            let mut state = self.inner.state.lock();
            state.credentials.access_token = Some(access.clone());
            state.authenticated = true;
            self.persist_locked(&state.credentials);
        }
        self.arm_refresh_timer();
        self.notify();
        Some(access)
    }

    /// Resolve true if the current access token is valid, otherwise
    /// whether a single refresh attempt succeeded.
    pub async fn check_authentication(&self) -> bool {
        let valid = self
            .access_token()
            .is_some_and(|token| self.is_token_valid(&token));
        if valid {
            return true;
        }
        self.refresh_access_token(None).await.is_some()
    }

    /// Startup hydration: rebuild the session from the persisted tuple.
    /// Runs once per process lifetime, before any protected route is
    /// allowed to decide. Every branch ends with `loading = false`.
    pub async fn hydrate(&self) {
        if let Some(raw) = self.inner.vault.load() {
            match serde_json::from_str::<Credentials>(&raw) {
                Ok(stored) => {
                    let access_valid = stored
                        .access_token
                        .as_deref()
                        .is_some_and(|token| self.is_token_valid(token));
                    self.inner.state.lock().credentials = stored;

                    if access_valid {
                        self.inner.state.lock().authenticated = true;
                        self.arm_refresh_timer();
                    } else {
                        // Expired or absent access token: one refresh
                        // attempt; its failure path clears everything.
                        let _ = self.refresh_access_token(None).await;
                    }
                }
                Err(_) => {
                    // Corrupt persisted value: treat as no session.
                    self.inner.vault.clear();
                }
            }
        }

        self.inner.state.lock().loading = false;
        self.notify();
    }

    /// Arm the one-shot proactive refresh for the current access token,
    /// replacing any pending arm. With no decodable token the schedule is
    /// simply cancelled.
    fn arm_refresh_timer(&self) {
        let Some(expiry_secs) = self
            .access_token()
            .as_deref()
            .and_then(token::decode_expiry)
        else {
            self.inner.schedule.cancel();
            return;
        };

        let delay_ms = (expiry_secs * 1000 - self.inner.clock.now_ms() - REFRESH_LEAD_MS).max(0);
        let store = self.clone();
        self.inner
            .schedule
            .arm(delay_ms, Box::new(move || store.run_scheduled_refresh()));
    }

    /// Timer-fired entry point: performs one refresh on the event loop.
    fn run_scheduled_refresh(&self) {
        #[cfg(feature = "hydrate")]
        {
            let store = self.clone();
            leptos::task::spawn_local(async move {
                let _ = store.refresh_access_token(None).await;
            });
        }
        #[cfg(all(not(feature = "hydrate"), test))]
        {
            let store = self.clone();
            futures::executor::block_on(async move {
                let _ = store.refresh_access_token(None).await;
            });
        }
        #[cfg(all(not(feature = "hydrate"), not(test)))]
        {
            let _ = self;
        }
    }

    /// Write-through of the credential tuple; called with the state lock
    /// held so memory and storage cannot be observed disagreeing.
    fn persist_locked(&self, credentials: &Credentials) {
        match serde_json::to_string(credentials) {
            Ok(raw) => self.inner.vault.store(&raw),
            Err(error) => leptos::logging::warn!("failed to serialize session: {error}"),
        }
    }

    fn notify(&self) {
        let observer = self.inner.observer.lock().clone();
        if let Some(observer) = observer {
            observer(self.state());
        }
    }
}
