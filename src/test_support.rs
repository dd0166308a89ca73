//! Deterministic fakes for the session environment seams, shared by the
//! store, auth-fetch, and api tests.

use std::collections::VecDeque;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use parking_lot::Mutex;
use serde_json::Value;

use crate::net::http::{HttpError, HttpRequest, HttpResponse, Transport};
use crate::session::env::{Clock, CredentialVault, RefreshSchedule};
use crate::session::store::SessionStore;

/// Fixed test epoch: 2023-11-14T22:13:20Z, in milliseconds.
pub const T0_MS: i64 = 1_700_000_000_000;

pub const T0_SECS: i64 = T0_MS / 1000;

/// Manually advanced clock.
#[derive(Clone)]
pub struct FakeClock {
    now_ms: Arc<Mutex<i64>>,
}

impl FakeClock {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(Mutex::new(now_ms)),
        }
    }

    pub fn advance_ms(&self, delta: i64) {
        *self.now_ms.lock() += delta;
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        *self.now_ms.lock()
    }
}

/// In-memory credential vault.
#[derive(Clone, Default)]
pub struct MemoryVault {
    raw: Arc<Mutex<Option<String>>>,
}

impl MemoryVault {
    pub fn with(raw: &str) -> Self {
        Self {
            raw: Arc::new(Mutex::new(Some(raw.to_owned()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.raw.lock().clone()
    }
}

impl CredentialVault for MemoryVault {
    fn load(&self) -> Option<String> {
        self.raw.lock().clone()
    }

    fn store(&self, raw: &str) {
        *self.raw.lock() = Some(raw.to_owned());
    }

    fn clear(&self) {
        *self.raw.lock() = None;
    }
}

#[derive(Default)]
struct ScriptInner {
    responses: VecDeque<Result<HttpResponse, HttpError>>,
    requests: Vec<HttpRequest>,
}

/// Transport that replays scripted responses in order and records every
/// request it saw. An unscripted call fails as a network error.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptInner>>,
}

impl ScriptedTransport {
    pub fn reply(&self, status: u16, body: Value) {
        self.inner
            .lock()
            .responses
            .push_back(Ok(HttpResponse { status, body }));
    }

    pub fn fail_next(&self) {
        self.inner
            .lock()
            .responses
            .push_back(Err(HttpError::Network("connection reset".to_owned())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().requests.len()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.lock();
        inner.requests.push(request);
        inner
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::Network("no scripted response".to_owned())))
    }
}

#[derive(Default)]
struct ManualInner {
    armed: Option<(i64, Box<dyn FnOnce() + Send>)>,
    cancels: usize,
}

/// Schedule that records arms and lets the test fire the pending task.
#[derive(Clone, Default)]
pub struct ManualSchedule {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualSchedule {
    pub fn armed_delay_ms(&self) -> Option<i64> {
        self.inner.lock().armed.as_ref().map(|(delay, _)| *delay)
    }

    /// Run the pending task, if any. Returns whether one fired.
    pub fn fire(&self) -> bool {
        let armed = self.inner.lock().armed.take();
        match armed {
            Some((_, task)) => {
                task();
                true
            }
            None => false,
        }
    }

    pub fn cancel_count(&self) -> usize {
        self.inner.lock().cancels
    }
}

impl RefreshSchedule for ManualSchedule {
    fn arm(&self, delay_ms: i64, task: Box<dyn FnOnce() + Send>) {
        self.inner.lock().armed = Some((delay_ms, task));
    }

    fn cancel(&self) {
        let mut inner = self.inner.lock();
        inner.cancels += 1;
        inner.armed = None;
    }
}

pub type TestStore = SessionStore<FakeClock, MemoryVault, ScriptedTransport, ManualSchedule>;

/// A store wired to fakes, plus handles to each fake.
pub struct Harness {
    pub clock: FakeClock,
    pub vault: MemoryVault,
    pub transport: ScriptedTransport,
    pub schedule: ManualSchedule,
    pub store: TestStore,
}

pub fn harness() -> Harness {
    harness_with_vault(MemoryVault::default())
}

pub fn harness_with_vault(vault: MemoryVault) -> Harness {
    let clock = FakeClock::at(T0_MS);
    let transport = ScriptedTransport::default();
    let schedule = ManualSchedule::default();
    let store = SessionStore::new(
        clock.clone(),
        vault.clone(),
        transport.clone(),
        schedule.clone(),
    );
    Harness {
        clock,
        vault,
        transport,
        schedule,
        store,
    }
}

/// Build an unsigned JWT-shaped token with the given `exp` claim.
pub fn jwt(exp_secs: i64) -> String {
    let claims = serde_json::json!({ "exp": exp_secs, "sub": "u-1" });
    format!("header.{}.signature", URL_SAFE_NO_PAD.encode(claims.to_string()))
}

/// Standard login payload used across tests.
pub fn login_payload(access: &str) -> Value {
    serde_json::json!({
        "access": access,
        "refresh": "r-1",
        "role": "user",
        "unique_id": "u-1",
    })
}
