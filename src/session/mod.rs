//! Session subsystem: the credential tuple, token inspection, the
//! session store state machine, and its environment seams.
//!
//! DESIGN
//! ======
//! The store is split from its environment (clock, persistent vault,
//! HTTP transport, refresh timer) by small traits so the whole token
//! lifecycle — login, hydration, proactive refresh, forced logout —
//! is unit-testable on the host with deterministic fakes.

pub mod credentials;
pub mod env;
pub mod store;
pub mod token;

pub use credentials::{Credentials, Role};
pub use env::{Clock, CredentialVault, LocalStorageVault, RefreshSchedule, SystemClock, TimeoutSchedule};
pub use store::{REFRESH_LEAD_MS, SessionState, SessionStore};

use crate::net::http::GlooTransport;

/// The store as wired in the running application: real clock,
/// localStorage vault, gloo transport, `setTimeout` schedule.
pub type BrowserSession = SessionStore<SystemClock, LocalStorageVault, GlooTransport, TimeoutSchedule>;
