//! # portal-ui
//!
//! Leptos + WASM front-end for the NGO event-management portal: public
//! informational pages plus role-gated dashboards backed by a remote REST API.
//!
//! The heart of the crate is the session subsystem (`session`) and the
//! authenticated-fetch wrapper (`net`): a single injected `SessionStore`
//! tracks the credential tuple, persists it to localStorage, proactively
//! refreshes the access token before expiry, and backs the retry-once
//! behavior of every authenticated request. Pages and components are thin
//! view glue over that core.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

/// Hydration entry point invoked from the generated JS shim.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
