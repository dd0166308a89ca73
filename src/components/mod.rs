//! Shared UI components.

pub mod nav_bar;
pub mod route_guard;
