//! Networking: HTTP primitives, the authenticated-fetch wrapper, and
//! REST endpoint glue for the portal backend.

pub mod api;
pub mod auth_fetch;
pub mod http;

pub use api::ApiError;
pub use auth_fetch::{AuthFetch, BrowserFetch};
pub use http::{GlooTransport, HttpError, HttpMethod, HttpRequest, HttpResponse, Transport};
