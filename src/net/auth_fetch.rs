//! Authenticated-fetch wrapper: bearer injection plus a single
//! status-triggered refresh-and-retry.
//!
//! This is a decorator over the plain transport with the same call
//! surface, so page glue that starts out using the transport directly is
//! drop-in compatible. The policy is deliberately narrow: at most two
//! network attempts per logical call, only a 401 triggers the second,
//! and the retry path never loops.

#[cfg(test)]
#[path = "auth_fetch_test.rs"]
mod auth_fetch_test;

use serde_json::Value;

use crate::net::http::{HttpError, HttpRequest, HttpResponse, Transport};
use crate::session::env::{Clock, CredentialVault, LocalStorageVault, RefreshSchedule, SystemClock, TimeoutSchedule};
use crate::session::store::SessionStore;

use super::http::GlooTransport;

/// Decorated HTTP call primitive. Holds a clone of the session store
/// handle and shares its transport.
pub struct AuthFetch<C, V, T, S> {
    session: SessionStore<C, V, T, S>,
}

impl<C, V, T, S> Clone for AuthFetch<C, V, T, S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
        }
    }
}

/// The wrapper as wired in the running application.
pub type BrowserFetch = AuthFetch<SystemClock, LocalStorageVault, GlooTransport, TimeoutSchedule>;

impl<C, V, T, S> AuthFetch<C, V, T, S>
where
    C: Clock + Send + Sync + 'static,
    V: CredentialVault + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
    S: RefreshSchedule + Send + Sync + 'static,
{
    pub fn new(session: SessionStore<C, V, T, S>) -> Self {
        Self { session }
    }

    /// Issue `request` with the current bearer token.
    ///
    /// On a 401 the store performs one refresh; if that yields a new
    /// token the request is rebuilt with the fresh `Authorization`
    /// header and reissued exactly once, and that second response is
    /// returned whatever its status. If the refresh yields nothing the
    /// original 401 comes back unchanged (the store is already logged
    /// out at that point). Any other status returns as-is, and network
    /// failures propagate without a retry.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, HttpError> {
        if let Some(token) = self.session.access_token() {
            request.set_bearer(&token);
        }

        let first = self.session.transport().send(request.clone()).await?;
        if !first.is_unauthorized() {
            return Ok(first);
        }

        let Some(fresh) = self.session.refresh_access_token(None).await else {
            return Ok(first);
        };

        request.set_bearer(&fresh);
        self.session.transport().send(request).await
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::get(url)).await
    }

    pub async fn post_json(&self, url: &str, body: Value) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::post(url).with_json(body)).await
    }

    pub async fn put_json(&self, url: &str, body: Value) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::put(url).with_json(body)).await
    }

    pub async fn delete(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::delete(url)).await
    }
}
