//! REST endpoint glue for the portal backend.
//!
//! ERROR HANDLING
//! ==============
//! Helpers return `Result` with a probed failure message so pages can
//! show the server's own wording and degrade instead of crashing. The
//! backend's business rules (district allocation, fee calculation) are
//! never computed or validated here — payloads pass through as JSON.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use crate::net::auth_fetch::AuthFetch;
use crate::net::http::{HttpError, HttpRequest, HttpResponse, Transport};
use crate::session::env::{Clock, CredentialVault, RefreshSchedule};
use crate::session::store::SessionStore;

pub const LOGIN_PATH: &str = "/api/login/";
pub const REFRESH_TOKEN_PATH: &str = "/api/refresh-token/";
pub const MEMBERS_PATH: &str = "/api/members/";
pub const ACTIVITIES_PATH: &str = "/api/activities/";
pub const WINGS_PATH: &str = "/api/wings/";
pub const DONATIONS_PATH: &str = "/api/donations/";
pub const MAIL_PATH: &str = "/api/mail/";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl ApiError {
    fn from_response(response: &HttpResponse) -> Self {
        Self::Rejected {
            status: response.status,
            message: response.message(),
        }
    }

    /// True when the server rejected the call as unauthenticated even
    /// after the retry-once path, i.e. the session is gone.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. })
    }
}

/// Log in with a role-specific credential body and adopt the session.
///
/// The raw success payload goes straight to [`SessionStore::login`],
/// which normalizes whichever field-name variant the server used.
pub async fn login<C, V, T, S>(
    session: &SessionStore<C, V, T, S>,
    credentials: Value,
) -> Result<(), ApiError>
where
    C: Clock + Send + Sync + 'static,
    V: CredentialVault + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
    S: RefreshSchedule + Send + Sync + 'static,
{
    let request = HttpRequest::post(LOGIN_PATH).with_json(credentials);
    let response = session.transport().send(request).await?;
    if !response.is_success() {
        return Err(ApiError::from_response(&response));
    }
    session.login(&response.body);
    Ok(())
}

/// Public (unauthenticated) activity listing for the activities page.
pub async fn public_activities<C, V, T, S>(
    session: &SessionStore<C, V, T, S>,
) -> Result<Vec<Value>, ApiError>
where
    C: Clock + Send + Sync + 'static,
    V: CredentialVault + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
    S: RefreshSchedule + Send + Sync + 'static,
{
    let response = session.transport().send(HttpRequest::get(ACTIVITIES_PATH)).await?;
    if !response.is_success() {
        return Err(ApiError::from_response(&response));
    }
    Ok(as_list(response.body))
}

/// Public donation submission from the donate page.
pub async fn submit_donation<C, V, T, S>(
    session: &SessionStore<C, V, T, S>,
    donation: Value,
) -> Result<Value, ApiError>
where
    C: Clock + Send + Sync + 'static,
    V: CredentialVault + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
    S: RefreshSchedule + Send + Sync + 'static,
{
    let request = HttpRequest::post(DONATIONS_PATH).with_json(donation);
    let response = session.transport().send(request).await?;
    if !response.is_success() {
        return Err(ApiError::from_response(&response));
    }
    Ok(response.body)
}

macro_rules! authed {
    ($response:expr) => {{
        let response = $response?;
        if !response.is_success() {
            return Err(ApiError::from_response(&response));
        }
        response.body
    }};
}

impl<C, V, T, S> AuthFetch<C, V, T, S>
where
    C: Clock + Send + Sync + 'static,
    V: CredentialVault + Send + Sync + 'static,
    T: Transport + Send + Sync + 'static,
    S: RefreshSchedule + Send + Sync + 'static,
{
    pub async fn list_members(&self) -> Result<Vec<Value>, ApiError> {
        Ok(as_list(authed!(self.get(MEMBERS_PATH).await)))
    }

    pub async fn create_member(&self, member: Value) -> Result<Value, ApiError> {
        Ok(authed!(self.post_json(MEMBERS_PATH, member).await))
    }

    pub async fn update_member(&self, id: &str, member: Value) -> Result<Value, ApiError> {
        let url = format!("{MEMBERS_PATH}{id}/");
        Ok(authed!(self.put_json(&url, member).await))
    }

    pub async fn delete_member(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{MEMBERS_PATH}{id}/");
        authed!(self.delete(&url).await);
        Ok(())
    }

    pub async fn list_activities(&self) -> Result<Vec<Value>, ApiError> {
        Ok(as_list(authed!(self.get(ACTIVITIES_PATH).await)))
    }

    pub async fn create_activity(&self, activity: Value) -> Result<Value, ApiError> {
        Ok(authed!(self.post_json(ACTIVITIES_PATH, activity).await))
    }

    pub async fn list_wings(&self) -> Result<Vec<Value>, ApiError> {
        Ok(as_list(authed!(self.get(WINGS_PATH).await)))
    }

    pub async fn create_wing(&self, wing: Value) -> Result<Value, ApiError> {
        Ok(authed!(self.post_json(WINGS_PATH, wing).await))
    }

    pub async fn list_donations(&self) -> Result<Vec<Value>, ApiError> {
        Ok(as_list(authed!(self.get(DONATIONS_PATH).await)))
    }

    pub async fn send_mail(&self, mail: Value) -> Result<Value, ApiError> {
        Ok(authed!(self.post_json(MAIL_PATH, mail).await))
    }
}

/// Accept either a bare JSON array or the common `{"results": [...]}`
/// pagination envelope.
fn as_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
