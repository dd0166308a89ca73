//! The credential tuple and the login-response normalization contract.
//!
//! LOGIN CONTRACT
//! ==============
//! The login endpoint has returned several payload shapes over time, so
//! each logical field is probed against an explicit ordered list of
//! candidate names. The first present string wins:
//!
//! - access token:  `access`, `token`, `accessToken`
//! - refresh token: `refresh`, `refreshToken`, `refresh_token`
//! - role:          `role`, `user_role`
//! - subject id:    `unique_id`, `id`, `user_id`
//!
//! Whatever variant the server sends, [`Credentials::from_login_response`]
//! produces the same normalized tuple.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const ACCESS_TOKEN_FIELDS: &[&str] = &["access", "token", "accessToken"];
pub(crate) const REFRESH_TOKEN_FIELDS: &[&str] = &["refresh", "refreshToken", "refresh_token"];
pub(crate) const ROLE_FIELDS: &[&str] = &["role", "user_role"];
pub(crate) const SUBJECT_ID_FIELDS: &[&str] = &["unique_id", "id", "user_id"];

/// Role of the signed-in principal, gating which dashboard renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    User,
    Admin,
    DistrictAdmin,
}

impl Role {
    /// Lenient parse for role tags as the backend spells them.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            "district-admin" | "district_admin" | "districtadmin" => Some(Self::DistrictAdmin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::DistrictAdmin => "district-admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted credential tuple. All fields optional: an absent access
/// token with a present refresh token is the valid expired-but-refreshable
/// state, and the fully absent tuple means logged out.
///
/// The serde shape of this struct is the localStorage layout; there is no
/// version field, and hydration clears anything it cannot parse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub subject_id: Option<String>,
}

impl Credentials {
    /// Normalize a loosely-shaped login payload into the tuple by probing
    /// the candidate field names documented above.
    pub fn from_login_response(payload: &Value) -> Self {
        Self {
            access_token: first_string(payload, ACCESS_TOKEN_FIELDS),
            refresh_token: first_string(payload, REFRESH_TOKEN_FIELDS),
            role: first_string(payload, ROLE_FIELDS).and_then(|raw| Role::parse(&raw)),
            // Some payload variants carry a numeric id.
            subject_id: first_string(payload, SUBJECT_ID_FIELDS)
                .or_else(|| first_integer(payload, SUBJECT_ID_FIELDS).map(|id| id.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.role.is_none()
            && self.subject_id.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn first_integer(payload: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| payload.get(key).and_then(Value::as_i64))
}

/// First non-empty string among `keys`, tried in order.
pub(crate) fn first_string(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| payload.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
