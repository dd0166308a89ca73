//! Access-token expiry inspection.
//!
//! The backend issues JWTs whose middle segment carries a numeric `exp`
//! claim (seconds since epoch). Nothing here verifies signatures — the
//! client only needs to know *when* the server will stop accepting the
//! token, so it decodes the payload locally and applies a fixed skew.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// A token within this many seconds of its `exp` claim is treated as
/// already expired, so refreshes happen before the server starts
/// rejecting requests.
pub const EXPIRY_SKEW_SECS: i64 = 300;

/// Extract the `exp` claim (seconds since epoch) from a JWT.
///
/// Returns `None` for anything that is not a decodable three-segment
/// token with a numeric `exp`: missing segments, bad base64, bad JSON,
/// or a non-numeric claim. Never panics.
pub fn decode_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    // Tokens arrive unpadded; strip any padding a proxy may have added.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims = serde_json::from_slice::<serde_json::Value>(&bytes).ok()?;
    let exp = claims.get("exp")?;

    #[allow(clippy::cast_possible_truncation)]
    exp.as_i64().or_else(|| exp.as_f64().map(|secs| secs as i64))
}

/// True iff the token's `exp` claim is more than [`EXPIRY_SKEW_SECS`]
/// in the future relative to `now_secs`.
///
/// A missing, malformed, or undecodable token is never valid.
pub fn is_token_valid(token: &str, now_secs: i64) -> bool {
    match decode_expiry(token) {
        Some(exp) => exp > now_secs + EXPIRY_SKEW_SECS,
        None => false,
    }
}
