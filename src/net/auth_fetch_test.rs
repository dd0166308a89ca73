use futures::executor::block_on;
use serde_json::json;

use crate::net::api::REFRESH_TOKEN_PATH;
use crate::net::auth_fetch::AuthFetch;
use crate::net::http::{HttpError, HttpRequest};
use crate::test_support::{
    FakeClock, Harness, ManualSchedule, MemoryVault, ScriptedTransport, T0_SECS, harness, jwt,
    login_payload,
};

type TestFetch = AuthFetch<FakeClock, MemoryVault, ScriptedTransport, ManualSchedule>;

fn signed_in() -> (Harness, TestFetch) {
    let h = harness();
    h.store.login(&login_payload(&jwt(T0_SECS + 3600)));
    let fetch = AuthFetch::new(h.store.clone());
    (h, fetch)
}

#[test]
fn injects_the_current_bearer_token() {
    let (h, fetch) = signed_in();
    h.transport.reply(200, json!({ "ok": true }));

    let response = block_on(fetch.get("/api/members/")).unwrap();

    assert_eq!(response.status, 200);
    let requests = h.transport.requests();
    assert_eq!(requests.len(), 1);
    let expected = format!("Bearer {}", h.store.access_token().unwrap());
    assert_eq!(requests[0].authorization(), Some(expected.as_str()));
}

#[test]
fn sends_without_a_bearer_when_logged_out() {
    let h = harness();
    let fetch = AuthFetch::new(h.store.clone());
    h.transport.reply(200, json!([]));

    block_on(fetch.get("/api/activities/")).unwrap();

    assert_eq!(h.transport.requests()[0].authorization(), None);
}

#[test]
fn retries_once_after_a_successful_refresh() {
    let (h, fetch) = signed_in();
    let fresh = jwt(T0_SECS + 7200);
    h.transport.reply(401, json!({ "detail": "token expired" }));
    h.transport.reply(200, json!({ "access": fresh }));
    h.transport.reply(200, json!({ "items": [] }));

    let response = block_on(fetch.get("/api/members/")).unwrap();

    // The retry's response is what the caller sees.
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "items": [] }));

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].url, REFRESH_TOKEN_PATH);
    // The retry reissued the same call with the fresh token.
    assert_eq!(requests[2].url, "/api/members/");
    let expected = format!("Bearer {fresh}");
    assert_eq!(requests[2].authorization(), Some(expected.as_str()));
}

#[test]
fn failed_refresh_returns_the_original_401() {
    let (h, fetch) = signed_in();
    h.transport.reply(401, json!({ "detail": "token expired" }));
    h.transport.reply(401, json!({ "detail": "refresh rejected" }));

    let response = block_on(fetch.get("/api/members/")).unwrap();

    assert_eq!(response.status, 401);
    assert_eq!(response.body, json!({ "detail": "token expired" }));
    // Two calls total: the original and the refresh. No retry.
    assert_eq!(h.transport.request_count(), 2);
    assert!(!h.store.is_authenticated());
}

#[test]
fn a_retry_that_still_fails_is_returned_not_looped() {
    let (h, fetch) = signed_in();
    h.transport.reply(401, json!(null));
    h.transport.reply(200, json!({ "access": jwt(T0_SECS + 7200) }));
    h.transport.reply(401, json!({ "detail": "still unauthorized" }));

    let response = block_on(fetch.get("/api/members/")).unwrap();

    assert_eq!(response.status, 401);
    assert_eq!(response.body, json!({ "detail": "still unauthorized" }));
    assert_eq!(h.transport.request_count(), 3);
}

#[test]
fn non_401_failures_pass_through_untouched() {
    let (h, fetch) = signed_in();
    h.transport.reply(500, json!({ "message": "boom" }));

    let response = block_on(fetch.get("/api/members/")).unwrap();

    assert_eq!(response.status, 500);
    assert_eq!(h.transport.request_count(), 1);
    assert!(h.store.is_authenticated());
}

#[test]
fn network_errors_propagate_without_a_retry() {
    let (h, fetch) = signed_in();
    h.transport.fail_next();

    let result = block_on(fetch.get("/api/members/"));

    assert!(matches!(result, Err(HttpError::Network(_))));
    assert_eq!(h.transport.request_count(), 1);
}

#[test]
fn post_json_carries_the_body() {
    let (h, fetch) = signed_in();
    h.transport.reply(201, json!({ "id": 1 }));

    block_on(fetch.post_json("/api/members/", json!({ "name": "Ada" }))).unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests[0].body, Some(json!({ "name": "Ada" })));
}

#[test]
fn send_preserves_caller_headers_on_retry() {
    let (h, fetch) = signed_in();
    h.transport.reply(401, json!(null));
    h.transport.reply(200, json!({ "access": jwt(T0_SECS + 7200) }));
    h.transport.reply(200, json!(null));

    let request = HttpRequest::get("/api/members/").with_header("X-Trace", "t-9");
    block_on(fetch.send(request)).unwrap();

    let requests = h.transport.requests();
    assert!(requests[2].headers.iter().any(|(name, value)| name == "X-Trace" && value == "t-9"));
}
