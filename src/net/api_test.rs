use futures::executor::block_on;
use serde_json::json;

use super::{ApiError, LOGIN_PATH, login, public_activities, submit_donation};
use crate::net::auth_fetch::AuthFetch;
use crate::net::http::HttpMethod;
use crate::session::credentials::Role;
use crate::test_support::{T0_SECS, harness, jwt, login_payload};

#[test]
fn login_posts_credentials_and_adopts_the_session() {
    let h = harness();
    h.transport.reply(200, login_payload(&jwt(T0_SECS + 3600)));

    let body = json!({ "username": "ada", "password": "pw", "role": "user" });
    block_on(login(&h.store, body.clone())).unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, LOGIN_PATH);
    assert_eq!(requests[0].body, Some(body));

    assert!(h.store.is_authenticated());
    assert_eq!(h.store.role(), Some(Role::User));
}

#[test]
fn login_rejection_surfaces_the_server_message() {
    let h = harness();
    h.transport
        .reply(400, json!({ "detail": "invalid credentials" }));

    let error = block_on(login(&h.store, json!({}))).unwrap_err();

    assert_eq!(error.to_string(), "invalid credentials");
    assert!(matches!(error, ApiError::Rejected { status: 400, .. }));
    assert!(!h.store.is_authenticated());
}

#[test]
fn login_network_failure_maps_to_http_error() {
    let h = harness();
    h.transport.fail_next();

    let error = block_on(login(&h.store, json!({}))).unwrap_err();
    assert!(matches!(error, ApiError::Http(_)));
}

#[test]
fn public_activities_need_no_session() {
    let h = harness();
    h.transport.reply(200, json!([{ "title": "Cleanup drive" }]));

    let items = block_on(public_activities(&h.store)).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(h.transport.requests()[0].authorization(), None);
}

#[test]
fn list_endpoints_unwrap_the_results_envelope() {
    let h = harness();
    h.transport.reply(
        200,
        json!({ "count": 2, "results": [{ "title": "a" }, { "title": "b" }] }),
    );

    let items = block_on(public_activities(&h.store)).unwrap();
    assert_eq!(items.len(), 2);

    // A non-list body degrades to an empty list rather than an error.
    h.transport.reply(200, json!({ "unexpected": true }));
    let items = block_on(public_activities(&h.store)).unwrap();
    assert!(items.is_empty());
}

#[test]
fn submit_donation_returns_the_created_record() {
    let h = harness();
    h.transport.reply(201, json!({ "id": 7, "amount": "50" }));

    let created =
        block_on(submit_donation(&h.store, json!({ "donor": "Ada", "amount": "50" }))).unwrap();

    assert_eq!(created["id"], 7);
}

#[test]
fn authed_endpoints_map_failures_to_rejected() {
    let h = harness();
    h.store.login(&login_payload(&jwt(T0_SECS + 3600)));
    let fetch = AuthFetch::new(h.store.clone());
    h.transport.reply(403, json!({ "detail": "admins only" }));

    let error = block_on(fetch.list_members()).unwrap_err();

    assert!(matches!(error, ApiError::Rejected { status: 403, .. }));
    assert_eq!(error.to_string(), "admins only");
    assert!(!error.is_session_expired());
}

#[test]
fn session_expiry_is_a_401_after_the_retry_path() {
    let h = harness();
    h.store.login(&login_payload(&jwt(T0_SECS + 3600)));
    let fetch = AuthFetch::new(h.store.clone());
    // Original 401, then the refresh is rejected too.
    h.transport.reply(401, json!(null));
    h.transport.reply(401, json!(null));

    let error = block_on(fetch.list_members()).unwrap_err();

    assert!(error.is_session_expired());
    assert!(!h.store.is_authenticated());
}

#[test]
fn member_endpoints_hit_id_scoped_urls() {
    let h = harness();
    h.store.login(&login_payload(&jwt(T0_SECS + 3600)));
    let fetch = AuthFetch::new(h.store.clone());
    h.transport.reply(200, json!({ "id": "m-1" }));
    h.transport.reply(204, json!(null));

    block_on(fetch.update_member("m-1", json!({ "name": "Ada" }))).unwrap();
    block_on(fetch.delete_member("m-1")).unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Put);
    assert_eq!(requests[0].url, "/api/members/m-1/");
    assert_eq!(requests[1].method, HttpMethod::Delete);
    assert_eq!(requests[1].url, "/api/members/m-1/");
}

#[test]
fn create_endpoints_post_the_payload_through() {
    let h = harness();
    h.store.login(&login_payload(&jwt(T0_SECS + 3600)));
    let fetch = AuthFetch::new(h.store.clone());
    h.transport.reply(201, json!({ "id": 1 }));
    h.transport.reply(201, json!({ "id": 2 }));

    block_on(fetch.create_wing(json!({ "name": "Youth wing" }))).unwrap();
    block_on(fetch.send_mail(json!({ "subject": "Hello" }))).unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests[0].url, "/api/wings/");
    assert_eq!(requests[1].url, "/api/mail/");
    assert_eq!(requests[1].body, Some(json!({ "subject": "Hello" })));
}
