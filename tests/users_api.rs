#![allow(clippy::unwrap_used)]

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

#[macro_use]
mod common;

use common::{add_user, bearer, build_app, token_for, PREFIX};

#[actix_web::test]
async fn superuser_creates_user_without_exposing_password() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "alice", true, false).await;
    let token = token_for(&app, "alice").await;
    let service = init_service!(app);

    let req = test::TestRequest::post()
        .uri(&format!("{PREFIX}/users/"))
        .insert_header(bearer(&token))
        .set_json(json!({ "username": "bob", "password": "s3cret", "full_name": "Bob" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "bob");
    assert_eq!(body["full_name"], "Bob");
    assert_eq!(body["disabled"], false);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn regular_user_reads_only_self() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "alice", true, false).await;
    add_user(&store, "bob", false, false).await;
    let token = token_for(&app, "bob").await;
    let service = init_service!(app);

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/alice"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "forbidden");

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/bob"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "bob");
}

#[actix_web::test]
async fn me_route_is_not_a_username() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "bob", false, false).await;
    let token = token_for(&app, "bob").await;
    let service = init_service!(app);

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/me"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "bob");
}

#[actix_web::test]
async fn partial_update_of_own_profile() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "bob", false, false).await;
    let token = token_for(&app, "bob").await;
    let service = init_service!(app);

    let req = test::TestRequest::put()
        .uri(&format!("{PREFIX}/users/me"))
        .insert_header(bearer(&token))
        .set_json(json!({ "full_name": "Bob" }))
        .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

    // fields other than password, full_name and email are ignored
    let req = test::TestRequest::put()
        .uri(&format!("{PREFIX}/users/me"))
        .insert_header(bearer(&token))
        .set_json(json!({ "email": "bob@example.com", "admin_roles": ["superuser"] }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["full_name"], "Bob");
    assert_eq!(body["email"], "bob@example.com");
    assert_eq!(body["admin_roles"], json!([]));
}

#[actix_web::test]
async fn disabled_user_is_rejected_as_inactive() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "carol", true, true).await;
    let token = token_for(&app, "carol").await;
    let service = init_service!(app);

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "inactive_user");
}

#[actix_web::test]
async fn missing_or_bad_token_is_unauthenticated() {
    let (app, _store) = build_app(|_| {});
    let service = init_service!(app);

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/me"))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "unauthenticated");

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/me"))
        .insert_header(bearer("not.a.token"))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn superuser_lists_and_updates() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "alice", true, false).await;
    add_user(&store, "bob", false, false).await;
    let token = token_for(&app, "alice").await;
    let service = init_service!(app);

    let req = test::TestRequest::put()
        .uri(&format!("{PREFIX}/users/bob"))
        .insert_header(bearer(&token))
        .set_json(json!({ "admin_channels": ["news"], "disabled": true }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["admin_channels"], json!(["news"]));
    assert_eq!(body["disabled"], true);

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/?skip=1&limit=5"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([{
        "username": "bob",
        "email": null,
        "full_name": null,
        "disabled": true,
        "admin_channels": ["news"],
        "admin_roles": []
    }]));

    let req = test::TestRequest::put()
        .uri(&format!("{PREFIX}/users/ghost"))
        .insert_header(bearer(&token))
        .set_json(json!({ "full_name": "Ghost" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_requires_query() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "alice", true, false).await;
    add_user(&store, "bobby", false, false).await;
    let token = token_for(&app, "alice").await;
    let service = init_service!(app);

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/search/?q=BOB"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["username"], "bobby");

    let req = test::TestRequest::get()
        .uri(&format!("{PREFIX}/users/search/?q=%20"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalid_form_body");
}

#[actix_web::test]
async fn open_registration_follows_the_switch() {
    let (closed, _store) = build_app(|_| {});
    let service = init_service!(closed);

    let req = test::TestRequest::post()
        .uri(&format!("{PREFIX}/users/open"))
        .set_json(json!({ "username": "dave" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "registration_closed");

    let (open, store) = build_app(|cfg| cfg.users_open_registration = true);
    add_user(&store, "bob", false, false).await;
    let service = init_service!(open);

    let req = test::TestRequest::post()
        .uri(&format!("{PREFIX}/users/open"))
        .set_json(json!({ "username": "bob", "password": "whatever" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "user_exists");

    let req = test::TestRequest::post()
        .uri(&format!("{PREFIX}/users/open"))
        .set_json(json!({ "username": "dave", "password": "hunter22", "admin_roles": ["superuser"] }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "dave");
    assert_eq!(body["admin_roles"], json!([]));
}

#[actix_web::test]
async fn invalid_body_is_reported_per_field() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "alice", true, false).await;
    let token = token_for(&app, "alice").await;
    let service = init_service!(app);

    let req = test::TestRequest::post()
        .uri(&format!("{PREFIX}/users/"))
        .insert_header(bearer(&token))
        .set_json(json!({ "username": "me", "password": "", "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalid_form_body");
    for field in ["username", "password", "email"] {
        assert!(body["errors"].get(field).is_some(), "missing {field}");
    }
}

#[actix_web::test]
async fn privilege_is_checked_before_the_input() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "bob", false, false).await;
    add_user(&store, "carol", true, true).await;
    let bob = token_for(&app, "bob").await;
    let carol = token_for(&app, "carol").await;
    let service = init_service!(app);

    for (token, status, code) in [
        (&bob, StatusCode::FORBIDDEN, "forbidden"),
        (&carol, StatusCode::BAD_REQUEST, "inactive_user"),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("{PREFIX}/users/"))
            .insert_header(bearer(token))
            .set_json(json!({ "username": "me", "password": "x" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), status);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], code);

        let req = test::TestRequest::get()
            .uri(&format!("{PREFIX}/users/search/?q=%20"))
            .insert_header(bearer(token))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), status);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], code);

        let req = test::TestRequest::put()
            .uri(&format!("{PREFIX}/users/bob"))
            .insert_header(bearer(token))
            .set_json(json!({ "email": "not-an-email" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), status);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], code);
    }
}

#[actix_web::test]
async fn disabled_user_profile_update_is_inactive_before_validation() {
    let (app, store) = build_app(|_| {});
    add_user(&store, "carol", false, true).await;
    let token = token_for(&app, "carol").await;
    let service = init_service!(app);

    let req = test::TestRequest::put()
        .uri(&format!("{PREFIX}/users/me"))
        .insert_header(bearer(&token))
        .set_json(json!({ "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "inactive_user");
}
