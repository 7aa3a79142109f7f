//! Tests for user handlers and login.

use super::*;
use crate::test_support::http::{bearer, test_app};
use crate::test_support::{MemoryHarness, TEST_PASSWORD};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn harness() -> MemoryHarness {
    MemoryHarness::new()
}

fn user_body(email: &str, role: &str) -> Value {
    json!({
        "name": "Dra. Helena",
        "email": email,
        "password": "s3cret-passw0rd",
        "role": role,
    })
}

#[rstest]
#[actix_web::test]
async fn login_returns_a_bearer_token(harness: MemoryHarness) {
    let (user, _) = harness.login_as(Role::Examiner).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(json!({"email": user.email.as_str(), "password": TEST_PASSWORD}))
        .to_request();
    let response: LoginResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.expires_in, 3600);
    assert_eq!(response.user.role, "perito");
    let principal = harness
        .state
        .users
        .authenticate(&response.token)
        .expect("token authenticates");
    assert_eq!(principal.user_id, user.id);
}

#[rstest]
#[case(json!({"email": "nobody@example.org", "password": "whatever-pw"}), StatusCode::UNAUTHORIZED)]
#[case(json!({"email": "nobody@example.org"}), StatusCode::BAD_REQUEST)]
#[case(json!({"password": "whatever-pw"}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn login_failures(
    harness: MemoryHarness,
    #[case] body: Value,
    #[case] expected: StatusCode,
) {
    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn admin_creates_and_reads_users(harness: MemoryHarness) {
    let (_, token) = harness.login_as(Role::Admin).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let create = bearer(actix_test::TestRequest::post().uri("/api/user"), &token)
        .set_json(user_body("helena@example.org", "assistente"))
        .to_request();
    let response = actix_test::call_service(&app, create).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(response).await;
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    let id = created["id"].as_str().expect("id");
    let get = bearer(
        actix_test::TestRequest::get().uri(&format!("/api/user/{id}")),
        &token,
    )
    .to_request();
    let fetched: UserResponse = actix_test::call_and_read_body_json(&app, get).await;
    assert_eq!(fetched.email, "helena@example.org");
    assert_eq!(fetched.role, "assistente");
    assert_eq!(fetched.name, "Dra. Helena");
}

#[rstest]
#[case(Role::Examiner)]
#[case(Role::Assistant)]
#[actix_web::test]
async fn non_admins_are_forbidden(harness: MemoryHarness, #[case] role: Role) {
    let (_, token) = harness.login_as(role).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = bearer(actix_test::TestRequest::get().uri("/api/user"), &token).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn missing_token_is_unauthorized(harness: MemoryHarness) {
    let app = actix_test::init_service(test_app(harness.state.clone())).await;
    let request = actix_test::TestRequest::get().uri("/api/user").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.error, "missing bearer token");
    assert!(body.trace_id.is_some());
}

#[rstest]
#[case(user_body("bad-email", "perito"), "invalid email")]
#[case(user_body("ok@example.org", "wizard"), "invalid role")]
#[case(json!({"name": "No Password", "email": "np@example.org", "role": "perito"}), "missing required field: password")]
#[actix_web::test]
async fn create_rejects_invalid_payloads(
    harness: MemoryHarness,
    #[case] body: Value,
    #[case] message: &str,
) {
    let (_, token) = harness.login_as(Role::Admin).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = bearer(actix_test::TestRequest::post().uri("/api/user"), &token)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorBody = actix_test::read_body_json(response).await;
    assert!(error.error.contains(message), "unexpected message: {}", error.error);
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_conflicts(harness: MemoryHarness) {
    let (admin, token) = harness.login_as(Role::Admin).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = bearer(actix_test::TestRequest::post().uri("/api/user"), &token)
        .set_json(user_body(admin.email.as_str(), "perito"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn update_changes_only_supplied_fields(harness: MemoryHarness) {
    let (_, token) = harness.login_as(Role::Admin).await;
    let (target, _) = harness.login_as(Role::Assistant).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = bearer(
        actix_test::TestRequest::put().uri(&format!("/api/user/{}", target.id)),
        &token,
    )
    .set_json(json!({"role": "perito"}))
    .to_request();
    let updated: UserResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(updated.role, "perito");
    assert_eq!(updated.email, target.email.as_str());
    assert_eq!(updated.name, target.name);
}

#[rstest]
#[actix_web::test]
async fn delete_unknown_user_is_not_found_and_keeps_collection(harness: MemoryHarness) {
    let (_, token) = harness.login_as(Role::Admin).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = bearer(
        actix_test::TestRequest::delete().uri(&format!("/api/user/{}", UserId::random())),
        &token,
    )
    .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(harness.state.users.list().await.expect("list").len(), 1);
}

#[rstest]
#[actix_web::test]
async fn malformed_id_is_a_bad_request(harness: MemoryHarness) {
    let (_, token) = harness.login_as(Role::Admin).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = bearer(actix_test::TestRequest::get().uri("/api/user/not-a-uuid"), &token)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn delete_all_reports_the_count(harness: MemoryHarness) {
    let (_, token) = harness.login_as(Role::Admin).await;
    harness.login_as(Role::Examiner).await;
    let app = actix_test::init_service(test_app(harness.state.clone())).await;

    let request = bearer(actix_test::TestRequest::delete().uri("/api/user"), &token).to_request();
    let body: DeletedAllResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body.deleted, 2);
    assert_eq!(body.message, "all user records deleted");
}
