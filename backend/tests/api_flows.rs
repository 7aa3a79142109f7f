//! End-to-end flows through the production app factory backed by in-memory
//! adapters: case lifecycle with uploads, report drafting and the auth matrix.

mod common;

use actix_web::http::{Method, StatusCode};
use actix_web::test as actix_test;
use common::{RecordingGenerator, full_app, recording_harness};
use odonto_backend::domain::{Role, TRACE_ID_HEADER};
use odonto_backend::inbound::http::ErrorBody;
use odonto_backend::inbound::http::report_generation::GenerateReportResponse;
use odonto_backend::inbound::http::schemas::{
    CaseResponse, DeletedAllResponse, EvidenceResponse, ReportResponse,
};
use odonto_backend::test_support::MemoryHarness;
use odonto_backend::test_support::http::{MultipartBuilder, bearer, multipart_request};
use rstest::rstest;
use serde_json::{Value, json};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nodontogram";

#[rstest]
#[actix_web::test]
async fn case_lifecycle_with_upload_drafting_and_cascade() {
    let (harness, generator) = recording_harness();
    let (_, admin) = harness.login_as(Role::Admin).await;
    let (_, examiner) = harness.login_as(Role::Examiner).await;
    let app = actix_test::init_service(full_app(&harness)).await;

    let create_case = bearer(actix_test::TestRequest::post().uri("/api/caso"), &examiner)
        .set_json(json!({"case_number": "2024/0301", "title": "Vítima de incêndio"}))
        .to_request();
    let case: CaseResponse = actix_test::call_and_read_body_json(&app, create_case).await;

    let mut stored_urls = Vec::new();
    for (name, collected_at) in [("Arcada inferior", "2024-03-02"), ("Arcada superior", "2024-03-01")] {
        let body = MultipartBuilder::new()
            .text("case_id", &case.id.to_string())
            .text("name", name)
            .text("category", "fotografia")
            .text("collected_at", collected_at)
            .file("file", "arcada.png", "image/png", PNG_BYTES);
        let request = bearer(multipart_request("/api/evidencia", body), &examiner).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: EvidenceResponse = actix_test::read_body_json(response).await;
        stored_urls.push(created.file_url.expect("file url"));
    }

    let path = stored_urls[0]
        .strip_prefix("http://localhost:8080")
        .expect("public base prefix");
    let download = actix_test::TestRequest::get().uri(path).to_request();
    let served = actix_test::call_and_read_body(&app, download).await;
    assert_eq!(served.as_ref(), PNG_BYTES);

    let draft = bearer(actix_test::TestRequest::post().uri("/api/gerar-laudo"), &examiner)
        .set_json(json!({"case_id": case.id.to_string()}))
        .to_request();
    let drafted: GenerateReportResponse = actix_test::call_and_read_body_json(&app, draft).await;
    assert_eq!(drafted.generated_report, RecordingGenerator::DRAFT);

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert_eq!(prompt.matches(") Nome da Evidência: ").count(), 2);
    let first = prompt.find("1) Nome da Evidência: Arcada superior").expect("first block");
    let second = prompt.find("2) Nome da Evidência: Arcada inferior").expect("second block");
    assert!(first < second, "blocks follow collection order");

    let save = bearer(actix_test::TestRequest::post().uri("/api/laudo"), &examiner)
        .set_json(json!({
            "case_id": case.id.to_string(),
            "title": "Laudo assistido",
            "content": drafted.generated_report,
            "origin": "ai_assisted",
        }))
        .to_request();
    let saved: ReportResponse = actix_test::call_and_read_body_json(&app, save).await;
    assert_eq!(saved.origin, "ai_assisted");

    let delete = bearer(
        actix_test::TestRequest::delete().uri(&format!("/api/caso/{}", case.id)),
        &admin,
    )
    .to_request();
    assert_eq!(actix_test::call_service(&app, delete).await.status(), StatusCode::OK);

    let evidence = bearer(actix_test::TestRequest::get().uri("/api/evidencia"), &admin).to_request();
    let remaining: Vec<EvidenceResponse> = actix_test::call_and_read_body_json(&app, evidence).await;
    assert!(remaining.is_empty());
    let reports = bearer(actix_test::TestRequest::get().uri("/api/laudo"), &admin).to_request();
    let remaining: Vec<ReportResponse> = actix_test::call_and_read_body_json(&app, reports).await;
    assert!(remaining.is_empty());
}

#[rstest]
#[case(Method::POST, "/api/user")]
#[case(Method::GET, "/api/user")]
#[case(Method::GET, "/api/caso")]
#[case(Method::PUT, "/api/evidencia/00000000-0000-0000-0000-000000000000")]
#[case(Method::DELETE, "/api/laudo")]
#[case(Method::GET, "/api/bancoodonto")]
#[case(Method::POST, "/api/gerar-laudo")]
#[actix_web::test]
async fn protected_routes_require_a_bearer_token(#[case] method: Method, #[case] uri: &str) {
    let harness = MemoryHarness::new();
    let app = actix_test::init_service(full_app(&harness)).await;

    let request = actix_test::TestRequest::default()
        .method(method)
        .uri(uri)
        .set_json(json!({}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: ErrorBody = actix_test::read_body_json(response).await;
    assert_eq!(body.trace_id.as_deref(), Some(header.as_str()));
}

#[rstest]
#[case(Role::Examiner, Method::DELETE, "/api/caso", StatusCode::FORBIDDEN)]
#[case(Role::Assistant, Method::POST, "/api/gerar-laudo", StatusCode::FORBIDDEN)]
#[case(Role::Assistant, Method::GET, "/api/user", StatusCode::FORBIDDEN)]
#[case(Role::Admin, Method::DELETE, "/api/bancoodonto", StatusCode::OK)]
#[case(Role::Assistant, Method::GET, "/api/laudo", StatusCode::OK)]
#[actix_web::test]
async fn role_allow_lists_are_enforced(
    #[case] role: Role,
    #[case] method: Method,
    #[case] uri: &str,
    #[case] expected: StatusCode,
) {
    let harness = MemoryHarness::new();
    let (_, token) = harness.login_as(role).await;
    let app = actix_test::init_service(full_app(&harness)).await;

    let request = bearer(actix_test::TestRequest::default().method(method).uri(uri), &token)
        .set_json(json!({}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), expected);
}

#[rstest]
#[case("/api/user")]
#[case("/api/caso")]
#[case("/api/evidencia")]
#[case("/api/laudo")]
#[case("/api/bancoodonto")]
#[actix_web::test]
async fn deleting_unknown_ids_is_not_found_for_every_collection(#[case] collection: &str) {
    let harness = MemoryHarness::new();
    let (_, token) = harness.login_as(Role::Admin).await;
    let app = actix_test::init_service(full_app(&harness)).await;

    let uri = format!("{collection}/{}", uuid::Uuid::new_v4());
    let request = bearer(actix_test::TestRequest::delete().uri(&uri), &token).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let malformed = bearer(
        actix_test::TestRequest::delete().uri(&format!("{collection}/123")),
        &token,
    )
    .to_request();
    let response = actix_test::call_service(&app, malformed).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn delete_all_cases_clears_every_child_collection() {
    let (harness, _) = recording_harness();
    let (_, token) = harness.login_as(Role::Admin).await;
    let app = actix_test::init_service(full_app(&harness)).await;

    for number in ["A-1", "A-2"] {
        let request = bearer(actix_test::TestRequest::post().uri("/api/caso"), &token)
            .set_json(json!({"case_number": number, "title": "Caso"}))
            .to_request();
        let case: CaseResponse = actix_test::call_and_read_body_json(&app, request).await;
        let evidence = bearer(actix_test::TestRequest::post().uri("/api/evidencia"), &token)
            .set_json(json!({
                "case_id": case.id.to_string(),
                "name": "Molar",
                "category": "dente",
                "collected_at": "2024-01-01",
            }))
            .to_request();
        actix_test::call_service(&app, evidence).await;
    }

    let request = bearer(actix_test::TestRequest::delete().uri("/api/caso"), &token).to_request();
    let body: DeletedAllResponse = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body.deleted, 2);
    assert!(harness.state.evidence.list().await.expect("list").is_empty());
}

#[rstest]
#[actix_web::test]
async fn openapi_document_and_probes_are_public() {
    let harness = MemoryHarness::new();
    let app = actix_test::init_service(full_app(&harness)).await;

    let doc = actix_test::TestRequest::get().uri("/api-docs/openapi.json").to_request();
    let json: Value = actix_test::call_and_read_body_json(&app, doc).await;
    assert!(json["paths"]["/api/gerar-laudo"].is_object());
    assert!(json["components"]["securitySchemes"]["BearerAuth"].is_object());

    for probe in ["/health/ready", "/health/live"] {
        let request = actix_test::TestRequest::get().uri(probe).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
