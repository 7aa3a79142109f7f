//! Report (laudo) handlers.
//!
//! ```text
//! POST   /api/laudo {"case_id":"...","title":"Laudo preliminar","content":"..."}
//! GET    /api/laudo
//! GET    /api/laudo/{id}
//! PUT    /api/laudo/{id}
//! DELETE /api/laudo/{id}
//! DELETE /api/laudo
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Report, ReportDraft, ReportId, ReportOrigin, ReportPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ADMIN_ONLY, Caller, STAFF};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    DeletedAllResponse, DeletedResponse, ReportResponse, collect,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, non_blank, parse_id, parse_optional_enum, parse_optional_id, require_text,
};

const REPORT_LABEL: &str = "report";

/// Report fields. On update every field is optional.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReportRequest {
    /// Case the report belongs to (UUID).
    pub case_id: Option<String>,
    #[schema(example = "Laudo odontolegal preliminar")]
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    /// `manual` (default) or `ai_assisted`.
    #[schema(example = "manual")]
    pub origin: Option<String>,
}

impl ReportRequest {
    fn into_draft(self) -> ApiResult<ReportDraft> {
        let case_id = require_text(self.case_id, FieldName::new("case_id"))?;
        Ok(ReportDraft {
            case_id: parse_id(&case_id, FieldName::new("case_id"))?,
            title: require_text(self.title, FieldName::new("title"))?,
            content: require_text(self.content, FieldName::new("content"))?,
            author: self.author,
            origin: parse_optional_enum::<ReportOrigin>(self.origin, FieldName::new("origin"))?
                .unwrap_or_default(),
        })
    }

    fn into_patch(self) -> ApiResult<ReportPatch> {
        Ok(ReportPatch {
            case_id: parse_optional_id(self.case_id, FieldName::new("case_id"))?,
            title: non_blank(self.title, FieldName::new("title"))?,
            content: non_blank(self.content, FieldName::new("content"))?,
            author: self.author,
            origin: parse_optional_enum(self.origin, FieldName::new("origin"))?,
        })
    }
}

/// Store a report.
#[utoipa::path(
    post,
    path = "/api/laudo",
    request_body = ReportRequest,
    responses(
        (status = 201, description = "Report created", body = ReportResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "createReport"
)]
#[post("/laudo")]
pub async fn create_report(
    caller: Caller,
    state: web::Data<HttpState>,
    payload: web::Json<ReportRequest>,
) -> ApiResult<HttpResponse> {
    caller.require(STAFF)?;
    let report = state.reports.create(payload.into_inner().into_draft()?).await?;
    Ok(HttpResponse::Created().json(ReportResponse::from(&report)))
}

/// List every report.
#[utoipa::path(
    get,
    path = "/api/laudo",
    responses(
        (status = 200, description = "Reports", body = [ReportResponse]),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "listReports"
)]
#[get("/laudo")]
pub async fn list_reports(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReportResponse>>> {
    caller.require(STAFF)?;
    let reports: Vec<Report> = state.reports.list().await?;
    Ok(web::Json(collect(&reports)))
}

/// Fetch one report.
#[utoipa::path(
    get,
    path = "/api/laudo/{id}",
    params(("id" = String, Path, description = "Report identifier (UUID)")),
    responses(
        (status = 200, description = "Report", body = ReportResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "getReport"
)]
#[get("/laudo/{id}")]
pub async fn get_report(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReportResponse>> {
    caller.require(STAFF)?;
    let id: ReportId = parse_id(&path, FieldName::new("id"))?;
    let report = state.reports.get(&id).await?;
    Ok(web::Json(ReportResponse::from(&report)))
}

/// Change the supplied report fields.
#[utoipa::path(
    put,
    path = "/api/laudo/{id}",
    params(("id" = String, Path, description = "Report identifier (UUID)")),
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Updated report", body = ReportResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "updateReport"
)]
#[put("/laudo/{id}")]
pub async fn update_report(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ReportRequest>,
) -> ApiResult<web::Json<ReportResponse>> {
    caller.require(STAFF)?;
    let id: ReportId = parse_id(&path, FieldName::new("id"))?;
    let report = state
        .reports
        .update(&id, payload.into_inner().into_patch()?)
        .await?;
    Ok(web::Json(ReportResponse::from(&report)))
}

/// Delete one report.
#[utoipa::path(
    delete,
    path = "/api/laudo/{id}",
    params(("id" = String, Path, description = "Report identifier (UUID)")),
    responses(
        (status = 200, description = "Report deleted", body = DeletedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "deleteReport"
)]
#[delete("/laudo/{id}")]
pub async fn delete_report(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    caller.require(ADMIN_ONLY)?;
    let id: ReportId = parse_id(&path, FieldName::new("id"))?;
    state.reports.delete(&id).await?;
    Ok(web::Json(DeletedResponse::new(REPORT_LABEL, id)))
}

/// Delete every report.
#[utoipa::path(
    delete,
    path = "/api/laudo",
    responses(
        (status = 200, description = "Reports deleted", body = DeletedAllResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "deleteAllReports"
)]
#[delete("/laudo")]
pub async fn delete_all_reports(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DeletedAllResponse>> {
    caller.require(ADMIN_ONLY)?;
    let deleted = state.reports.delete_all().await?;
    Ok(web::Json(DeletedAllResponse::new(REPORT_LABEL, deleted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::RecordId;
    use crate::domain::{CaseId, Role};
    use crate::test_support::MemoryHarness;
    use crate::test_support::http::{bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[actix_web::test]
    async fn create_defaults_origin_to_manual() {
        let harness = MemoryHarness::new();
        let (_, token) = harness.login_as(Role::Examiner).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;
        let case_id = CaseId::random();

        let request = bearer(actix_test::TestRequest::post().uri("/api/laudo"), &token)
            .set_json(json!({
                "case_id": case_id.to_string(),
                "title": "Laudo preliminar",
                "content": "Arcada compatível com a ficha odontológica.",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: ReportResponse = actix_test::read_body_json(response).await;
        assert_eq!(created.origin, "manual");
        assert_eq!(created.case_id, *case_id.as_uuid());

        let get = bearer(
            actix_test::TestRequest::get().uri(&format!("/api/laudo/{}", created.id)),
            &token,
        )
        .to_request();
        let fetched: ReportResponse = actix_test::call_and_read_body_json(&app, get).await;
        assert_eq!(fetched, created);
    }

    #[rstest]
    #[case(json!({"case_id": CaseId::random().to_string(), "title": "t"}), StatusCode::BAD_REQUEST)]
    #[case(json!({"case_id": CaseId::random().to_string(), "title": "t", "content": "c", "origin": "robot"}), StatusCode::BAD_REQUEST)]
    #[case(json!({"case_id": CaseId::random().to_string(), "title": "t", "content": "c", "origin": "ai_assisted"}), StatusCode::CREATED)]
    #[actix_web::test]
    async fn create_validates_payload(#[case] body: serde_json::Value, #[case] expected: StatusCode) {
        let harness = MemoryHarness::new();
        let (_, token) = harness.login_as(Role::Assistant).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let request = bearer(actix_test::TestRequest::post().uri("/api/laudo"), &token)
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_unknown_report_is_not_found() {
        let harness = MemoryHarness::new();
        let (_, token) = harness.login_as(Role::Admin).await;
        let app = actix_test::init_service(test_app(harness.state.clone())).await;

        let request = bearer(
            actix_test::TestRequest::delete().uri(&format!("/api/laudo/{}", ReportId::random())),
            &token,
        )
        .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
