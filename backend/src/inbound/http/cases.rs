//! Case (caso) handlers.
//!
//! ```text
//! POST   /api/caso {"case_number":"2024/0173","title":"Ossada não identificada"}
//! GET    /api/caso
//! GET    /api/caso/{id}
//! PUT    /api/caso/{id}
//! DELETE /api/caso/{id}
//! DELETE /api/caso
//! ```
//!
//! Deleting a case also deletes its evidence and reports.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Case, CaseDraft, CaseId, CasePatch, CaseStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ADMIN_ONLY, Caller, STAFF};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    CaseResponse, DeletedAllResponse, DeletedResponse, collect,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, non_blank, parse_id, parse_optional_date, parse_optional_enum, require_text,
};

const CASE_LABEL: &str = "case";

/// Body for creating or updating a case. On update every field is optional.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CaseRequest {
    #[schema(example = "2024/0173")]
    pub case_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// One of `open`, `in_progress`, `closed`. Defaults to `open`.
    #[schema(example = "open")]
    pub status: Option<String>,
    pub location: Option<String>,
    /// Date of the occurrence, `YYYY-MM-DD`.
    #[schema(example = "2024-03-01")]
    pub occurred_on: Option<String>,
}

impl CaseRequest {
    fn into_draft(self) -> ApiResult<CaseDraft> {
        Ok(CaseDraft {
            case_number: require_text(self.case_number, FieldName::new("case_number"))?,
            title: require_text(self.title, FieldName::new("title"))?,
            description: self.description,
            status: parse_optional_enum::<CaseStatus>(self.status, FieldName::new("status"))?
                .unwrap_or_default(),
            location: self.location,
            occurred_on: parse_optional_date(self.occurred_on, FieldName::new("occurred_on"))?,
        })
    }

    fn into_patch(self) -> ApiResult<CasePatch> {
        Ok(CasePatch {
            case_number: non_blank(self.case_number, FieldName::new("case_number"))?,
            title: non_blank(self.title, FieldName::new("title"))?,
            description: self.description,
            status: parse_optional_enum(self.status, FieldName::new("status"))?,
            location: self.location,
            occurred_on: parse_optional_date(self.occurred_on, FieldName::new("occurred_on"))?,
        })
    }
}

/// Open a case.
#[utoipa::path(
    post,
    path = "/api/caso",
    request_body = CaseRequest,
    responses(
        (status = 201, description = "Case created", body = CaseResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["cases"],
    operation_id = "createCase"
)]
#[post("/caso")]
pub async fn create_case(
    caller: Caller,
    state: web::Data<HttpState>,
    payload: web::Json<CaseRequest>,
) -> ApiResult<HttpResponse> {
    caller.require(STAFF)?;
    let case = state.cases.create(payload.into_inner().into_draft()?).await?;
    Ok(HttpResponse::Created().json(CaseResponse::from(&case)))
}

/// List every case.
#[utoipa::path(
    get,
    path = "/api/caso",
    responses(
        (status = 200, description = "Cases", body = [CaseResponse]),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["cases"],
    operation_id = "listCases"
)]
#[get("/caso")]
pub async fn list_cases(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CaseResponse>>> {
    caller.require(STAFF)?;
    let cases: Vec<Case> = state.cases.list().await?;
    Ok(web::Json(collect(&cases)))
}

/// Fetch one case.
#[utoipa::path(
    get,
    path = "/api/caso/{id}",
    params(("id" = String, Path, description = "Case identifier (UUID)")),
    responses(
        (status = 200, description = "Case", body = CaseResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["cases"],
    operation_id = "getCase"
)]
#[get("/caso/{id}")]
pub async fn get_case(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CaseResponse>> {
    caller.require(STAFF)?;
    let id: CaseId = parse_id(&path, FieldName::new("id"))?;
    let case = state.cases.get(&id).await?;
    Ok(web::Json(CaseResponse::from(&case)))
}

/// Change the supplied case fields.
#[utoipa::path(
    put,
    path = "/api/caso/{id}",
    params(("id" = String, Path, description = "Case identifier (UUID)")),
    request_body = CaseRequest,
    responses(
        (status = 200, description = "Updated case", body = CaseResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["cases"],
    operation_id = "updateCase"
)]
#[put("/caso/{id}")]
pub async fn update_case(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CaseRequest>,
) -> ApiResult<web::Json<CaseResponse>> {
    caller.require(STAFF)?;
    let id: CaseId = parse_id(&path, FieldName::new("id"))?;
    let case = state
        .cases
        .update(&id, payload.into_inner().into_patch()?)
        .await?;
    Ok(web::Json(CaseResponse::from(&case)))
}

/// Delete a case with its evidence and reports.
#[utoipa::path(
    delete,
    path = "/api/caso/{id}",
    params(("id" = String, Path, description = "Case identifier (UUID)")),
    responses(
        (status = 200, description = "Case deleted", body = DeletedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["cases"],
    operation_id = "deleteCase"
)]
#[delete("/caso/{id}")]
pub async fn delete_case(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    caller.require(ADMIN_ONLY)?;
    let id: CaseId = parse_id(&path, FieldName::new("id"))?;
    state.cases.delete(&id).await?;
    Ok(web::Json(DeletedResponse::new(CASE_LABEL, id)))
}

/// Delete every case, evidence item and report.
#[utoipa::path(
    delete,
    path = "/api/caso",
    responses(
        (status = 200, description = "Cases deleted", body = DeletedAllResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["cases"],
    operation_id = "deleteAllCases"
)]
#[delete("/caso")]
pub async fn delete_all_cases(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DeletedAllResponse>> {
    caller.require(ADMIN_ONLY)?;
    let deleted = state.cases.delete_all().await?;
    Ok(web::Json(DeletedAllResponse::new(CASE_LABEL, deleted)))
}
