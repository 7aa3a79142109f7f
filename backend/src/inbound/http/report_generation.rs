//! `POST /api/gerar-laudo`: draft a report from a case's evidence.
//!
//! ```text
//! POST /api/gerar-laudo {"case_id":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}
//! ```
//!
//! The draft is returned to the caller and not stored; saving it as a
//! report is a separate `POST /api/laudo`.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::CaseId;
use crate::domain::ids::RecordId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Caller, EXAMINERS};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require_text};

/// Request body for report drafting.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct GenerateReportRequest {
    /// Case whose evidence feeds the draft (UUID).
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub case_id: Option<String>,
}

/// Drafted report text.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateReportResponse {
    pub case_id: Uuid,
    pub generated_report: String,
}

/// Draft a report for a case with the text-generation service.
#[utoipa::path(
    post,
    path = "/api/gerar-laudo",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "Draft generated", body = GenerateReportResponse),
        (status = 400, description = "Missing or malformed case_id", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "No evidence for the case", body = ErrorBody),
        (status = 500, description = "Text generation failed", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "generateReport"
)]
#[post("/gerar-laudo")]
pub async fn generate_report(
    caller: Caller,
    state: web::Data<HttpState>,
    payload: web::Json<GenerateReportRequest>,
) -> ApiResult<web::Json<GenerateReportResponse>> {
    caller.require(EXAMINERS)?;
    let raw = require_text(payload.into_inner().case_id, FieldName::new("case_id"))?;
    let case_id: CaseId = parse_id(&raw, FieldName::new("case_id"))?;
    let report = state.report_generation.generate(case_id).await?;
    Ok(web::Json(GenerateReportResponse {
        case_id: *report.case_id.as_uuid(),
        generated_report: report.text,
    }))
}
