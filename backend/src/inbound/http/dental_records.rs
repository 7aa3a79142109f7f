//! Dental-record bank (bancoodonto) handlers.
//!
//! ```text
//! POST   /api/bancoodonto {"patient_name":"...","dental_chart":"18 ausente; 17 restaurado"}
//! GET    /api/bancoodonto
//! GET    /api/bancoodonto/{id}
//! PUT    /api/bancoodonto/{id}
//! DELETE /api/bancoodonto/{id}
//! DELETE /api/bancoodonto
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DentalRecord, DentalRecordDraft, DentalRecordId, DentalRecordPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ADMIN_ONLY, Caller, STAFF};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    DeletedAllResponse, DeletedResponse, DentalRecordResponse, collect,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, non_blank, parse_id, require_text};

const DENTAL_RECORD_LABEL: &str = "dental record";

/// Dental-record fields. On update every field is optional.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct DentalRecordRequest {
    #[schema(example = "Maria da Silva")]
    pub patient_name: Option<String>,
    pub document_number: Option<String>,
    /// Free-text odontogram description.
    #[schema(example = "18 ausente; 17 restaurado (amálgama)")]
    pub dental_chart: Option<String>,
    pub notes: Option<String>,
}

impl DentalRecordRequest {
    fn into_draft(self) -> ApiResult<DentalRecordDraft> {
        Ok(DentalRecordDraft {
            patient_name: require_text(self.patient_name, FieldName::new("patient_name"))?,
            document_number: self.document_number,
            dental_chart: require_text(self.dental_chart, FieldName::new("dental_chart"))?,
            notes: self.notes,
        })
    }

    fn into_patch(self) -> ApiResult<DentalRecordPatch> {
        Ok(DentalRecordPatch {
            patient_name: non_blank(self.patient_name, FieldName::new("patient_name"))?,
            document_number: self.document_number,
            dental_chart: non_blank(self.dental_chart, FieldName::new("dental_chart"))?,
            notes: self.notes,
        })
    }
}

/// Add an entry to the dental-record bank.
#[utoipa::path(
    post,
    path = "/api/bancoodonto",
    request_body = DentalRecordRequest,
    responses(
        (status = 201, description = "Entry created", body = DentalRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["dental-records"],
    operation_id = "createDentalRecord"
)]
#[post("/bancoodonto")]
pub async fn create_dental_record(
    caller: Caller,
    state: web::Data<HttpState>,
    payload: web::Json<DentalRecordRequest>,
) -> ApiResult<HttpResponse> {
    caller.require(STAFF)?;
    let record = state
        .dental_records
        .create(payload.into_inner().into_draft()?)
        .await?;
    Ok(HttpResponse::Created().json(DentalRecordResponse::from(&record)))
}

#[utoipa::path(
    get,
    path = "/api/bancoodonto",
    responses(
        (status = 200, description = "Entries", body = [DentalRecordResponse]),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["dental-records"],
    operation_id = "listDentalRecords"
)]
#[get("/bancoodonto")]
pub async fn list_dental_records(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DentalRecordResponse>>> {
    caller.require(STAFF)?;
    let records: Vec<DentalRecord> = state.dental_records.list().await?;
    Ok(web::Json(collect(&records)))
}

#[utoipa::path(
    get,
    path = "/api/bancoodonto/{id}",
    params(("id" = String, Path, description = "Entry identifier (UUID)")),
    responses(
        (status = 200, description = "Entry", body = DentalRecordResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["dental-records"],
    operation_id = "getDentalRecord"
)]
#[get("/bancoodonto/{id}")]
pub async fn get_dental_record(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DentalRecordResponse>> {
    caller.require(STAFF)?;
    let id: DentalRecordId = parse_id(&path, FieldName::new("id"))?;
    let record = state.dental_records.get(&id).await?;
    Ok(web::Json(DentalRecordResponse::from(&record)))
}

#[utoipa::path(
    put,
    path = "/api/bancoodonto/{id}",
    params(("id" = String, Path, description = "Entry identifier (UUID)")),
    request_body = DentalRecordRequest,
    responses(
        (status = 200, description = "Updated entry", body = DentalRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["dental-records"],
    operation_id = "updateDentalRecord"
)]
#[put("/bancoodonto/{id}")]
pub async fn update_dental_record(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<DentalRecordRequest>,
) -> ApiResult<web::Json<DentalRecordResponse>> {
    caller.require(STAFF)?;
    let id: DentalRecordId = parse_id(&path, FieldName::new("id"))?;
    let record = state
        .dental_records
        .update(&id, payload.into_inner().into_patch()?)
        .await?;
    Ok(web::Json(DentalRecordResponse::from(&record)))
}

#[utoipa::path(
    delete,
    path = "/api/bancoodonto/{id}",
    params(("id" = String, Path, description = "Entry identifier (UUID)")),
    responses(
        (status = 200, description = "Entry deleted", body = DeletedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["dental-records"],
    operation_id = "deleteDentalRecord"
)]
#[delete("/bancoodonto/{id}")]
pub async fn delete_dental_record(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    caller.require(ADMIN_ONLY)?;
    let id: DentalRecordId = parse_id(&path, FieldName::new("id"))?;
    state.dental_records.delete(&id).await?;
    Ok(web::Json(DeletedResponse::new(DENTAL_RECORD_LABEL, id)))
}

#[utoipa::path(
    delete,
    path = "/api/bancoodonto",
    responses(
        (status = 200, description = "Entries deleted", body = DeletedAllResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["dental-records"],
    operation_id = "deleteAllDentalRecords"
)]
#[delete("/bancoodonto")]
pub async fn delete_all_dental_records(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DeletedAllResponse>> {
    caller.require(ADMIN_ONLY)?;
    let deleted = state.dental_records.delete_all().await?;
    Ok(web::Json(DeletedAllResponse::new(DENTAL_RECORD_LABEL, deleted)))
}
