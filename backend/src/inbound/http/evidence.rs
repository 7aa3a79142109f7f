//! Evidence (evidencia) handlers.
//!
//! ```text
//! POST   /api/evidencia   multipart/form-data with an optional `file` part,
//!                         or a JSON body without a file
//! GET    /api/evidencia
//! GET    /api/evidencia/{id}
//! PUT    /api/evidencia/{id}
//! DELETE /api/evidencia/{id}
//! DELETE /api/evidencia
//! ```
//!
//! `file_url` is only ever set from a stored upload; a client-supplied value
//! is ignored.

use actix_multipart::Multipart;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::IncomingFile;
use crate::domain::{CaseId, Evidence, EvidenceDraft, EvidenceId, EvidencePatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ADMIN_ONLY, Caller, STAFF};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{
    DeletedAllResponse, DeletedResponse, EvidenceResponse, collect,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::upload::read_evidence_form;
use crate::inbound::http::validation::{
    FieldName, non_blank, parse_id, parse_optional_id, parse_optional_timestamp,
    parse_timestamp, require_text,
};

const EVIDENCE_LABEL: &str = "evidence";

/// Evidence fields. On update every field is optional.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct EvidenceRequest {
    /// Owning case (UUID). Must exist.
    pub case_id: Option<String>,
    #[schema(example = "Arcada superior")]
    pub name: Option<String>,
    #[schema(example = "fotografia")]
    pub category: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` date.
    #[schema(example = "2024-03-01T10:15:00Z")]
    pub collected_at: Option<String>,
    pub description: Option<String>,
    pub collection_location: Option<String>,
}

/// Multipart form accepted by `POST /api/evidencia`.
#[derive(Debug, ToSchema)]
pub struct EvidenceUploadForm {
    pub case_id: String,
    pub name: String,
    pub category: String,
    pub collected_at: String,
    pub description: Option<String>,
    pub collection_location: Option<String>,
    /// At most one file.
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

impl EvidenceRequest {
    fn into_draft(self) -> ApiResult<EvidenceDraft> {
        let case_id = require_text(self.case_id, FieldName::new("case_id"))?;
        let collected_at = require_text(self.collected_at, FieldName::new("collected_at"))?;
        Ok(EvidenceDraft {
            case_id: parse_id(&case_id, FieldName::new("case_id"))?,
            name: require_text(self.name, FieldName::new("name"))?,
            category: require_text(self.category, FieldName::new("category"))?,
            collected_at: parse_timestamp(&collected_at, FieldName::new("collected_at"))?,
            description: self.description,
            collection_location: self.collection_location,
        })
    }

    fn into_patch(self) -> ApiResult<EvidencePatch> {
        Ok(EvidencePatch {
            case_id: parse_optional_id::<CaseId>(self.case_id, FieldName::new("case_id"))?,
            name: non_blank(self.name, FieldName::new("name"))?,
            category: non_blank(self.category, FieldName::new("category"))?,
            collected_at: parse_optional_timestamp(
                self.collected_at,
                FieldName::new("collected_at"),
            )?,
            description: self.description,
            collection_location: self.collection_location,
        })
    }
}

/// Read the creation body as multipart (with an optional file) or JSON.
async fn read_creation_body(
    req: &HttpRequest,
    payload: web::Payload,
    max_file_bytes: u64,
) -> ApiResult<(EvidenceRequest, Option<IncomingFile>)> {
    let mut payload = payload.into_inner();
    if req.content_type().starts_with("multipart/") {
        let multipart = Multipart::from_request(req, &mut payload).await?;
        let mut form = read_evidence_form(multipart, max_file_bytes).await?;
        let request = EvidenceRequest {
            case_id: form.take("case_id"),
            name: form.take("name"),
            category: form.take("category"),
            collected_at: form.take("collected_at"),
            description: form.take("description"),
            collection_location: form.take("collection_location"),
        };
        Ok((request, form.file))
    } else {
        let json = web::Json::<EvidenceRequest>::from_request(req, &mut payload).await?;
        Ok((json.into_inner(), None))
    }
}

/// Register an evidence item, optionally uploading one file.
#[utoipa::path(
    post,
    path = "/api/evidencia",
    request_body(
        content(
            (EvidenceUploadForm = "multipart/form-data"),
            (EvidenceRequest = "application/json")
        ),
        description = "Evidence fields; multipart bodies may carry one `file` part"
    ),
    responses(
        (status = 201, description = "Evidence created", body = EvidenceResponse),
        (status = 400, description = "Invalid request or rejected file", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Case not found", body = ErrorBody)
    ),
    tags = ["evidence"],
    operation_id = "createEvidence"
)]
#[post("/evidencia")]
pub async fn create_evidence(
    caller: Caller,
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    caller.require(STAFF)?;
    let (request, file) = read_creation_body(&req, payload, state.max_upload_bytes).await?;
    let evidence = state.evidence.create(request.into_draft()?, file).await?;
    Ok(HttpResponse::Created().json(EvidenceResponse::from(&evidence)))
}

/// List every evidence item.
#[utoipa::path(
    get,
    path = "/api/evidencia",
    responses(
        (status = 200, description = "Evidence", body = [EvidenceResponse]),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["evidence"],
    operation_id = "listEvidence"
)]
#[get("/evidencia")]
pub async fn list_evidence(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<EvidenceResponse>>> {
    caller.require(STAFF)?;
    let items: Vec<Evidence> = state.evidence.list().await?;
    Ok(web::Json(collect(&items)))
}

/// Fetch one evidence item.
#[utoipa::path(
    get,
    path = "/api/evidencia/{id}",
    params(("id" = String, Path, description = "Evidence identifier (UUID)")),
    responses(
        (status = 200, description = "Evidence", body = EvidenceResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["evidence"],
    operation_id = "getEvidence"
)]
#[get("/evidencia/{id}")]
pub async fn get_evidence(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EvidenceResponse>> {
    caller.require(STAFF)?;
    let id: EvidenceId = parse_id(&path, FieldName::new("id"))?;
    let item = state.evidence.get(&id).await?;
    Ok(web::Json(EvidenceResponse::from(&item)))
}

/// Change the supplied evidence fields. Files cannot be replaced.
#[utoipa::path(
    put,
    path = "/api/evidencia/{id}",
    params(("id" = String, Path, description = "Evidence identifier (UUID)")),
    request_body = EvidenceRequest,
    responses(
        (status = 200, description = "Updated evidence", body = EvidenceResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Evidence or case not found", body = ErrorBody)
    ),
    tags = ["evidence"],
    operation_id = "updateEvidence"
)]
#[put("/evidencia/{id}")]
pub async fn update_evidence(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EvidenceRequest>,
) -> ApiResult<web::Json<EvidenceResponse>> {
    caller.require(STAFF)?;
    let id: EvidenceId = parse_id(&path, FieldName::new("id"))?;
    let item = state
        .evidence
        .update(&id, payload.into_inner().into_patch()?)
        .await?;
    Ok(web::Json(EvidenceResponse::from(&item)))
}

/// Delete one evidence item. A stored file is kept on disk.
#[utoipa::path(
    delete,
    path = "/api/evidencia/{id}",
    params(("id" = String, Path, description = "Evidence identifier (UUID)")),
    responses(
        (status = 200, description = "Evidence deleted", body = DeletedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["evidence"],
    operation_id = "deleteEvidence"
)]
#[delete("/evidencia/{id}")]
pub async fn delete_evidence(
    caller: Caller,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    caller.require(ADMIN_ONLY)?;
    let id: EvidenceId = parse_id(&path, FieldName::new("id"))?;
    state.evidence.delete(&id).await?;
    Ok(web::Json(DeletedResponse::new(EVIDENCE_LABEL, id)))
}

/// Delete every evidence item.
#[utoipa::path(
    delete,
    path = "/api/evidencia",
    responses(
        (status = 200, description = "Evidence deleted", body = DeletedAllResponse),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["evidence"],
    operation_id = "deleteAllEvidence"
)]
#[delete("/evidencia")]
pub async fn delete_all_evidence(
    caller: Caller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DeletedAllResponse>> {
    caller.require(ADMIN_ONLY)?;
    let deleted = state.evidence.delete_all().await?;
    Ok(web::Json(DeletedAllResponse::new(EVIDENCE_LABEL, deleted)))
}
