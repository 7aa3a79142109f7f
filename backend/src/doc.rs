//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST handler and the JSON shapes they exchange.
//! Domain records never derive `ToSchema`; the response mirrors in
//! `inbound::http::schemas` carry the schema definitions instead.
//!
//! The document is served at `/api-docs/openapi.json` next to Swagger UI and
//! printed by `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::cases::CaseRequest;
use crate::inbound::http::dental_records::DentalRecordRequest;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::evidence::{EvidenceRequest, EvidenceUploadForm};
use crate::inbound::http::report_generation::{GenerateReportRequest, GenerateReportResponse};
use crate::inbound::http::reports::ReportRequest;
use crate::inbound::http::schemas::{
    CaseResponse, DeletedAllResponse, DeletedResponse, DentalRecordResponse, EvidenceResponse,
    ReportResponse, UserResponse,
};
use crate::inbound::http::users::{LoginRequest, LoginResponse, UserRequest};

/// Name of the bearer security scheme in the document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Token issued by POST /api/user/login."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Forensic odontology backend API",
        description = "Case, evidence, report and dental-record management with AI-assisted report drafting."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::delete_all_users,
        crate::inbound::http::cases::create_case,
        crate::inbound::http::cases::list_cases,
        crate::inbound::http::cases::get_case,
        crate::inbound::http::cases::update_case,
        crate::inbound::http::cases::delete_case,
        crate::inbound::http::cases::delete_all_cases,
        crate::inbound::http::evidence::create_evidence,
        crate::inbound::http::evidence::list_evidence,
        crate::inbound::http::evidence::get_evidence,
        crate::inbound::http::evidence::update_evidence,
        crate::inbound::http::evidence::delete_evidence,
        crate::inbound::http::evidence::delete_all_evidence,
        crate::inbound::http::reports::create_report,
        crate::inbound::http::reports::list_reports,
        crate::inbound::http::reports::get_report,
        crate::inbound::http::reports::update_report,
        crate::inbound::http::reports::delete_report,
        crate::inbound::http::reports::delete_all_reports,
        crate::inbound::http::dental_records::create_dental_record,
        crate::inbound::http::dental_records::list_dental_records,
        crate::inbound::http::dental_records::get_dental_record,
        crate::inbound::http::dental_records::update_dental_record,
        crate::inbound::http::dental_records::delete_dental_record,
        crate::inbound::http::dental_records::delete_all_dental_records,
        crate::inbound::http::report_generation::generate_report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        LoginRequest,
        LoginResponse,
        UserRequest,
        UserResponse,
        CaseRequest,
        CaseResponse,
        EvidenceRequest,
        EvidenceUploadForm,
        EvidenceResponse,
        ReportRequest,
        ReportResponse,
        DentalRecordRequest,
        DentalRecordResponse,
        GenerateReportRequest,
        GenerateReportResponse,
        DeletedResponse,
        DeletedAllResponse,
    )),
    tags(
        (name = "users", description = "Accounts and login"),
        (name = "cases", description = "Forensic cases"),
        (name = "evidence", description = "Evidence items and uploads"),
        (name = "reports", description = "Reports and AI-assisted drafting"),
        (name = "dental-records", description = "Dental-record bank"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
