//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{bootstrap_admin, build_http_ports};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, HttpServer, web};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
use crate::doc::ApiDoc;
use crate::domain::TRACE_ID_HEADER;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{
    cases, dental_records, evidence, report_generation, reports, users,
};
use crate::outbound::storage::UPLOADS_ROUTE;

/// Path of the generated OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// JSON extractor configuration turning body errors into `400` responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Register every `/api` route.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(users::login)
            .service(users::create_user)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(users::delete_all_users)
            .service(cases::create_case)
            .service(cases::list_cases)
            .service(cases::get_case)
            .service(cases::update_case)
            .service(cases::delete_case)
            .service(cases::delete_all_cases)
            .service(evidence::create_evidence)
            .service(evidence::list_evidence)
            .service(evidence::get_evidence)
            .service(evidence::update_evidence)
            .service(evidence::delete_evidence)
            .service(evidence::delete_all_evidence)
            .service(reports::create_report)
            .service(reports::list_reports)
            .service(reports::get_report)
            .service(reports::update_report)
            .service(reports::delete_report)
            .service(reports::delete_all_reports)
            .service(dental_records::create_dental_record)
            .service(dental_records::list_dental_records)
            .service(dental_records::get_dental_record)
            .service(dental_records::update_dental_record)
            .service(dental_records::delete_dental_record)
            .service(dental_records::delete_all_dental_records)
            .service(report_generation::generate_report),
    );
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![TRACE_ID_HEADER])
        .max_age(3600);
    if origins.is_empty() {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Everything one application instance needs.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub config: ServerConfig,
}

/// Build the full application: API, uploads, probes and Swagger UI.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        config,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(build_cors(&config.cors_origins))
        .wrap(Trace)
        .configure(configure_api)
        .service(Files::new(UPLOADS_ROUTE, config.upload_dir.clone()))
        .service(ready)
        .service(live)
        .service(SwaggerUi::new("/api-docs/{_:.*}").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}

/// Construct an Actix HTTP server from prepared state and configuration.
///
/// The health state is marked ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let bind_addr = config.bind_addr();
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            config: config.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}
