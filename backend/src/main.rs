//! Backend entry-point: loads settings, wires adapters and serves the API.

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use odonto_backend::config::AppSettings;
use odonto_backend::inbound::http::health::HealthState;
use odonto_backend::inbound::http::state::HttpState;
use odonto_backend::server::{ServerConfig, bootstrap_admin, build_http_ports, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    info!(settings = ?settings, "settings loaded");

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let http_state = HttpState::new(build_http_ports(&settings).await?);
    bootstrap_admin(&http_state, &settings).await?;

    let config = ServerConfig::new(bind_addr, settings.upload_dir())
        .with_cors_origins(settings.cors_allowed_origins());
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    server.await
}
