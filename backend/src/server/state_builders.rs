//! Builders turning [`AppSettings`] into HTTP state ports.
//!
//! With a database URL the Diesel adapters are used after migrations run;
//! without one every repository lives in memory and is lost on restart.

use std::fmt::Display;
use std::io;
use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::config::AppSettings;
use crate::domain::ports::TextGenerator;
use crate::domain::{Case, DentalRecord, Email};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::credentials::{Argon2PasswordHasher, JwtTokenService};
use crate::outbound::gemini::{DisabledTextGenerator, GeminiSettings, GeminiTextGenerator};
use crate::outbound::memory::{
    MemoryEvidenceRepository, MemoryRecordRepository, MemoryReportRepository,
    MemoryUserRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselCaseRepository, DieselDentalRecordRepository, DieselEvidenceRepository,
    DieselReportRepository, DieselUserRepository, PoolConfig, run_migrations,
};
use crate::outbound::storage::{LocalFileStorage, UploadPolicy};

const EPHEMERAL_SECRET_BYTES: usize = 32;

fn startup_error(context: &str, err: impl Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

/// Repository half of the ports bundle.
struct Repositories {
    users: Arc<dyn crate::domain::ports::UserRepository>,
    cases: Arc<dyn crate::domain::ports::RecordRepository<Case>>,
    evidence: Arc<dyn crate::domain::ports::EvidenceRepository>,
    reports: Arc<dyn crate::domain::ports::ReportRepository>,
    dental_records: Arc<dyn crate::domain::ports::RecordRepository<DentalRecord>>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            cases: Arc::new(DieselCaseRepository::new(pool.clone())),
            evidence: Arc::new(DieselEvidenceRepository::new(pool.clone())),
            reports: Arc::new(DieselReportRepository::new(pool.clone())),
            dental_records: Arc::new(DieselDentalRecordRepository::new(pool.clone())),
        }
    }

    fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::default()),
            cases: Arc::new(MemoryRecordRepository::<Case>::default()),
            evidence: Arc::new(MemoryEvidenceRepository::default()),
            reports: Arc::new(MemoryReportRepository::default()),
            dental_records: Arc::new(MemoryRecordRepository::<DentalRecord>::default()),
        }
    }
}

async fn build_repositories(settings: &AppSettings) -> io::Result<Repositories> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database URL configured; using in-memory repositories");
        return Ok(Repositories::memory());
    };
    run_migrations(database_url)
        .await
        .map_err(|err| startup_error("database migrations failed", err))?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|err| startup_error("database pool setup failed", err))?;
    info!(max_connections = settings.db_max_connections(), "database pool ready");
    Ok(Repositories::diesel(&pool))
}

fn build_generator(settings: &AppSettings) -> io::Result<Arc<dyn TextGenerator>> {
    let Some(api_key) = settings.gemini_api_key() else {
        warn!("no Gemini API key configured; report drafting is disabled");
        return Ok(Arc::new(DisabledTextGenerator));
    };
    let endpoint = settings
        .gemini_endpoint()
        .map_err(|err| startup_error("configuration", err))?;
    let generator = GeminiTextGenerator::new(GeminiSettings {
        endpoint,
        model: settings.gemini_model().to_owned(),
        api_key,
        timeout: settings.ai_timeout(),
    })
    .map_err(|err| startup_error("text generator setup failed", err))?;
    info!(model = settings.gemini_model(), "Gemini text generation enabled");
    Ok(Arc::new(generator))
}

fn signing_secret(settings: &AppSettings) -> io::Result<Zeroizing<Vec<u8>>> {
    match settings
        .jwt_secret()
        .map_err(|err| startup_error("configuration", err))?
    {
        Some(secret) => Ok(secret),
        None if cfg!(debug_assertions) => {
            warn!("no JWT secret configured; using an ephemeral secret (dev only)");
            let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_BYTES]);
            OsRng.fill_bytes(&mut secret);
            Ok(secret)
        }
        None => Err(io::Error::other("ODONTO_JWT_SECRET must be set")),
    }
}

/// Assemble every port implementation from settings.
///
/// # Errors
/// Fails when a setting is invalid or the database cannot be prepared.
pub async fn build_http_ports(settings: &AppSettings) -> io::Result<HttpStatePorts> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let secret = signing_secret(settings)?;
    let ttl = settings
        .token_ttl()
        .map_err(|err| startup_error("configuration", err))?;
    let public_base = settings
        .public_base_url()
        .map_err(|err| startup_error("configuration", err))?;
    let Repositories {
        users,
        cases,
        evidence,
        reports,
        dental_records,
    } = build_repositories(settings).await?;

    Ok(HttpStatePorts {
        users,
        cases,
        evidence,
        reports,
        dental_records,
        storage: Arc::new(LocalFileStorage::new(
            settings.upload_dir(),
            public_base,
            UploadPolicy {
                max_bytes: settings.max_upload_bytes(),
                allowed_types: settings.allowed_upload_types(),
            },
        )),
        generator: build_generator(settings)?,
        hasher: Arc::new(Argon2PasswordHasher::default()),
        tokens: Arc::new(JwtTokenService::new(&secret, ttl, Arc::clone(&clock))),
        clock,
        max_upload_bytes: settings.max_upload_bytes(),
    })
}

/// Create the configured bootstrap admin when no users exist.
///
/// # Errors
/// Fails when the configured email is invalid or the account cannot be
/// written.
pub async fn bootstrap_admin(state: &HttpState, settings: &AppSettings) -> io::Result<()> {
    let Some((email, password)) = settings.bootstrap_admin() else {
        return Ok(());
    };
    let email = Email::parse(&email)
        .map_err(|err| startup_error("invalid bootstrap admin email", err))?;
    match state.users.bootstrap_admin(email, password).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => {
            info!("users already exist; bootstrap admin skipped");
            Ok(())
        }
        Err(err) => Err(startup_error("bootstrap admin creation failed", err)),
    }
}
