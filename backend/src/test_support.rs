//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and the integration suites (in `tests/`,
//! via the `test-support` feature). Nothing here is compiled into release
//! builds.

mod clock;
pub mod http;

use std::sync::Arc;

use argon2::Params;
use mockable::DefaultClock;
use tempfile::TempDir;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::ports::TextGenerator;
use crate::domain::{Email, NewUser, Role, User};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::credentials::{Argon2PasswordHasher, JwtTokenService};
use crate::outbound::gemini::DisabledTextGenerator;
use crate::outbound::memory::{
    MemoryEvidenceRepository, MemoryRecordRepository, MemoryReportRepository,
    MemoryUserRepository,
};
use crate::outbound::storage::{LocalFileStorage, UploadPolicy};

pub use clock::MutableClock;

/// Signing secret used by every test token service.
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-minimum-32-characters-long";

/// Password given to every user created by [`MemoryHarness::login_as`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Upload size limit used by the harness.
pub const TEST_MAX_UPLOAD_BYTES: u64 = 1024;

/// Argon2 hasher with the cheapest accepted cost parameters.
pub fn fast_password_hasher() -> Argon2PasswordHasher {
    let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
        .unwrap_or_else(|err| panic!("argon2 test params: {err}"));
    Argon2PasswordHasher::with_params(params)
}

/// Default upload policy used by the harness.
pub fn test_upload_policy() -> UploadPolicy {
    UploadPolicy {
        max_bytes: TEST_MAX_UPLOAD_BYTES,
        allowed_types: vec!["image/jpeg".to_owned(), "image/png".to_owned(), "application/pdf".to_owned()],
    }
}

/// HTTP state wired to in-memory adapters and a temporary upload directory.
pub struct MemoryHarness {
    /// State handed to the handlers.
    pub state: HttpState,
    /// Ports the state was built from; tweak and rebuild for special cases.
    pub ports: HttpStatePorts,
    upload_dir: TempDir,
}

impl MemoryHarness {
    /// Build a harness whose text generator is disabled.
    pub fn new() -> Self {
        Self::with_generator(Arc::new(DisabledTextGenerator))
    }

    /// Build a harness using `generator` for report drafting.
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        let upload_dir = TempDir::new().unwrap_or_else(|err| panic!("upload tempdir: {err}"));
        let base = Url::parse("http://localhost:8080/")
            .unwrap_or_else(|err| panic!("public base url: {err}"));
        let ports = HttpStatePorts {
            users: Arc::new(MemoryUserRepository::default()),
            cases: Arc::new(MemoryRecordRepository::default()),
            evidence: Arc::new(MemoryEvidenceRepository::default()),
            reports: Arc::new(MemoryReportRepository::default()),
            dental_records: Arc::new(MemoryRecordRepository::default()),
            storage: Arc::new(LocalFileStorage::new(
                upload_dir.path().join("uploads"),
                base,
                test_upload_policy(),
            )),
            generator,
            hasher: Arc::new(fast_password_hasher()),
            tokens: Arc::new(JwtTokenService::new(
                TEST_JWT_SECRET,
                chrono::Duration::minutes(60),
                Arc::new(DefaultClock),
            )),
            clock: Arc::new(DefaultClock),
            max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
        };
        Self {
            state: HttpState::new(ports.clone()),
            ports,
            upload_dir,
        }
    }

    /// Directory stored uploads are written to.
    pub fn upload_root(&self) -> std::path::PathBuf {
        self.upload_dir.path().join("uploads")
    }

    /// Register a user with `role` and return it with a bearer token.
    pub async fn login_as(&self, role: Role) -> (User, String) {
        let email = Email::parse(&format!("{}-{}@example.org", role, uuid::Uuid::new_v4()))
            .unwrap_or_else(|err| panic!("test email: {err}"));
        let user = self
            .state
            .users
            .create(NewUser {
                name: format!("Test {role}"),
                email: email.clone(),
                password: Zeroizing::new(TEST_PASSWORD.to_owned()),
                role,
            })
            .await
            .unwrap_or_else(|err| panic!("register test user: {err}"));
        let outcome = self
            .state
            .users
            .login(email.as_str(), TEST_PASSWORD)
            .await
            .unwrap_or_else(|err| panic!("login test user: {err}"));
        (user, outcome.token.token)
    }
}

impl Default for MemoryHarness {
    fn default() -> Self {
        Self::new()
    }
}
