//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    EvidenceRepository, FileStorage, PasswordHasher, RecordRepository, ReportRepository,
    TextGenerator, TokenService, UserRepository,
};
use crate::domain::{
    Case, CaseService, DentalRecord, DentalRecordService, EvidenceService,
    ReportGenerationService, ReportService, UserService,
};

/// Parameter object bundling every port implementation the handlers need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub cases: Arc<dyn RecordRepository<Case>>,
    pub evidence: Arc<dyn EvidenceRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub dental_records: Arc<dyn RecordRepository<DentalRecord>>,
    pub storage: Arc<dyn FileStorage>,
    pub generator: Arc<dyn TextGenerator>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub clock: Arc<dyn Clock>,
    /// Upper bound on a single uploaded file, enforced while streaming.
    pub max_upload_bytes: u64,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UserService,
    pub cases: CaseService,
    pub evidence: EvidenceService,
    pub reports: ReportService,
    pub dental_records: DentalRecordService,
    pub report_generation: ReportGenerationService,
    pub max_upload_bytes: u64,
}

impl HttpState {
    /// Build the services from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            cases,
            evidence,
            reports,
            dental_records,
            storage,
            generator,
            hasher,
            tokens,
            clock,
            max_upload_bytes,
        } = ports;
        let case_service = CaseService::new(
            cases,
            Arc::clone(&evidence),
            Arc::clone(&reports),
            Arc::clone(&clock),
        );
        Self {
            users: UserService::new(users, hasher, tokens, Arc::clone(&clock)),
            evidence: EvidenceService::new(
                Arc::clone(&evidence),
                case_service.clone(),
                storage,
                Arc::clone(&clock),
            ),
            cases: case_service,
            reports: ReportService::new(reports, Arc::clone(&clock)),
            dental_records: DentalRecordService::new(dental_records, clock),
            report_generation: ReportGenerationService::new(evidence, generator),
            max_upload_bytes,
        }
    }
}
