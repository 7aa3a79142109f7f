//! Domain records, ports and use-case services.
//!
//! Purpose: define the strongly typed records managed by the API and the
//! services that enforce their invariants. Nothing here knows about HTTP,
//! SQL or the text-generation provider; those live behind [`ports`].
//!
//! Public surface:
//! - Records: [`User`], [`Case`], [`Evidence`], [`Report`], [`DentalRecord`]
//!   with their drafts and patches, all sharing the [`Record`] contract.
//! - Services: [`UserService`], [`CaseService`], [`EvidenceService`],
//!   [`ReportService`], [`DentalRecordService`], [`ReportGenerationService`].
//! - [`Error`] and [`ErrorCode`] for failures surfaced to clients.

pub mod case;
pub mod case_service;
pub mod dental_record;
pub mod error;
pub mod evidence;
pub mod evidence_service;
pub mod ids;
pub mod ports;
pub mod record;
pub mod record_service;
pub mod report;
pub mod report_generation;
pub mod role;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::case::{Case, CaseDraft, CasePatch, CaseStatus, UnknownCaseStatusError};
pub use self::case_service::CaseService;
pub use self::dental_record::{DentalRecord, DentalRecordDraft, DentalRecordPatch};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::evidence::{Evidence, EvidenceDraft, EvidencePatch};
pub use self::evidence_service::EvidenceService;
pub use self::ids::{
    CaseId, DentalRecordId, EvidenceId, IdParseError, RecordId, ReportId, UserId,
};
pub use self::record::Record;
pub use self::record_service::RecordService;
pub use self::report::{Report, ReportDraft, ReportOrigin, ReportPatch, UnknownReportOriginError};
pub use self::report_generation::{
    GeneratedReport, ReportGenerationService, render_report_prompt,
};
pub use self::role::{Role, UnknownRoleError};
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, MIN_PASSWORD_LENGTH, PasswordHash, User, UserDraft, UserPatch, UserValidationError,
    validate_password,
};
pub use self::user_service::{LoginOutcome, NewUser, UserService, UserUpdate};

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Report use-cases. Reports need no rules beyond the shared record contract.
pub type ReportService = RecordService<Report, dyn ports::ReportRepository>;

/// Dental-record bank use-cases.
pub type DentalRecordService = RecordService<DentalRecord>;
