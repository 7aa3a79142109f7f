//! Port abstraction for record persistence adapters and their errors.
//!
//! Every resource shares the same storage contract ([`RecordRepository`]);
//! resources that are queried by owning case or by email extend it.

use async_trait::async_trait;

use crate::domain::{CaseId, Email, Evidence, Record, Report, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by record repository adapters.
    pub enum RepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "record repository conflict: {message}",
    }
}

/// Storage contract shared by every record type.
#[async_trait]
pub trait RecordRepository<R: Record>: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: &R) -> Result<(), RepositoryError>;

    /// Fetch every record, oldest first.
    async fn list(&self) -> Result<Vec<R>, RepositoryError>;

    /// Fetch a record by identifier.
    async fn find(&self, id: &R::Id) -> Result<Option<R>, RepositoryError>;

    /// Overwrite a stored record. Returns `false` when it does not exist.
    async fn update(&self, record: &R) -> Result<bool, RepositoryError>;

    /// Remove a record. Returns `false` when it does not exist.
    async fn delete(&self, id: &R::Id) -> Result<bool, RepositoryError>;

    /// Remove every record and return how many were deleted.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
}

/// Evidence storage with per-case queries.
#[async_trait]
pub trait EvidenceRepository: RecordRepository<Evidence> {
    /// All evidence for a case, ordered by collection time.
    async fn list_by_case(&self, case_id: &CaseId) -> Result<Vec<Evidence>, RepositoryError>;

    /// Remove all evidence for a case and return how many were deleted.
    async fn delete_by_case(&self, case_id: &CaseId) -> Result<u64, RepositoryError>;
}

/// Report storage with per-case deletion.
#[async_trait]
pub trait ReportRepository: RecordRepository<Report> {
    /// Remove all reports for a case and return how many were deleted.
    async fn delete_by_case(&self, case_id: &CaseId) -> Result<u64, RepositoryError>;
}

/// User storage with lookup by login email.
#[async_trait]
pub trait UserRepository: RecordRepository<User> {
    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, RepositoryError>;
}
