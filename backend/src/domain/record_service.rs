//! Generic create/list/get/update/delete use-cases over a [`RecordRepository`].
//!
//! Cases, reports and dental records use this service directly; users and
//! evidence wrap it with their extra rules.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{RecordRepository, RepositoryError};
use crate::domain::{Error, Record, RecordId};

/// Map repository failures onto domain errors.
///
/// Connection failures surface as `503`; query failures are internal and get
/// redacted at the HTTP edge; uniqueness violations become `409`.
pub fn map_repository_error(label: &str, error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            warn!(record = label, %message, "record repository unavailable");
            Error::service_unavailable(format!("{label} repository unavailable"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("{label} repository error: {message}"))
        }
        RepositoryError::Conflict { message } => Error::conflict(message),
    }
}

/// Message used for `404` responses.
pub fn not_found_error<R: Record>() -> Error {
    Error::not_found(format!("{} not found", R::LABEL))
}

/// CRUD use-cases for one record type.
///
/// `P` defaults to the plain repository port; services needing an extended
/// port (for example [`crate::domain::ports::UserRepository`]) name it
/// explicitly and keep access to its extra queries via [`Self::repository`].
pub struct RecordService<R: Record, P: ?Sized = dyn RecordRepository<R>> {
    repo: Arc<P>,
    clock: Arc<dyn Clock>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, P: ?Sized> Clone for RecordService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
            _record: PhantomData,
        }
    }
}

impl<R, P> RecordService<R, P>
where
    R: Record,
    P: RecordRepository<R> + ?Sized,
{
    /// Create a service over `repo`, stamping records with `clock`.
    pub fn new(repo: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            _record: PhantomData,
        }
    }

    /// The underlying repository port.
    pub fn repository(&self) -> &Arc<P> {
        &self.repo
    }

    fn map_error(error: RepositoryError) -> Error {
        map_repository_error(R::LABEL, error)
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Build a record from `draft` with a fresh identifier, without storing it.
    pub fn build(&self, draft: R::Draft) -> R {
        R::create(R::Id::from_uuid(Uuid::new_v4()), draft, self.now())
    }

    /// Build and persist a new record.
    pub async fn create(&self, draft: R::Draft) -> Result<R, Error> {
        let record = self.build(draft);
        self.insert(record).await
    }

    /// Persist an already built record.
    pub async fn insert(&self, record: R) -> Result<R, Error> {
        self.repo.insert(&record).await.map_err(Self::map_error)?;
        info!(record = R::LABEL, id = %record.id(), "record created");
        Ok(record)
    }

    /// Every stored record, oldest first.
    pub async fn list(&self) -> Result<Vec<R>, Error> {
        self.repo.list().await.map_err(Self::map_error)
    }

    /// Fetch a record or fail with `404`.
    pub async fn get(&self, id: &R::Id) -> Result<R, Error> {
        self.repo
            .find(id)
            .await
            .map_err(Self::map_error)?
            .ok_or_else(not_found_error::<R>)
    }

    /// Whether a record exists.
    pub async fn exists(&self, id: &R::Id) -> Result<bool, Error> {
        Ok(self.repo.find(id).await.map_err(Self::map_error)?.is_some())
    }

    /// Apply a partial update and persist it.
    pub async fn update(&self, id: &R::Id, patch: R::Patch) -> Result<R, Error> {
        let mut record = self.get(id).await?;
        record.apply(patch, self.now());
        let updated = self.repo.update(&record).await.map_err(Self::map_error)?;
        if !updated {
            return Err(not_found_error::<R>());
        }
        info!(record = R::LABEL, id = %record.id(), "record updated");
        Ok(record)
    }

    /// Remove a record or fail with `404`.
    pub async fn delete(&self, id: &R::Id) -> Result<(), Error> {
        let deleted = self.repo.delete(id).await.map_err(Self::map_error)?;
        if !deleted {
            return Err(not_found_error::<R>());
        }
        info!(record = R::LABEL, %id, "record deleted");
        Ok(())
    }

    /// Remove every record.
    pub async fn delete_all(&self) -> Result<u64, Error> {
        let deleted = self.repo.delete_all().await.map_err(Self::map_error)?;
        info!(record = R::LABEL, deleted, "records deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DentalRecord, DentalRecordDraft, DentalRecordId, DentalRecordPatch, ErrorCode,
    };
    use crate::outbound::memory::MemoryRecordRepository;
    use crate::test_support::MutableClock;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    struct Harness {
        service: RecordService<DentalRecord>,
        clock: Arc<MutableClock>,
    }

    #[fixture]
    fn harness() -> Harness {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .single()
            .expect("valid time");
        let clock = Arc::new(MutableClock::new(start));
        let repo: Arc<dyn RecordRepository<DentalRecord>> =
            Arc::new(MemoryRecordRepository::<DentalRecord>::default());
        Harness {
            service: RecordService::new(repo, clock.clone()),
            clock,
        }
    }

    fn draft(name: &str) -> DentalRecordDraft {
        DentalRecordDraft {
            patient_name: name.to_owned(),
            document_number: None,
            dental_chart: "18 absent; 36 amalgam".to_owned(),
            notes: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_then_get_returns_submitted_fields(harness: Harness) {
        let created = harness.service.create(draft("Maria")).await.expect("create");
        let fetched = harness.service.get(&created.id).await.expect("get");
        assert_eq!(fetched, created);
        assert_eq!(fetched.patient_name, "Maria");
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_idempotent(harness: Harness) {
        harness.service.create(draft("A")).await.expect("create");
        harness.service.create(draft("B")).await.expect("create");
        let first = harness.service.list().await.expect("list");
        let second = harness.service.list().await.expect("list");
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn update_refreshes_updated_at(harness: Harness) {
        let created = harness.service.create(draft("A")).await.expect("create");
        harness.clock.advance_seconds(60);
        let updated = harness
            .service
            .update(
                &created.id,
                DentalRecordPatch {
                    notes: Some("bridge 11-13".into()),
                    ..DentalRecordPatch::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.notes.as_deref(), Some("bridge 11-13"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found_and_keeps_records(harness: Harness) {
        harness.service.create(draft("A")).await.expect("create");
        let err = harness
            .service
            .delete(&DentalRecordId::random())
            .await
            .expect_err("unknown id");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(harness.service.list().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_unknown_id_is_not_found(harness: Harness) {
        let err = harness
            .service
            .update(&DentalRecordId::random(), DentalRecordPatch::default())
            .await
            .expect_err("unknown id");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_all_reports_count(harness: Harness) {
        harness.service.create(draft("A")).await.expect("create");
        harness.service.create(draft("B")).await.expect("create");
        assert_eq!(harness.service.delete_all().await.expect("delete all"), 2);
        assert!(harness.service.list().await.expect("list").is_empty());
    }

    #[rstest]
    #[case(RepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(RepositoryError::conflict("email already registered"), ErrorCode::Conflict)]
    fn repository_errors_map_to_codes(#[case] error: RepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_repository_error("case", error).code(), code);
    }
}
