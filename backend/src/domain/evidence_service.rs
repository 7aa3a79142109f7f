//! Evidence use-cases: case ownership checks and file attachment.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::case_service::CaseService;
use crate::domain::ports::{EvidenceRepository, FileStorage, FileStorageError, IncomingFile};
use crate::domain::record_service::{RecordService, map_repository_error};
use crate::domain::{CaseId, Error, Evidence, EvidenceDraft, EvidenceId, EvidencePatch, Record};

fn map_storage_error(error: FileStorageError) -> Error {
    match error {
        FileStorageError::Rejected { message } => Error::invalid_request(message),
        FileStorageError::Io { message } => {
            Error::internal(format!("failed to store uploaded file: {message}"))
        }
    }
}

/// Evidence CRUD bound to existing cases.
#[derive(Clone)]
pub struct EvidenceService {
    records: RecordService<Evidence, dyn EvidenceRepository>,
    cases: CaseService,
    storage: Arc<dyn FileStorage>,
}

impl EvidenceService {
    pub fn new(
        evidence: Arc<dyn EvidenceRepository>,
        cases: CaseService,
        storage: Arc<dyn FileStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records: RecordService::new(evidence, clock),
            cases,
            storage,
        }
    }

    /// Create an evidence item, storing `file` first when one was sent.
    ///
    /// The file is written before the record. If the record write fails the
    /// stored file is left behind.
    pub async fn create(
        &self,
        draft: EvidenceDraft,
        file: Option<IncomingFile>,
    ) -> Result<Evidence, Error> {
        self.cases.ensure_exists(&draft.case_id).await?;
        let mut evidence = self.records.build(draft);
        if let Some(file) = file {
            let stored = self.storage.store(file).await.map_err(map_storage_error)?;
            info!(evidence_id = %evidence.id, file = %stored.name, "evidence file stored");
            evidence.file_url = Some(stored.url);
        }
        let created = self.records.insert(evidence).await;
        if let Err(error) = &created {
            warn!(%error, "evidence record write failed after upload");
        }
        created
    }

    pub async fn list(&self) -> Result<Vec<Evidence>, Error> {
        self.records.list().await
    }

    /// Evidence for one case ordered by collection time.
    pub async fn list_by_case(&self, case_id: &CaseId) -> Result<Vec<Evidence>, Error> {
        self.records
            .repository()
            .list_by_case(case_id)
            .await
            .map_err(|err| map_repository_error(Evidence::LABEL, err))
    }

    pub async fn get(&self, id: &EvidenceId) -> Result<Evidence, Error> {
        self.records.get(id).await
    }

    /// Partial update; moving evidence to another case requires that case to exist.
    pub async fn update(&self, id: &EvidenceId, patch: EvidencePatch) -> Result<Evidence, Error> {
        if let Some(case_id) = &patch.case_id {
            self.cases.ensure_exists(case_id).await?;
        }
        self.records.update(id, patch).await
    }

    pub async fn delete(&self, id: &EvidenceId) -> Result<(), Error> {
        self.records.delete(id).await
    }

    pub async fn delete_all(&self) -> Result<u64, Error> {
        self.records.delete_all().await
    }
}
