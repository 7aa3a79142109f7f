//! Case use-cases, including the cascade to owned evidence and reports.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{EvidenceRepository, RecordRepository, ReportRepository};
use crate::domain::record_service::{RecordService, map_repository_error};
use crate::domain::{Case, CaseDraft, CaseId, CasePatch, Error, Evidence, Record, Report};

/// Case CRUD; deleting a case also deletes its evidence and reports.
///
/// The cascade is not transactional: a failure part-way leaves the case in
/// place with some children removed, and the request can be retried.
#[derive(Clone)]
pub struct CaseService {
    records: RecordService<Case>,
    evidence: Arc<dyn EvidenceRepository>,
    reports: Arc<dyn ReportRepository>,
}

impl CaseService {
    pub fn new(
        cases: Arc<dyn RecordRepository<Case>>,
        evidence: Arc<dyn EvidenceRepository>,
        reports: Arc<dyn ReportRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records: RecordService::new(cases, clock),
            evidence,
            reports,
        }
    }

    pub async fn create(&self, draft: CaseDraft) -> Result<Case, Error> {
        self.records.create(draft).await
    }

    pub async fn list(&self) -> Result<Vec<Case>, Error> {
        self.records.list().await
    }

    pub async fn get(&self, id: &CaseId) -> Result<Case, Error> {
        self.records.get(id).await
    }

    /// Fail with `404` unless the case exists.
    pub async fn ensure_exists(&self, id: &CaseId) -> Result<(), Error> {
        if self.records.exists(id).await? {
            Ok(())
        } else {
            Err(Error::not_found(format!("case {id} not found")))
        }
    }

    pub async fn update(&self, id: &CaseId, patch: CasePatch) -> Result<Case, Error> {
        self.records.update(id, patch).await
    }

    /// Delete a case together with its evidence and reports.
    pub async fn delete(&self, id: &CaseId) -> Result<(), Error> {
        self.records.get(id).await?;
        let evidence = self
            .evidence
            .delete_by_case(id)
            .await
            .map_err(|err| map_repository_error(Evidence::LABEL, err))?;
        let reports = self
            .reports
            .delete_by_case(id)
            .await
            .map_err(|err| map_repository_error(Report::LABEL, err))?;
        self.records.delete(id).await?;
        info!(case_id = %id, evidence, reports, "case children deleted");
        Ok(())
    }

    /// Delete every case, evidence item and report.
    pub async fn delete_all(&self) -> Result<u64, Error> {
        self.evidence
            .delete_all()
            .await
            .map_err(|err| map_repository_error(Evidence::LABEL, err))?;
        self.reports
            .delete_all()
            .await
            .map_err(|err| map_repository_error(Report::LABEL, err))?;
        self.records.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseStatus, EvidenceDraft, ErrorCode, ReportDraft, ReportOrigin};
    use crate::outbound::memory::{
        MemoryEvidenceRepository, MemoryRecordRepository, MemoryReportRepository,
    };
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    struct Harness {
        service: CaseService,
        evidence: Arc<MemoryEvidenceRepository>,
        reports: Arc<MemoryReportRepository>,
    }

    #[fixture]
    fn harness() -> Harness {
        let evidence = Arc::new(MemoryEvidenceRepository::default());
        let reports = Arc::new(MemoryReportRepository::default());
        let cases: Arc<dyn RecordRepository<Case>> =
            Arc::new(MemoryRecordRepository::<Case>::default());
        let service = CaseService::new(
            cases,
            evidence.clone(),
            reports.clone(),
            Arc::new(DefaultClock),
        );
        Harness {
            service,
            evidence,
            reports,
        }
    }

    fn draft(number: &str) -> CaseDraft {
        CaseDraft {
            case_number: number.to_owned(),
            title: "Identification".to_owned(),
            description: None,
            status: CaseStatus::Open,
            location: None,
            occurred_on: None,
        }
    }

    async fn seed_children(harness: &Harness, case_id: CaseId) {
        let now = chrono::Utc::now();
        let evidence = Evidence::create(
            crate::domain::EvidenceId::random(),
            EvidenceDraft {
                case_id,
                name: "Mandible".into(),
                category: "bone".into(),
                collected_at: now,
                description: None,
                collection_location: None,
            },
            now,
        );
        harness.evidence.insert(&evidence).await.expect("insert evidence");
        let report = Report::create(
            crate::domain::ReportId::random(),
            ReportDraft {
                case_id,
                title: "Preliminary".into(),
                content: "Text".into(),
                author: None,
                origin: ReportOrigin::Manual,
            },
            now,
        );
        harness.reports.insert(&report).await.expect("insert report");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_cascades_to_children_of_that_case_only(harness: Harness) {
        let doomed = harness.service.create(draft("A-1")).await.expect("create");
        let kept = harness.service.create(draft("A-2")).await.expect("create");
        seed_children(&harness, doomed.id).await;
        seed_children(&harness, kept.id).await;

        harness.service.delete(&doomed.id).await.expect("delete");

        let evidence = harness.evidence.list().await.expect("list evidence");
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].case_id, kept.id);
        let reports = harness.reports.list().await.expect("list reports");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].case_id, kept.id);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_unknown_case_leaves_children(harness: Harness) {
        let case = harness.service.create(draft("B-1")).await.expect("create");
        seed_children(&harness, case.id).await;

        let err = harness
            .service
            .delete(&CaseId::random())
            .await
            .expect_err("unknown case");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(harness.evidence.list().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_all_clears_children(harness: Harness) {
        let case = harness.service.create(draft("C-1")).await.expect("create");
        seed_children(&harness, case.id).await;

        assert_eq!(harness.service.delete_all().await.expect("delete all"), 1);
        assert!(harness.evidence.list().await.expect("list").is_empty());
        assert!(harness.reports.list().await.expect("list").is_empty());
    }
}
