//! Diesel repositories against embedded PostgreSQL.
//!
//! Each test gets its own temporary database migrated with the embedded
//! migrations, so the schema under test is the one the server applies at
//! startup.
//!
//! # Runtime Strategy
//!
//! Cluster setup is synchronous and must not run inside a Tokio runtime, so
//! tests are plain `#[rstest]` functions that drive async calls through the
//! runtime owned by the context.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::DefaultClock;
use odonto_backend::domain::ports::{
    EvidenceRepository, RecordRepository, ReportRepository, RepositoryError, UserRepository,
};
use odonto_backend::domain::{
    Case, CaseDraft, CaseId, CaseService, CaseStatus, DentalRecord, DentalRecordDraft,
    DentalRecordId, Email, Evidence, EvidenceDraft, EvidenceId, PasswordHash, Record, Report,
    ReportDraft, ReportId, ReportOrigin, Role, User, UserDraft, UserId,
};
use odonto_backend::outbound::persistence::{
    DbPool, DieselCaseRepository, DieselDentalRecordRepository, DieselEvidenceRepository,
    DieselReportRepository, DieselUserRepository, PoolConfig, run_migrations,
};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::{handle_cluster_setup_failure, shared_cluster, temporary_database};

struct TestContext {
    runtime: Runtime,
    cases: Arc<DieselCaseRepository>,
    evidence: Arc<DieselEvidenceRepository>,
    reports: Arc<DieselReportRepository>,
    dental_records: Arc<DieselDentalRecordRepository>,
    users: Arc<DieselUserRepository>,
    // Dropped last so pooled connections close first.
    _database: TemporaryDatabase,
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = temporary_database(cluster)?;
    let url = database.url().to_string();

    let pool = runtime.block_on(async {
        run_migrations(&url).await.map_err(|err| err.to_string())?;
        DbPool::new(PoolConfig::new(&url).with_max_size(2))
            .await
            .map_err(|err| err.to_string())
    })?;

    Ok(TestContext {
        runtime,
        cases: Arc::new(DieselCaseRepository::new(pool.clone())),
        evidence: Arc::new(DieselEvidenceRepository::new(pool.clone())),
        reports: Arc::new(DieselReportRepository::new(pool.clone())),
        dental_records: Arc::new(DieselDentalRecordRepository::new(pool.clone())),
        users: Arc::new(DieselUserRepository::new(pool)),
        _database: database,
    })
}

#[fixture]
fn db() -> Option<TestContext> {
    match setup_test_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

/// Whole seconds, so values survive the microsecond column precision.
fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).single().expect("valid timestamp")
        + Duration::minutes(minutes)
}

fn case(number: &str, minutes: i64) -> Case {
    Case::create(
        CaseId::random(),
        CaseDraft {
            case_number: number.to_owned(),
            title: "Identificação de vítima".to_owned(),
            description: Some("Arcada superior parcial".to_owned()),
            status: CaseStatus::Open,
            location: None,
            occurred_on: None,
        },
        at(minutes),
    )
}

fn evidence(case_id: CaseId, name: &str, collected_minutes: i64) -> Evidence {
    Evidence::create(
        EvidenceId::random(),
        EvidenceDraft {
            case_id,
            name: name.to_owned(),
            category: "radiografia".to_owned(),
            collected_at: at(collected_minutes),
            description: None,
            collection_location: Some("IML".to_owned()),
        },
        at(0),
    )
}

fn report(case_id: CaseId) -> Report {
    Report::create(
        ReportId::random(),
        ReportDraft {
            case_id,
            title: "Laudo preliminar".to_owned(),
            content: "Compatível com a ficha odontológica.".to_owned(),
            author: Some("Dra. Souza".to_owned()),
            origin: ReportOrigin::AiAssisted,
        },
        at(0),
    )
}

fn user(email: &str) -> User {
    User::create(
        UserId::random(),
        UserDraft {
            name: "Perita".to_owned(),
            email: Email::parse(email).expect("valid email"),
            password_hash: PasswordHash::new("$argon2id$v=19$stored"),
            role: Role::Examiner,
        },
        at(0),
    )
}

#[rstest]
fn cases_round_trip_and_list_oldest_first(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let newer = case("B-2", 5);
    let older = case("A-1", 1);

    ctx.runtime.block_on(async {
        ctx.cases.insert(&newer).await.expect("insert newer");
        ctx.cases.insert(&older).await.expect("insert older");

        let found = ctx.cases.find(&older.id).await.expect("find");
        assert_eq!(found, Some(older.clone()));

        let listed = ctx.cases.list().await.expect("list");
        let ids: Vec<CaseId> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    });
}

#[rstest]
fn update_overwrites_stored_fields_and_reports_missing_rows(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let mut stored = case("C-3", 0);

    ctx.runtime.block_on(async {
        ctx.cases.insert(&stored).await.expect("insert");
        stored.title = "Identificação concluída".to_owned();
        stored.status = CaseStatus::Closed;
        stored.updated_at = at(30);
        assert!(ctx.cases.update(&stored).await.expect("update"));
        assert_eq!(
            ctx.cases.find(&stored.id).await.expect("find"),
            Some(stored.clone())
        );

        let ghost = case("C-4", 0);
        assert!(!ctx.cases.update(&ghost).await.expect("update ghost"));
        assert!(ctx.cases.find(&ghost.id).await.expect("find").is_none());
    });
}

#[rstest]
fn evidence_for_a_case_is_ordered_by_collection_time(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let case_id = CaseId::random();
    let other_case = CaseId::random();
    let late = evidence(case_id, "Mandíbula", 40);
    let early = evidence(case_id, "Maxila", 10);
    let middle = evidence(case_id, "Molar", 20);
    let foreign = evidence(other_case, "Incisivo", 0);

    ctx.runtime.block_on(async {
        for item in [&late, &foreign, &early, &middle] {
            ctx.evidence.insert(item).await.expect("insert evidence");
        }

        let listed = ctx.evidence.list_by_case(&case_id).await.expect("list by case");
        let names: Vec<&str> = listed.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Maxila", "Molar", "Mandíbula"]);
        assert_eq!(listed[0], early);
    });
}

#[rstest]
fn delete_by_case_counts_only_that_cases_children(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let doomed = CaseId::random();
    let kept = CaseId::random();

    ctx.runtime.block_on(async {
        for item in [
            evidence(doomed, "Maxila", 1),
            evidence(doomed, "Molar", 2),
            evidence(kept, "Incisivo", 3),
        ] {
            ctx.evidence.insert(&item).await.expect("insert evidence");
        }
        ctx.reports.insert(&report(doomed)).await.expect("insert report");
        ctx.reports.insert(&report(kept)).await.expect("insert report");

        assert_eq!(ctx.evidence.delete_by_case(&doomed).await.expect("delete"), 2);
        let reports_removed = ReportRepository::delete_by_case(&*ctx.reports, &doomed)
            .await
            .expect("delete");
        assert_eq!(reports_removed, 1);
        assert_eq!(ctx.evidence.delete_by_case(&doomed).await.expect("delete again"), 0);

        assert_eq!(ctx.evidence.list().await.expect("list").len(), 1);
        let remaining = ctx.reports.list().await.expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].case_id, kept);
    });
}

#[rstest]
fn reports_may_reference_a_case_that_does_not_exist(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let orphan = report(CaseId::random());

    ctx.runtime.block_on(async {
        ctx.reports.insert(&orphan).await.expect("insert orphan report");
        assert_eq!(
            ctx.reports.find(&orphan.id).await.expect("find"),
            Some(orphan.clone())
        );
    });
}

#[rstest]
fn deleting_a_case_through_the_service_removes_its_children(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let service = CaseService::new(
        ctx.cases.clone(),
        ctx.evidence.clone(),
        ctx.reports.clone(),
        Arc::new(DefaultClock),
    );
    let doomed = case("D-1", 0);
    let kept = case("D-2", 1);

    ctx.runtime.block_on(async {
        ctx.cases.insert(&doomed).await.expect("insert case");
        ctx.cases.insert(&kept).await.expect("insert case");
        ctx.evidence.insert(&evidence(doomed.id, "Maxila", 1)).await.expect("insert");
        ctx.evidence.insert(&evidence(kept.id, "Molar", 2)).await.expect("insert");
        ctx.reports.insert(&report(doomed.id)).await.expect("insert");

        service.delete(&doomed.id).await.expect("cascade delete");

        assert!(ctx.cases.find(&doomed.id).await.expect("find").is_none());
        assert!(ctx.evidence.list_by_case(&doomed.id).await.expect("list").is_empty());
        assert_eq!(ctx.evidence.list_by_case(&kept.id).await.expect("list").len(), 1);
        assert!(ctx.reports.list().await.expect("list").is_empty());
    });
}

#[rstest]
fn duplicate_email_is_a_conflict(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let first = user("perita@example.org");
    let second = user("perita@example.org");

    ctx.runtime.block_on(async {
        ctx.users.insert(&first).await.expect("insert first");
        let err = ctx.users.insert(&second).await.expect_err("duplicate email");
        assert!(matches!(err, RepositoryError::Conflict { .. }), "got {err:?}");

        let email = Email::parse("perita@example.org").expect("valid email");
        let found = ctx.users.find_by_email(&email).await.expect("find by email");
        assert_eq!(found.map(|u| u.id), Some(first.id));
        assert_eq!(ctx.users.count().await.expect("count"), 1);
    });
}

#[rstest]
fn delete_reports_whether_a_row_was_removed(db: Option<TestContext>) {
    let Some(ctx) = db else { return };
    let stored = DentalRecord::create(
        DentalRecordId::random(),
        DentalRecordDraft {
            patient_name: "Maria da Silva".to_owned(),
            document_number: Some("123.456.789-00".to_owned()),
            dental_chart: "18: ausente; 11: restauração".to_owned(),
            notes: None,
        },
        at(0),
    );

    ctx.runtime.block_on(async {
        ctx.dental_records.insert(&stored).await.expect("insert");
        assert!(ctx.dental_records.delete(&stored.id).await.expect("delete"));
        assert!(!ctx.dental_records.delete(&stored.id).await.expect("delete again"));
    });
}

#[rstest]
fn delete_all_returns_the_number_removed(db: Option<TestContext>) {
    let Some(ctx) = db else { return };

    ctx.runtime.block_on(async {
        for number in ["E-1", "E-2", "E-3"] {
            ctx.cases.insert(&case(number, 0)).await.expect("insert");
        }
        assert_eq!(ctx.cases.delete_all().await.expect("delete all"), 3);
        assert_eq!(ctx.cases.delete_all().await.expect("delete all again"), 0);
    });
}
