//! PostgreSQL implementations of the record repository ports.
//!
//! The shared CRUD contract is generated per table by
//! `diesel_record_repository!`; per-case and per-email queries are written
//! out by hand below it.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    EvidenceRepository, RecordRepository, ReportRepository, RepositoryError, UserRepository,
};
use crate::domain::{
    Case, CaseId, DentalRecord, Email, Evidence, Record, RecordId, Report, User,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CaseRow, DentalRecordRow, EvidenceRow, ReportRow, UserRow};
use super::pool::DbPool;
use super::schema::{cases, dental_records, evidence, reports, users};

fn affected(rows: usize) -> u64 {
    u64::try_from(rows).unwrap_or(u64::MAX)
}

fn convert_rows<Row, R>(rows: Vec<Row>) -> Result<Vec<R>, RepositoryError>
where
    R: TryFrom<Row, Error = RepositoryError>,
{
    rows.into_iter().map(R::try_from).collect()
}

macro_rules! diesel_record_repository {
    (
        $(#[$meta:meta])*
        $name:ident => $record:ty, $row:ty, $table:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            pool: DbPool,
        }

        impl $name {
            /// Create a repository drawing connections from `pool`.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl RecordRepository<$record> for $name {
            async fn insert(&self, record: &$record) -> Result<(), RepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::insert_into($table::table)
                    .values(<$row>::from(record))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(())
            }

            async fn list(&self) -> Result<Vec<$record>, RepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = $table::table
                    .order(($table::created_at.asc(), $table::id.asc()))
                    .select(<$row>::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                convert_rows(rows)
            }

            async fn find(
                &self,
                id: &<$record as Record>::Id,
            ) -> Result<Option<$record>, RepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: Option<$row> = $table::table
                    .find(*id.as_uuid())
                    .select(<$row>::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                row.map(<$record>::try_from).transpose()
            }

            async fn update(&self, record: &$record) -> Result<bool, RepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = <$row>::from(record);
                let updated = diesel::update($table::table.find(row.id))
                    .set(&row)
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(updated > 0)
            }

            async fn delete(
                &self,
                id: &<$record as Record>::Id,
            ) -> Result<bool, RepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let deleted = diesel::delete($table::table.find(*id.as_uuid()))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(deleted > 0)
            }

            async fn delete_all(&self) -> Result<u64, RepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let deleted = diesel::delete($table::table)
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(affected(deleted))
            }
        }
    };
}

diesel_record_repository! {
    /// Cases stored in the `cases` table.
    DieselCaseRepository => Case, CaseRow, cases
}

diesel_record_repository! {
    /// Evidence stored in the `evidence` table.
    DieselEvidenceRepository => Evidence, EvidenceRow, evidence
}

diesel_record_repository! {
    /// Reports stored in the `reports` table.
    DieselReportRepository => Report, ReportRow, reports
}

diesel_record_repository! {
    /// Dental records stored in the `dental_records` table.
    DieselDentalRecordRepository => DentalRecord, DentalRecordRow, dental_records
}

diesel_record_repository! {
    /// Accounts stored in the `users` table.
    DieselUserRepository => User, UserRow, users
}

#[async_trait]
impl EvidenceRepository for DieselEvidenceRepository {
    async fn list_by_case(&self, case_id: &CaseId) -> Result<Vec<Evidence>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EvidenceRow> = evidence::table
            .filter(evidence::case_id.eq(*case_id.as_uuid()))
            .order((evidence::collected_at.asc(), evidence::created_at.asc()))
            .select(EvidenceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn delete_by_case(&self, case_id: &CaseId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(evidence::table.filter(evidence::case_id.eq(*case_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected(deleted))
    }
}

#[async_trait]
impl ReportRepository for DieselReportRepository {
    async fn delete_by_case(&self, case_id: &CaseId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(reports::table.filter(reports::case_id.eq(*case_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected(deleted))
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
