//! Diesel row structs and their conversions to domain records.
//!
//! Rows never leave the persistence layer. Each row doubles as insert payload
//! and update changeset; `None` fields are written as `NULL`.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::RepositoryError;
use crate::domain::{
    Case, CaseId, DentalRecord, DentalRecordId, Email, Evidence, EvidenceId, PasswordHash,
    RecordId, Report, ReportId, User, UserId,
};

use super::error_mapping::corrupt_column;
use super::schema::{cases, dental_records, evidence, reports, users};

#[derive(Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.clone(),
            email: user.email.as_str().to_owned(),
            password_hash: user.password_hash.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|_| corrupt_column("role", &row.role))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: Email::from_trusted(row.email),
            password_hash: PasswordHash::new(row.password_hash),
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = cases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CaseRow {
    pub id: Uuid,
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub location: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Case> for CaseRow {
    fn from(case: &Case) -> Self {
        Self {
            id: *case.id.as_uuid(),
            case_number: case.case_number.clone(),
            title: case.title.clone(),
            description: case.description.clone(),
            status: case.status.as_str().to_owned(),
            location: case.location.clone(),
            occurred_on: case.occurred_on,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

impl TryFrom<CaseRow> for Case {
    type Error = RepositoryError;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| corrupt_column("status", &row.status))?;
        Ok(Self {
            id: CaseId::from_uuid(row.id),
            case_number: row.case_number,
            title: row.title,
            description: row.description,
            status,
            location: row.location,
            occurred_on: row.occurred_on,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = evidence)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EvidenceRow {
    pub id: Uuid,
    pub case_id: Uuid,
    pub name: String,
    pub category: String,
    pub collected_at: DateTime<Utc>,
    pub description: Option<String>,
    pub collection_location: Option<String>,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Evidence> for EvidenceRow {
    fn from(item: &Evidence) -> Self {
        Self {
            id: *item.id.as_uuid(),
            case_id: *item.case_id.as_uuid(),
            name: item.name.clone(),
            category: item.category.clone(),
            collected_at: item.collected_at,
            description: item.description.clone(),
            collection_location: item.collection_location.clone(),
            file_url: item.file_url.clone(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl TryFrom<EvidenceRow> for Evidence {
    type Error = RepositoryError;

    fn try_from(row: EvidenceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EvidenceId::from_uuid(row.id),
            case_id: CaseId::from_uuid(row.case_id),
            name: row.name,
            category: row.category,
            collected_at: row.collected_at,
            description: row.description,
            collection_location: row.collection_location,
            file_url: row.file_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ReportRow {
    pub id: Uuid,
    pub case_id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub origin: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self {
            id: *report.id.as_uuid(),
            case_id: *report.case_id.as_uuid(),
            title: report.title.clone(),
            content: report.content.clone(),
            author: report.author.clone(),
            origin: report.origin.as_str().to_owned(),
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

impl TryFrom<ReportRow> for Report {
    type Error = RepositoryError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let origin = row
            .origin
            .parse()
            .map_err(|_| corrupt_column("origin", &row.origin))?;
        Ok(Self {
            id: ReportId::from_uuid(row.id),
            case_id: CaseId::from_uuid(row.case_id),
            title: row.title,
            content: row.content,
            author: row.author,
            origin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = dental_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DentalRecordRow {
    pub id: Uuid,
    pub patient_name: String,
    pub document_number: Option<String>,
    pub dental_chart: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DentalRecord> for DentalRecordRow {
    fn from(record: &DentalRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            patient_name: record.patient_name.clone(),
            document_number: record.document_number.clone(),
            dental_chart: record.dental_chart.clone(),
            notes: record.notes.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl TryFrom<DentalRecordRow> for DentalRecord {
    type Error = RepositoryError;

    fn try_from(row: DentalRecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DentalRecordId::from_uuid(row.id),
            patient_name: row.patient_name,
            document_number: row.document_number,
            dental_chart: row.dental_chart,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
