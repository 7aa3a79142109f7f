//! JSON representations returned by the REST endpoints.
//!
//! Domain records stay framework-agnostic and never derive `Serialize` or
//! `ToSchema`; the response types below mirror them in the adapter layer.
//! Password hashes have no representation here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Case, DentalRecord, Evidence, RecordId, Report, User};

/// Account as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Dra. Helena Souza")]
    pub name: String,
    #[schema(example = "helena@example.org")]
    pub email: String,
    /// One of `admin`, `perito`, `assistente`.
    #[schema(example = "perito")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.clone(),
            email: user.email.as_str().to_owned(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Forensic case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CaseResponse {
    pub id: Uuid,
    #[schema(example = "2024/0173")]
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    /// One of `open`, `in_progress`, `closed`.
    #[schema(example = "open")]
    pub status: String,
    pub location: Option<String>,
    pub occurred_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Case> for CaseResponse {
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

/// Evidence item attached to a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EvidenceResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    #[schema(example = "Arcada superior")]
    pub name: String,
    #[schema(example = "fotografia")]
    pub category: String,
    pub collected_at: DateTime<Utc>,
    pub description: Option<String>,
    pub collection_location: Option<String>,
    /// Public URL of the uploaded file, if one was attached.
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Evidence> for EvidenceResponse {
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

/// Lab report (laudo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    /// One of `manual`, `ai_assisted`.
    #[schema(example = "manual")]
    pub origin: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Report> for ReportResponse {
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

/// Dental-record bank entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DentalRecordResponse {
    pub id: Uuid,
    pub patient_name: String,
    pub document_number: Option<String>,
    /// Free-text odontogram description.
    pub dental_chart: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DentalRecord> for DentalRecordResponse {
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

/// Confirmation of a single deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = "case deleted")]
    pub message: String,
    pub id: Uuid,
}

impl DeletedResponse {
    pub(crate) fn new(label: &str, id: impl RecordId) -> Self {
        Self {
            message: format!("{label} deleted"),
            id: *id.as_uuid(),
        }
    }
}

/// Confirmation of a delete-all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedAllResponse {
    #[schema(example = "all case records deleted")]
    pub message: String,
    pub deleted: u64,
}

impl DeletedAllResponse {
    pub(crate) fn new(label: &str, deleted: u64) -> Self {
        Self {
            message: format!("all {label} records deleted"),
            deleted,
        }
    }
}

pub(crate) fn collect<'a, T, R>(records: &'a [R]) -> Vec<T>
where
    T: From<&'a R>,
{
    records.iter().map(T::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, PasswordHash, Role, UserId};
    use rstest::rstest;

    #[rstest]
    fn user_response_never_carries_the_hash() {
        let now = Utc::now();
        let user = User {
            id: UserId::random(),
            name: "Ana".to_owned(),
            email: Email::parse("ana@example.org").expect("email"),
            password_hash: PasswordHash::new("$argon2id$v=19$secret"),
            role: Role::Assistant,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(UserResponse::from(&user)).expect("serialise");
        assert_eq!(json["role"], "assistente");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2id"));
    }

    #[rstest]
    fn deletion_messages_use_the_record_label() {
        let id = UserId::random();
        let deleted = DeletedResponse::new("user", id);
        assert_eq!(deleted.message, "user deleted");
        assert_eq!(&deleted.id, id.as_uuid());
        assert_eq!(DeletedAllResponse::new("case", 3).message, "all case records deleted");
    }
}
