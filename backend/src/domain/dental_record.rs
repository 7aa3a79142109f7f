//! Entries of the dental-record bank used for identification.

use chrono::{DateTime, Utc};

use super::ids::DentalRecordId;
use super::record::{Record, replace, replace_optional};

/// Ante-mortem dental record of a known person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DentalRecord {
    pub id: DentalRecordId,
    pub patient_name: String,
    /// Identity document number, when known.
    pub document_number: Option<String>,
    /// Free-text odontogram description.
    pub dental_chart: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a [`DentalRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DentalRecordDraft {
    pub patient_name: String,
    pub document_number: Option<String>,
    pub dental_chart: String,
    pub notes: Option<String>,
}

/// Partial update for a [`DentalRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DentalRecordPatch {
    pub patient_name: Option<String>,
    pub document_number: Option<String>,
    pub dental_chart: Option<String>,
    pub notes: Option<String>,
}

impl Record for DentalRecord {
    type Id = DentalRecordId;
    type Draft = DentalRecordDraft;
    type Patch = DentalRecordPatch;

    const LABEL: &'static str = "dental record";

    fn create(id: DentalRecordId, draft: DentalRecordDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_name: draft.patient_name,
            document_number: draft.document_number,
            dental_chart: draft.dental_chart,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: DentalRecordPatch, now: DateTime<Utc>) {
        replace(&mut self.patient_name, patch.patient_name);
        replace_optional(&mut self.document_number, patch.document_number);
        replace(&mut self.dental_chart, patch.dental_chart);
        replace_optional(&mut self.notes, patch.notes);
        self.updated_at = now;
    }

    fn id(&self) -> DentalRecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
