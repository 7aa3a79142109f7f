//! Evidence items collected for a case.

use chrono::{DateTime, Utc};

use super::ids::{CaseId, EvidenceId};
use super::record::{Record, replace, replace_optional};

/// A piece of evidence attached to a case.
///
/// `file_url` is only ever set by the upload path once the file has been
/// stored; drafts and patches cannot carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub id: EvidenceId,
    pub case_id: CaseId,
    pub name: String,
    pub category: String,
    pub collected_at: DateTime<Utc>,
    pub description: Option<String>,
    pub collection_location: Option<String>,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating an [`Evidence`] item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceDraft {
    pub case_id: CaseId,
    pub name: String,
    pub category: String,
    pub collected_at: DateTime<Utc>,
    pub description: Option<String>,
    pub collection_location: Option<String>,
}

/// Partial update for an [`Evidence`] item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidencePatch {
    pub case_id: Option<CaseId>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub collected_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub collection_location: Option<String>,
}

impl Record for Evidence {
    type Id = EvidenceId;
    type Draft = EvidenceDraft;
    type Patch = EvidencePatch;

    const LABEL: &'static str = "evidence";

    fn create(id: EvidenceId, draft: EvidenceDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            case_id: draft.case_id,
            name: draft.name,
            category: draft.category,
            collected_at: draft.collected_at,
            description: draft.description,
            collection_location: draft.collection_location,
            file_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: EvidencePatch, now: DateTime<Utc>) {
        replace(&mut self.case_id, patch.case_id);
        replace(&mut self.name, patch.name);
        replace(&mut self.category, patch.category);
        replace(&mut self.collected_at, patch.collected_at);
        replace_optional(&mut self.description, patch.description);
        replace_optional(&mut self.collection_location, patch.collection_location);
        self.updated_at = now;
    }

    fn id(&self) -> EvidenceId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
