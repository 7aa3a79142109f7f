//! Forensic case aggregate.
//!
//! A case owns zero or more evidence items and reports through their
//! `case_id` field. Ownership is enforced by the services, not by the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use super::ids::CaseId;
use super::record::{Record, replace, replace_optional};

/// Investigation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStatus {
    /// Newly registered case.
    #[default]
    Open,
    /// Analysis under way.
    InProgress,
    /// Concluded.
    Closed,
}

/// Error raised for a status outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of open, in_progress, closed (got '{value}')")]
pub struct UnknownCaseStatusError {
    value: String,
}

impl CaseStatus {
    /// Stable wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = UnknownCaseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            other => Err(UnknownCaseStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// A forensic odontology case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: CaseId,
    /// Forensic case number assigned by the requesting authority.
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub location: Option<String>,
    /// Date of the incident under investigation.
    pub occurred_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a [`Case`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDraft {
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub location: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

/// Partial update for a [`Case`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CasePatch {
    pub case_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
    pub location: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

impl Record for Case {
    type Id = CaseId;
    type Draft = CaseDraft;
    type Patch = CasePatch;

    const LABEL: &'static str = "case";

    fn create(id: CaseId, draft: CaseDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            case_number: draft.case_number,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            location: draft.location,
            occurred_on: draft.occurred_on,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: CasePatch, now: DateTime<Utc>) {
        replace(&mut self.case_number, patch.case_number);
        replace(&mut self.title, patch.title);
        replace_optional(&mut self.description, patch.description);
        replace(&mut self.status, patch.status);
        replace_optional(&mut self.location, patch.location);
        replace_optional(&mut self.occurred_on, patch.occurred_on);
        self.updated_at = now;
    }

    fn id(&self) -> CaseId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn case() -> Case {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("valid time");
        Case::create(
            CaseId::random(),
            CaseDraft {
                case_number: "IML-2024-001".into(),
                title: "Unidentified remains".into(),
                description: Some("Found near the river".into()),
                status: CaseStatus::default(),
                location: None,
                occurred_on: None,
            },
            now,
        )
    }

    #[rstest]
    fn create_sets_both_timestamps(case: Case) {
        assert_eq!(case.created_at, case.updated_at);
        assert_eq!(case.status, CaseStatus::Open);
    }

    #[rstest]
    fn apply_changes_only_supplied_fields(mut case: Case) {
        let later = case.created_at + chrono::Duration::hours(1);
        case.apply(
            CasePatch {
                status: Some(CaseStatus::InProgress),
                location: Some("Recife".into()),
                ..CasePatch::default()
            },
            later,
        );
        assert_eq!(case.status, CaseStatus::InProgress);
        assert_eq!(case.location.as_deref(), Some("Recife"));
        assert_eq!(case.title, "Unidentified remains");
        assert_eq!(case.description.as_deref(), Some("Found near the river"));
        assert_eq!(case.updated_at, later);
    }

    #[rstest]
    #[case("open", CaseStatus::Open)]
    #[case("in_progress", CaseStatus::InProgress)]
    #[case("closed", CaseStatus::Closed)]
    fn parses_statuses(#[case] raw: &str, #[case] expected: CaseStatus) {
        assert_eq!(raw.parse::<CaseStatus>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn rejects_unknown_status() {
        assert!("archived".parse::<CaseStatus>().is_err());
    }
}
