//! Lab reports (laudos) written for a case.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::ids::{CaseId, ReportId};
use super::record::{Record, replace, replace_optional};

/// How the report text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportOrigin {
    /// Written by hand.
    #[default]
    Manual,
    /// Drafted with the text-generation service and saved by a user.
    AiAssisted,
}

/// Error raised for an origin outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("origin must be one of manual, ai_assisted (got '{value}')")]
pub struct UnknownReportOriginError {
    value: String,
}

impl ReportOrigin {
    /// Stable wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::AiAssisted => "ai_assisted",
        }
    }
}

impl fmt::Display for ReportOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportOrigin {
    type Err = UnknownReportOriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "manual" => Ok(Self::Manual),
            "ai_assisted" => Ok(Self::AiAssisted),
            other => Err(UnknownReportOriginError {
                value: other.to_owned(),
            }),
        }
    }
}

/// A technical report issued for a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: ReportId,
    pub case_id: CaseId,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub origin: ReportOrigin,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub case_id: CaseId,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub origin: ReportOrigin,
}

/// Partial update for a [`Report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPatch {
    pub case_id: Option<CaseId>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub origin: Option<ReportOrigin>,
}

impl Record for Report {
    type Id = ReportId;
    type Draft = ReportDraft;
    type Patch = ReportPatch;

    const LABEL: &'static str = "report";

    fn create(id: ReportId, draft: ReportDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            case_id: draft.case_id,
            title: draft.title,
            content: draft.content,
            author: draft.author,
            origin: draft.origin,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ReportPatch, now: DateTime<Utc>) {
        replace(&mut self.case_id, patch.case_id);
        replace(&mut self.title, patch.title);
        replace(&mut self.content, patch.content);
        replace_optional(&mut self.author, patch.author);
        replace(&mut self.origin, patch.origin);
        self.updated_at = now;
    }

    fn id(&self) -> ReportId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
