//! Behaviour shared by every stored entity.
//!
//! Each resource exposed over HTTP follows the same lifecycle: a validated
//! draft becomes a record with a fresh identifier and timestamps, a patch
//! mutates the supplied fields only, and `updated_at` moves forward on every
//! change. [`Record`] captures that lifecycle so one generic service and one
//! generic repository port can serve all of them.

use chrono::{DateTime, Utc};

use super::ids::RecordId;

/// A stored entity with a typed identifier and server-managed timestamps.
pub trait Record: Clone + Send + Sync + 'static {
    /// Identifier type keying the record.
    type Id: RecordId;
    /// Validated creation input.
    type Draft: Send + 'static;
    /// Partial update input; `None` fields are left untouched.
    type Patch: Send + 'static;

    /// Human readable singular name used in response messages.
    const LABEL: &'static str;

    /// Build a new record from a draft.
    fn create(id: Self::Id, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Apply a partial update and refresh `updated_at`.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Record identifier.
    fn id(&self) -> Self::Id;

    /// Creation timestamp used for stable list ordering.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Overwrite `slot` when a replacement was supplied.
pub(crate) fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Overwrite an optional `slot` when a replacement was supplied.
pub(crate) fn replace_optional<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
