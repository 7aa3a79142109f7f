//! Strongly typed record identifiers.
//!
//! Every stored record is keyed by a server-generated UUID v4. Each entity
//! gets its own newtype so a case id cannot be passed where an evidence id
//! is expected.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use uuid::Uuid;

/// Validation error raised when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a valid UUID: {value}")]
pub struct IdParseError {
    value: String,
}

impl IdParseError {
    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Behaviour shared by every record identifier.
pub trait RecordId:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Wrap an existing UUID.
    fn from_uuid(uuid: Uuid) -> Self;

    /// Borrow the inner UUID.
    fn as_uuid(&self) -> &Uuid;
}

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier from its hyphenated text form.
            pub fn parse(raw: &str) -> Result<Self, IdParseError> {
                Uuid::parse_str(raw.trim()).map(Self).map_err(|_| IdParseError {
                    value: raw.to_owned(),
                })
            }
        }

        impl RecordId for $name {
            fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_record_id! {
    /// Identifier of a [`crate::domain::User`].
    UserId
}

define_record_id! {
    /// Identifier of a [`crate::domain::Case`].
    CaseId
}

define_record_id! {
    /// Identifier of an [`crate::domain::Evidence`] item.
    EvidenceId
}

define_record_id! {
    /// Identifier of a [`crate::domain::Report`].
    ReportId
}

define_record_id! {
    /// Identifier of a [`crate::domain::DentalRecord`].
    DentalRecordId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case("  3fa85f64-5717-4562-b3fc-2c963f66afa6 ")]
    fn parses_hyphenated_uuids(#[case] raw: &str) {
        let id = CaseId::parse(raw).expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case("507f1f77bcf86cd799439011")]
    fn rejects_malformed_identifiers(#[case] raw: &str) {
        let err = EvidenceId::parse(raw).expect_err("malformed id");
        assert_eq!(err.value(), raw);
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(UserId::random(), UserId::random());
    }
}
