//! Driven ports for the hexagonal boundary.
//!
//! Outbound adapters (Diesel, in-memory, local disk, Gemini, Argon2, JWT)
//! implement these traits; services depend only on them.

mod macros;
pub(crate) use macros::define_port_error;

mod credentials;
mod file_storage;
mod record_repository;
mod text_generator;

pub use credentials::{
    IssuedToken, PasswordHashError, PasswordHasher, Principal, TokenError, TokenService,
};
#[cfg(test)]
pub use file_storage::MockFileStorage;
pub use file_storage::{FileStorage, FileStorageError, IncomingFile, StoredFile};
pub use record_repository::{
    EvidenceRepository, RecordRepository, ReportRepository, RepositoryError, UserRepository,
};
#[cfg(test)]
pub use text_generator::MockTextGenerator;
pub use text_generator::{TextGenerationError, TextGenerator};
