//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process repositories for tests and database-less runs
//! - **storage**: evidence files on the local filesystem
//! - **gemini**: report drafting through the Gemini REST API
//! - **credentials**: Argon2 password hashing and JWT bearer tokens
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod credentials;
pub mod gemini;
pub mod memory;
pub mod persistence;
pub mod storage;
