//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod cases;
pub mod dental_records;
pub mod error;
pub mod evidence;
pub mod health;
pub mod report_generation;
pub mod reports;
pub mod schemas;
pub mod state;
pub mod upload;
pub mod users;
pub mod validation;

pub use error::{ApiResult, ErrorBody};
