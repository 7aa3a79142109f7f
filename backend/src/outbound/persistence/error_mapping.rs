//! Translation of pool and Diesel failures into [`RepositoryError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Map pool checkout and build failures to connection errors.
pub(super) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors, surfacing unique violations as conflicts.
pub(super) fn map_diesel_error(error: DieselError) -> RepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => RepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => RepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique constraint");
            RepositoryError::conflict(format!("duplicate value violates {constraint}"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        _ => RepositoryError::query("database error"),
    }
}

/// Stored text that no longer parses into a domain value.
pub(super) fn corrupt_column(column: &str, value: &str) -> RepositoryError {
    RepositoryError::query(format!("unrecognised {column} value '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PoolError::checkout("timed out"))]
    #[case(PoolError::build("bad url"))]
    fn pool_errors_are_connection_errors(#[case] error: PoolError) {
        assert!(matches!(
            map_pool_error(error),
            RepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert!(matches!(
            map_diesel_error(DieselError::NotFound),
            RepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn corrupt_column_names_the_value() {
        let err = corrupt_column("role", "wizard");
        assert!(err.to_string().contains("role value 'wizard'"));
    }
}
