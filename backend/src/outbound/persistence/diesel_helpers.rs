//! Classification of Diesel failures shared by the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Repository-neutral view of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// Any other query failure.
    Query(String),
}

/// Classify `error`, logging the raw cause at debug level.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => {
                    DieselFailure::Connection("database connection closed".to_owned())
                }
                DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                },
                _ => DieselFailure::Query(format!("{operation}: database error")),
            }
        }
        DieselError::NotFound => DieselFailure::Query(format!("{operation}: record not found")),
        other => {
            let message = other.to_string();
            debug!(%message, %operation, "diesel operation failed");
            DieselFailure::Query(format!("{operation}: {message}"))
        }
    }
}
