//! Error taxonomy for ingestion, queries and storage.
//!
//! Handlers translate these into the JSON error shapes of the HTTP surface; see
//! `handlers::attendance`.

use thiserror::Error;

/// A required check-in field is missing, empty or unparseable. Nothing is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid timestamp '{0}': expected an RFC 3339 or ISO-8601 date-time")]
    InvalidTimestamp(String),
}

/// A malformed query parameter, rejected before the store is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidParameter {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    Date(String),
    #[error("Invalid days '{0}': expected a non-negative integer")]
    Days(String),
    #[error("Invalid days '{0}': window start is out of range")]
    DaysOutOfRange(u32),
    #[error("Invalid target '{0}': expected a positive integer")]
    Target(String),
}

/// The persistence layer could not complete a read or write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameter),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = AttendanceError> = std::result::Result<T, E>;
