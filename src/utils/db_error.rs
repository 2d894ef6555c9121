//! Translation of SQLx errors into [`StoreError`].

use crate::domain::errors::StoreError;

/// Maps a SQLx error, recognising unique violations by constraint name.
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        return StoreError::UniqueViolation {
            constraint: db_err.constraint().unwrap_or("unknown").to_string(),
        };
    }

    match e {
        sqlx::Error::PoolTimedOut => StoreError::Timeout,
        other => StoreError::Database(other.to_string()),
    }
}
