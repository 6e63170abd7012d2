// sqlx::Error -> AppError mapping

use festival_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information.
///
/// Lock contention is reported as `Conflict` so the ledger can flag the
/// aborted transaction as retryable.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite (extended) result codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "5" | "261" | "517" | "6" | "262" => {
                        // SQLITE_BUSY, BUSY_RECOVERY, BUSY_SNAPSHOT, SQLITE_LOCKED, LOCKED_SHAREDCACHE
                        AppError::Conflict(format!(
                            "Database busy ({}): {}",
                            code_str,
                            db_err.message()
                        ))
                    }
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "787" | "3850" => AppError::Database(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "275" => AppError::Database(format!(
                        "Check constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        sqlx::Error::PoolTimedOut => AppError::Conflict("Connection pool timed out".to_string()),
        _ => {
            // Connection, pool, protocol errors
            AppError::Database(err.to_string())
        }
    }
}
