//! Repository layer for database operations

pub mod acquisitions;
pub mod checkouts;
pub mod equipment;
pub mod issues;
pub mod memory;
pub mod notifications;
pub mod providers;
pub mod rooms;
pub mod store;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

pub use memory::MemoryStore;
pub use store::LifecycleStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Explain why a versioned update matched no row: the row is gone, or
    /// someone else updated it first.
    pub(crate) async fn stale_or_missing(&self, table: &str, label: &str, id: i32) -> AppError {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
        match sqlx::query_scalar::<_, bool>(&query).bind(id).fetch_one(&self.pool).await {
            Ok(true) => AppError::Conflict(format!("{} {} was modified concurrently", label, id)),
            Ok(false) => AppError::NotFound(format!("{} {} not found", label, id)),
            Err(e) => AppError::Database(e),
        }
    }
}

/// Map a foreign-key violation on delete to a conflict; other errors pass through
pub(crate) fn in_use(error: sqlx::Error, what: String) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::Conflict(format!("{} is still referenced and cannot be deleted", what))
        }
        _ => AppError::Database(error),
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct PgViolation(ErrorKind);

    impl fmt::Display for PgViolation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violated")
        }
    }

    impl StdError for PgViolation {}

    impl DatabaseError for PgViolation {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            match self.0 {
                ErrorKind::ForeignKeyViolation => Some(Cow::Borrowed("23503")),
                _ => Some(Cow::Borrowed("23514")),
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::CheckViolation,
            }
        }
    }

    #[test]
    fn referenced_row_is_a_conflict() {
        let error = sqlx::Error::Database(Box::new(PgViolation(ErrorKind::ForeignKeyViolation)));
        let mapped = in_use(error, "Equipment 3".to_string());
        assert!(matches!(mapped, AppError::Conflict(msg) if msg.contains("Equipment 3")));
    }

    #[test]
    fn other_database_errors_pass_through() {
        let error = sqlx::Error::Database(Box::new(PgViolation(ErrorKind::CheckViolation)));
        assert!(matches!(in_use(error, "Equipment 3".to_string()), AppError::Database(_)));
        assert!(matches!(
            in_use(sqlx::Error::PoolTimedOut, "Equipment 3".to_string()),
            AppError::Database(_)
        ));
    }
}
