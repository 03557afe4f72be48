use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArenaError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

impl From<sqlx::Error> for ArenaError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            let target = db_err.constraint().unwrap_or("unique constraint");
            return ArenaError::Conflict(format!("duplicate value for {target}"));
        }
        ArenaError::Database(err)
    }
}

impl From<sqlx::migrate::MigrateError> for ArenaError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        ArenaError::Internal(format!("Migration failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ArenaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_stays_a_database_error() {
        let err: ArenaError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ArenaError::Database(_)));
    }

    #[test]
    fn messages_carry_context() {
        let err = ArenaError::not_found("restaurantes 7");
        assert_eq!(err.to_string(), "Not found: restaurantes 7");
    }
}
