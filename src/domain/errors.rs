use thiserror::Error;

/// Errors raised by census services and repositories
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CensusResult<T> = Result<T, CensusError>;

impl CensusError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Classifies a database error by its constraint violation, if any
    ///
    /// # Arguments
    /// * `err` - The sqlx error returned by the driver
    /// * `subject` - What was being written, used in the message (e.g. "Municipality 'Saltillo'")
    pub fn from_database(err: sqlx::Error, subject: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::Conflict(format!("{} already exists", subject));
            }
            if db.is_foreign_key_violation() {
                return Self::NotFound(format!(
                    "{} references a record that does not exist",
                    subject
                ));
            }
            if db.is_check_violation() {
                return Self::Validation(format!("{} violates a data constraint", subject));
            }
        }
        Self::Database(err)
    }
}

impl From<sqlx::Error> for CensusError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_database(err, "Record")
    }
}
