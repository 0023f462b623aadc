use async_graphql::{Enum, ErrorExtensions};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Insufficient Stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Database Error: {0}")]
    DatabaseError(#[from] DbError),
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection Error: {0}")]
    ConnectionError(String),

    #[error("Query Error: {0}")]
    QueryBuilderError(String),

    #[error("Insertion Error: {0}")]
    InsertionError(String),

    #[error("Updation Error: {0}")]
    UpdationError(String),

    #[error("Migration Error: {0}")]
    MigrationError(String),
}

/// Failure category reported to GraphQL clients alongside `success = false`.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailure,
    NotFound,
    InsufficientStock,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ValidationFailure => "VALIDATION_FAILURE",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl CrmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrmError::ValidationError(_) => ErrorKind::ValidationFailure,
            CrmError::NotFound(_) => ErrorKind::NotFound,
            CrmError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CrmError::DatabaseError(_) => ErrorKind::Internal,
        }
    }
}

// Needed by `AsyncConnection::transaction`, which requires `E: From<diesel::result::Error>`.
impl From<DieselError> for CrmError {
    fn from(err: DieselError) -> Self {
        classify(err, DbError::QueryBuilderError)
    }
}

impl CrmError {
    /// Maps a failed `INSERT`; unexpected failures become [`DbError::InsertionError`].
    pub fn insertion(err: DieselError) -> Self {
        classify(err, DbError::InsertionError)
    }

    /// Maps a failed `UPDATE`; unexpected failures become [`DbError::UpdationError`].
    pub fn updation(err: DieselError) -> Self {
        classify(err, DbError::UpdationError)
    }
}

fn classify(err: DieselError, unexpected: fn(String) -> DbError) -> CrmError {
    match err {
        DieselError::NotFound => CrmError::NotFound("Record not found".to_string()),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            CrmError::ValidationError(match info.constraint_name() {
                Some("users_email_key") => "Email already exists".to_string(),
                Some("users_username_key") => "Username already exists".to_string(),
                _ => info.message().to_string(),
            })
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            CrmError::ValidationError(info.message().to_string())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            CrmError::NotFound(info.message().to_string())
        }
        other => CrmError::DatabaseError(unexpected(other.to_string())),
    }
}

impl ErrorExtensions for CrmError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.kind().code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}
