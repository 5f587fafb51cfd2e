//! Error types for the chat store
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::DbErr;

/// Errors while executing chat store operations.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbError::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbError::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: StoreErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum StoreErrorKind {
    // Record not found
    RecordNotFound,
    // Input failed validation, e.g. an empty message body
    ValidationError,
    // Errors related to interactions with the database itself. Ex DbError::Conn
    SystemError,
    // Other errors
    Other,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Chat Store Error: {:?}", self)
    }
}

impl StdError for Error {}

impl From<StoreErrorKind> for Error {
    fn from(error_kind: StoreErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => Error {
                source: Some(err),
                error_kind: StoreErrorKind::RecordNotFound,
            },
            DbErr::ConnectionAcquire(_) => Error {
                source: Some(err),
                error_kind: StoreErrorKind::SystemError,
            },
            DbErr::Conn(_) => Error {
                source: Some(err),
                error_kind: StoreErrorKind::SystemError,
            },
            DbErr::Exec(_) => Error {
                source: Some(err),
                error_kind: StoreErrorKind::SystemError,
            },
            DbErr::Query(_) => Error {
                source: Some(err),
                error_kind: StoreErrorKind::SystemError,
            },
            _ => Error {
                source: Some(err),
                error_kind: StoreErrorKind::Other,
            },
        }
    }
}
