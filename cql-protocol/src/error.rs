use crate::types::{CInt, CIntShort};
use std::fmt::Display;
use std::io;
use std::result;
use std::str::Utf8Error;
use std::string::FromUtf8Error;
use thiserror::Error as ThisError;
use uuid::Error as UuidError;

pub type Result<T> = result::Result<T, Error>;

/// Error type shared by the protocol types and the execution core. Errors are either returned by
/// the server (`Server`), raised while talking to a node (`Io`, `Timeout`, `Protocol`), or raised
/// by the driver itself while validating or decoding (`TooManyStatements`, `ColumnCountMismatch`,
/// `Unmarshal`).
#[derive(Debug, ThisError)]
pub enum Error {
    /// Internal IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Internal error that may be raised during `uuid::Uuid::from_slice`
    #[error("Uuid parse error: {0}")]
    UuidParse(#[from] UuidError),
    /// General error
    #[error("General error: {0}")]
    General(String),
    /// Internal error that may be raised during `String::from_utf8`
    #[error("FromUtf8 error: {0}")]
    FromUtf8(#[from] FromUtf8Error),
    /// Internal error that may be raised during `str::from_utf8`
    #[error("Utf8 error: {0}")]
    Utf8(#[from] Utf8Error),
    /// Query returned no rows where one was required.
    #[error("not found")]
    NotFound,
    /// No connection could be obtained from the pool.
    #[error("unavailable")]
    Unavailable,
    /// The peer violated the protocol.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The requested feature is not supported by the server or the protocol version in use.
    #[error("feature not supported: {0}")]
    Unsupported(String),
    /// A batch exceeded the maximum number of statements.
    #[error("too many statements in batch: {0} (max 65536)")]
    TooManyStatements(usize),
    /// Error reported by the server.
    #[error("Server error {code:#06x}: {message}")]
    Server { code: CInt, message: String },
    /// Timed out waiting for an operation to complete.
    #[error("Timeout: {0}")]
    Timeout(String),
    /// Number of scan destinations does not match the number of returned columns.
    #[error("count mismatch: expected {expected} columns, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
    /// A column could not be converted into the requested type.
    #[error("can not unmarshal column {column}: {reason}")]
    Unmarshal { column: String, reason: String },
    /// A null column was scanned into a destination which cannot represent null.
    #[error("column {0} is null")]
    UnexpectedNull(String),
    /// Unknown consistency.
    #[error("Unknown consistency: {0}")]
    UnknownConsistency(CIntShort),
    /// Unexpected column type.
    #[error("Unexpected column type: {0}")]
    UnexpectedColumnType(CIntShort),
    /// Unknown server event.
    #[error("Unknown server event: {0}")]
    UnknownServerEvent(String),
    /// Unexpected topology change event type.
    #[error("Unexpected topology change type: {0}")]
    UnexpectedTopologyChangeType(String),
    /// Unexpected status change event type.
    #[error("Unexpected status change type: {0}")]
    UnexpectedStatusChangeType(String),
    /// Unexpected schema change event type.
    #[error("Unexpected schema change type: {0}")]
    UnexpectedSchemaChangeType(String),
    /// Unexpected schema change event target.
    #[error("Unexpected schema change target: {0}")]
    UnexpectedSchemaChangeTarget(String),
}

pub fn column_is_empty_err<T: Display>(column_name: T) -> Error {
    Error::UnexpectedNull(column_name.to_string())
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::General(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error::General(err.to_string())
    }
}

impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::Io(error) => Error::Io(io::Error::new(
                error.kind(),
                error
                    .get_ref()
                    .map(|error| error.to_string())
                    .unwrap_or_default(),
            )),
            Error::UuidParse(error) => Error::UuidParse(error.clone()),
            Error::General(error) => Error::General(error.clone()),
            Error::FromUtf8(error) => Error::FromUtf8(error.clone()),
            Error::Utf8(error) => Error::Utf8(*error),
            Error::NotFound => Error::NotFound,
            Error::Unavailable => Error::Unavailable,
            Error::Protocol(error) => Error::Protocol(error.clone()),
            Error::Unsupported(error) => Error::Unsupported(error.clone()),
            Error::TooManyStatements(count) => Error::TooManyStatements(*count),
            Error::Server { code, message } => Error::Server {
                code: *code,
                message: message.clone(),
            },
            Error::Timeout(error) => Error::Timeout(error.clone()),
            Error::ColumnCountMismatch { expected, actual } => Error::ColumnCountMismatch {
                expected: *expected,
                actual: *actual,
            },
            Error::Unmarshal { column, reason } => Error::Unmarshal {
                column: column.clone(),
                reason: reason.clone(),
            },
            Error::UnexpectedNull(column) => Error::UnexpectedNull(column.clone()),
            Error::UnknownConsistency(value) => Error::UnknownConsistency(*value),
            Error::UnexpectedColumnType(value) => Error::UnexpectedColumnType(*value),
            Error::UnknownServerEvent(value) => Error::UnknownServerEvent(value.clone()),
            Error::UnexpectedTopologyChangeType(value) => {
                Error::UnexpectedTopologyChangeType(value.clone())
            }
            Error::UnexpectedStatusChangeType(value) => {
                Error::UnexpectedStatusChangeType(value.clone())
            }
            Error::UnexpectedSchemaChangeType(value) => {
                Error::UnexpectedSchemaChangeType(value.clone())
            }
            Error::UnexpectedSchemaChangeTarget(value) => {
                Error::UnexpectedSchemaChangeTarget(value.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_clone_io_error_with_message() {
        let error = Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset"));
        match error.clone() {
            Error::Io(cloned) => {
                assert_eq!(cloned.kind(), io::ErrorKind::BrokenPipe);
                assert_eq!(cloned.to_string(), "connection reset");
            }
            other => panic!("unexpected clone: {other:?}"),
        }
    }

    #[test]
    fn should_format_server_error() {
        let error = Error::Server {
            code: 0x1000,
            message: "Cannot achieve consistency level QUORUM".into(),
        };
        assert_eq!(
            error.to_string(),
            "Server error 0x1000: Cannot achieve consistency level QUORUM"
        );
    }
}
