//! Error types for the finance tracker.
//!
//! Internally, modules use `anyhow` through the `Res` alias and attach context as errors bubble
//! up. At public boundaries an error is classified with an `ErrorType` by calling `pub_result`,
//! so that callers (the view-models and the CLI) can tell a validation problem, which is shown
//! to the user and never reaches the database, from a storage failure.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type used by modules that do not sit on a public boundary.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The classification of an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// User input was rejected: a blank required field, a bad amount or an unknown category.
    Validation,
    /// The database could not be opened or reached.
    StorageUnavailable,
    /// The database was reachable but a statement failed.
    Storage,
    /// The data directory or its configuration file is missing or invalid.
    Config,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type. It wraps an `anyhow::Error`, which carries the message and context
/// chain, along with the `ErrorType`.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Creates a `Validation` error from a message that can be shown to the user as-is.
    pub(crate) fn validation(message: impl Display + Send + Sync + 'static) -> Self {
        Self::new(ErrorType::Validation, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn is_validation(&self) -> bool {
        self.error_type == ErrorType::Validation
    }

    pub fn is_storage(&self) -> bool {
        matches!(
            self.error_type,
            ErrorType::Storage | ErrorType::StorageUnavailable
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The alternate form prints the whole context chain on one line.
        write!(f, "{:#}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {}

/// Converts any result into the public `Result`, classifying the error with `error_type`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
