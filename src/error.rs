//! Error types for every fallible operation of the engine.

use std::path::PathBuf;

/// What went wrong while loading or querying debug information.
///
/// Parse failures are scoped to the operation that hit them: a `BadData`
/// from one query leaves the already loaded model usable.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed input: truncated record, bounds overflow, inconsistent
    /// abbreviation, value out of range for its field.
    #[error("malformed debug information: {0}")]
    BadData(String),

    /// Well-formed input using a feature outside the supported envelope
    /// (DWARF version, address size, augmentation, ...).
    #[error("unsupported debug information: {0}")]
    Unsupported(String),

    /// A lookup found nothing: unresolved reference, no covering FDE or
    /// line row, missing section.
    #[error("entry not found")]
    EntryNotFound,

    /// The separate debug-info companion named by `.gnu_debuglink` was not
    /// found in any of the well-known places. The caller may locate the
    /// named file itself and retry the load with an explicit path.
    #[error("missing debug info file {0:?}")]
    MissingDebugInfoFile(PathBuf),

    /// An allocation or the underlying OS failed us.
    #[error("out of memory")]
    NoMemory,

    /// Sizes or lengths in serialized data disagree with each other.
    #[error("mismatched values in serialized data")]
    MismatchedValues,

    /// An argument the caller passed made no sense (invalid location
    /// description, undefined CFA rule, empty expression where one is
    /// required).
    #[error("bad value: {0}")]
    BadValue(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Clone for Error {
    fn clone(&self) -> Error {
        match self {
            Error::BadData(message) => Error::BadData(message.clone()),
            Error::Unsupported(message) => Error::Unsupported(message.clone()),
            Error::EntryNotFound => Error::EntryNotFound,
            Error::MissingDebugInfoFile(path) => Error::MissingDebugInfoFile(path.clone()),
            Error::NoMemory => Error::NoMemory,
            Error::MismatchedValues => Error::MismatchedValues,
            Error::BadValue(message) => Error::BadValue(message.clone()),
            Error::Io(error) => Error::Io(std::io::Error::new(error.kind(), error.to_string())),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Shorthand for the `BadData` constructor; most parse paths produce their
/// message with `format!` anyway.
pub(crate) fn bad_data(message: impl Into<String>) -> Error {
    Error::BadData(message.into())
}

pub(crate) fn unsupported(message: impl Into<String>) -> Error {
    Error::Unsupported(message.into())
}
