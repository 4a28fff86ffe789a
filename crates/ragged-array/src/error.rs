use std::error::Error;
use std::fmt;

/// Broad category of a [`RaggedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operation lacks information it structurally needs.
    Configuration,
    /// A structural contract on the data was violated.
    DataInvalid,
    /// An index is out of bounds after normalization.
    Index,
}

/// Error type for ragged array construction, indexing and mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum RaggedError {
    ImproperlyConfigured(String),
    DataInvalid(String),
    RowOutOfBounds { index: isize, rows: usize },
    ColumnOutOfBounds { row: usize, index: isize, len: usize },
    MaskLength { expected: usize, found: usize },
}

impl RaggedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RaggedError::ImproperlyConfigured(_) => ErrorKind::Configuration,
            RaggedError::DataInvalid(_) => ErrorKind::DataInvalid,
            RaggedError::RowOutOfBounds { .. }
            | RaggedError::ColumnOutOfBounds { .. }
            | RaggedError::MaskLength { .. } => ErrorKind::Index,
        }
    }

    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        RaggedError::ImproperlyConfigured(msg.into())
    }

    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        RaggedError::DataInvalid(msg.into())
    }
}

impl fmt::Display for RaggedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RaggedError::ImproperlyConfigured(msg) => write!(f, "improperly configured: {}", msg),
            RaggedError::DataInvalid(msg) => write!(f, "invalid data: {}", msg),
            RaggedError::RowOutOfBounds { index, rows } => write!(
                f,
                "row index {} is out of bounds for array with {} rows",
                index, rows
            ),
            RaggedError::ColumnOutOfBounds { row, index, len } => write!(
                f,
                "column index {} is out of bounds for row {} of length {}",
                index, row, len
            ),
            RaggedError::MaskLength { expected, found } => write!(
                f,
                "boolean mask of length {} does not match {} rows",
                found, expected
            ),
        }
    }
}

impl Error for RaggedError {}

pub type Result<T> = std::result::Result<T, RaggedError>;
