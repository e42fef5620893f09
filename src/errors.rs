use std::error;
use std::fmt;
use std::io;

use kite::{CodecError, DocValuesType};


/// Which limit a field went over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    /// Number of documents or ordinals in a single numeric column
    Values,

    /// Total length of a binary column's payload
    TotalBytes,
}


#[derive(Debug, Clone, PartialEq)]
pub struct OverflowError {
    pub field: String,
    pub kind: LimitKind,
    pub limit: u64,
}


impl fmt::Display for OverflowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            LimitKind::Values => {
                write!(f, "DocValuesField \"{}\" is too large, must be < {} values/total ords", self.field, self.limit)
            }
            LimitKind::TotalBytes => {
                write!(f, "DocValuesField \"{}\" is too large, cannot have more than {} bytes", self.field, self.limit)
            }
        }
    }
}


#[derive(Debug)]
pub enum DocValuesError {
    Io(io::Error),
    Codec(CodecError),

    /// A field had too many values or bytes to be encoded
    Overflow(OverflowError),

    /// The field was already added to this segment
    DuplicateField {
        field: String,
        number: u32,
    },

    /// The field was added or requested as a different kind of doc values
    UnexpectedType {
        field: String,
        expected: DocValuesType,
        actual: DocValuesType,
    },

    /// No doc values were written for this field
    UnknownField(String),

    /// An earlier error left the writer's files in an unknown state
    Aborted,

    /// The writer has already been closed
    Closed,
}


impl DocValuesError {
    pub fn overflow(field: &str, kind: LimitKind, limit: u64) -> DocValuesError {
        DocValuesError::Overflow(OverflowError {
            field: field.to_string(),
            kind: kind,
            limit: limit,
        })
    }
}


impl fmt::Display for DocValuesError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DocValuesError::Io(ref e) => write!(f, "io error: {}", e),
            DocValuesError::Codec(ref e) => write!(f, "{}", e),
            DocValuesError::Overflow(ref e) => write!(f, "{}", e),
            DocValuesError::DuplicateField { ref field, number } => {
                write!(f, "doc values for field \"{}\" (number {}) were already written", field, number)
            }
            DocValuesError::UnexpectedType { ref field, expected, actual } => {
                write!(f, "field \"{}\" has doc values type {}, expected {}", field, actual, expected)
            }
            DocValuesError::UnknownField(ref field) => write!(f, "no doc values for field \"{}\"", field),
            DocValuesError::Aborted => write!(f, "doc values writer was aborted by an earlier error"),
            DocValuesError::Closed => write!(f, "doc values writer is closed"),
        }
    }
}


impl error::Error for DocValuesError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            DocValuesError::Io(ref e) => Some(e),
            DocValuesError::Codec(ref e) => Some(e),
            _ => None,
        }
    }
}


impl From<io::Error> for DocValuesError {
    fn from(e: io::Error) -> DocValuesError {
        DocValuesError::Io(e)
    }
}


impl From<CodecError> for DocValuesError {
    fn from(e: CodecError) -> DocValuesError {
        DocValuesError::Codec(e)
    }
}


impl From<OverflowError> for DocValuesError {
    fn from(e: OverflowError) -> DocValuesError {
        DocValuesError::Overflow(e)
    }
}


pub type Result<T> = ::std::result::Result<T, DocValuesError>;
