use std::error;
use std::fmt;
use std::io;


/// Errors raised while reading or validating codec headers and footers
#[derive(Debug)]
pub enum CodecError {
    Io(io::Error),

    /// The file's contents don't match what the codec expects
    CorruptIndex {
        resource: String,
        message: String,
    },

    /// The file was written with a version that's no longer supported
    IndexFormatTooOld {
        resource: String,
        version: i32,
        min: i32,
    },

    /// The file was written by a newer version of the codec
    IndexFormatTooNew {
        resource: String,
        version: i32,
        max: i32,
    },
}


impl CodecError {
    pub fn corrupt<R: Into<String>, M: Into<String>>(resource: R, message: M) -> CodecError {
        CodecError::CorruptIndex {
            resource: resource.into(),
            message: message.into(),
        }
    }
}


impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CodecError::Io(ref e) => write!(f, "io error: {}", e),
            CodecError::CorruptIndex { ref resource, ref message } => {
                write!(f, "{} (resource={})", message, resource)
            }
            CodecError::IndexFormatTooOld { ref resource, version, min } => {
                write!(f, "format version {} is too old for {} (minimum is {})", version, resource, min)
            }
            CodecError::IndexFormatTooNew { ref resource, version, max } => {
                write!(f, "format version {} is too new for {} (maximum is {})", version, resource, max)
            }
        }
    }
}


impl error::Error for CodecError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            CodecError::Io(ref e) => Some(e),
            _ => None,
        }
    }
}


impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> CodecError {
        CodecError::Io(e)
    }
}
