//! Error enum
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Input directory does not exist.
    InputNotFound(PathBuf),
    /// Unusable conversion parameters.
    InvalidConfig(String),
    /// Reading a line of a Bag file failed (e.g. invalid UTF-8).
    Read {
        path: PathBuf,
        line: usize,
        source: std::io::Error,
    },
    /// First two lines of a Bag file (counts and feature names).
    MalformedHeader {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// A document line (or a missing/extra one).
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {}", e),
            Error::InputNotFound(p) => {
                write!(f, "input directory does not exist: {}", p.display())
            }
            Error::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            Error::Read { path, line, source } => write!(
                f,
                "could not read {} (line {}): {}",
                path.display(),
                line,
                source
            ),
            Error::MalformedHeader { path, line, reason } => write!(
                f,
                "malformed header in {} (line {}): {}",
                path.display(),
                line,
                reason
            ),
            Error::MalformedRecord { path, line, reason } => write!(
                f,
                "malformed record in {} (line {}): {}",
                path.display(),
                line,
                reason
            ),
            Error::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) | Error::Read { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}
