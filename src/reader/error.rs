use std::io;

use crate::{FileError, HeaderError, TrackError};
use thiserror::Error;

#[doc = r#"
An error raised while reading a MIDI file, with the byte offset at which it
was detected
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// The bytes are not a valid file
    #[error("Parsing {0}")]
    File(#[from] FileError),
    /// The source could not be read
    #[error("IO: {0}")]
    Io(io::ErrorKind),
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create a new file format error
    pub fn file(position: usize, error: impl Into<FileError>) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::File(error.into()),
        }
    }

    /// Create a new IO error
    pub const fn io(position: usize, kind: io::ErrorKind) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Io(kind),
        }
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The file format error, if that is what this is
    pub fn file_error(&self) -> Option<&FileError> {
        match &self.kind {
            ReaderErrorKind::File(e) => Some(e),
            ReaderErrorKind::Io(_) => None,
        }
    }

    /// True for missing or garbled `MThd`
    pub fn is_malformed_header(&self) -> bool {
        self.file_error().is_some_and(FileError::is_malformed_header)
    }

    /// True for missing `MTrk` or a truncated track
    pub fn is_malformed_track(&self) -> bool {
        self.file_error().is_some_and(FileError::is_malformed_track)
    }
}

impl From<HeaderError> for ReaderErrorKind {
    fn from(value: HeaderError) -> Self {
        Self::File(value.into())
    }
}

impl From<TrackError> for ReaderErrorKind {
    fn from(value: TrackError) -> Self {
        Self::File(value.into())
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
