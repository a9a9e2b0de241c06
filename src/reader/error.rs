use crate::{AllocationError, FormatError, RangeError, Truncation};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes into a [`MidiFile`](crate::file::MidiFile)
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// The file layout is wrong
    #[error("Format {0}")]
    Format(#[from] FormatError),
    /// A value is outside its legal range
    #[error("Range {0}")]
    Range(#[from] RangeError),
    /// The input ended early, or an event overran its track
    #[error("Truncated: {0}")]
    Truncated(#[from] Truncation),
    /// The meta event type is not one this reader understands
    #[error("Unknown meta event type 0x{0:02X}")]
    UnknownMetaType(u8),
    /// A buffer could not grow
    #[error("Allocation {0}")]
    Allocation(#[from] AllocationError),
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub fn new(position: usize, kind: impl Into<ReaderErrorKind>) -> Self {
        Self {
            position,
            kind: kind.into(),
        }
    }
    /// True if the input ended early or an event overran its track
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Truncated(_))
    }
    /// True if the error is a layout error
    pub const fn is_format_error(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Format(_))
    }
    /// True if the error is a range error
    pub const fn is_range_error(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Range(_))
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new end of input error
    pub const fn eof(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Truncated(Truncation::EndOfInput),
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
