//! yEnc error types

use thiserror::Error;

/// Broad classification of a [`YencError`]
///
/// Callers that need to react to a class of failure (for example to pick a
/// process exit code) match on this instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Underlying read or write failed
    Io,
    /// Marker lines are missing, repeated, out of order or malformed
    Protocol,
    /// Input was fully consumed but the result disagrees with its metadata
    Validation,
    /// The codec was called with an unusable configuration
    Config,
}

/// yEnc encoding and decoding errors
#[derive(Error, Debug)]
pub enum YencError {
    /// IO error while reading input or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A second =ybegin line was found
    #[error("ybegin marker line found multiple times")]
    DuplicateHeader,

    /// A second =yend line was found
    #[error("yend marker line found multiple times")]
    DuplicateFooter,

    /// A =yend line was found before any =ybegin line
    #[error("yend marker line cannot appear before ybegin marker line")]
    FooterBeforeHeader,

    /// Input ended without a =ybegin line
    #[error("no ybegin marker line found")]
    MissingHeader,

    /// A marker line could not be parsed
    #[error("malformed {tag} marker line: {reason}")]
    MalformedMarker {
        /// Marker tag, e.g. "=ybegin"
        tag: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Input ended after the header without a =yend line
    #[error("no yend marker line found")]
    MissingFooter,

    /// Header and trailer declare different sizes
    #[error("ybegin size [{header}] and yend size [{footer}] do not match")]
    SizeMismatch {
        /// Size from =ybegin
        header: u64,
        /// Size from =yend
        footer: u64,
    },

    /// Number of decoded bytes differs from the declared size
    #[error("read size [{actual}] and stored size [{declared}] do not match")]
    LengthMismatch {
        /// Size from =ybegin
        declared: u64,
        /// Bytes actually decoded
        actual: u64,
    },

    /// CRC32 of the decoded bytes differs from the trailer
    #[error("CRC32 mismatch: expected {expected:08x}, calculated {actual:08x}")]
    CrcMismatch {
        /// CRC32 from =yend
        expected: u32,
        /// CRC32 of the decoded bytes
        actual: u32,
    },

    /// Streaming encode saw input that disagrees with the declared size or CRC32
    #[error(
        "input does not match declared metadata: declared size={declared_size} crc32={declared_crc32:08x}, \
         got size={actual_size} crc32={actual_crc32:08x}"
    )]
    DeclaredMismatch {
        /// Size supplied by the caller
        declared_size: u64,
        /// CRC32 supplied by the caller
        declared_crc32: u32,
        /// Bytes actually read
        actual_size: u64,
        /// CRC32 of the bytes actually read
        actual_crc32: u32,
    },

    /// Line length must be at least one byte
    #[error("Invalid line length: {0} (must be at least 1)")]
    InvalidLineLength(usize),

    /// File name cannot be written into a marker line
    #[error("Invalid file name: {0:?} (must not contain CR, LF or NUL)")]
    InvalidName(String),
}

impl YencError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            YencError::Io(_) => ErrorKind::Io,
            YencError::DuplicateHeader
            | YencError::DuplicateFooter
            | YencError::FooterBeforeHeader
            | YencError::MissingHeader
            | YencError::MalformedMarker { .. } => ErrorKind::Protocol,
            YencError::MissingFooter
            | YencError::SizeMismatch { .. }
            | YencError::LengthMismatch { .. }
            | YencError::CrcMismatch { .. }
            | YencError::DeclaredMismatch { .. } => ErrorKind::Validation,
            YencError::InvalidLineLength(_) | YencError::InvalidName(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn malformed(tag: &'static str, reason: impl Into<String>) -> Self {
        YencError::MalformedMarker {
            tag,
            reason: reason.into(),
        }
    }
}

/// Result type alias using YencError
pub type Result<T> = std::result::Result<T, YencError>;
