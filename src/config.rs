//! Encoder and decoder configuration

use crate::{Result, YencError};

/// Conventional yEnc line length
pub const DEFAULT_LINE_LENGTH: usize = 128;

/// Size and CRC32 of the input, supplied ahead of time
///
/// When the encoder is given these it can write the `=ybegin` header before
/// reading any input, so the input is streamed instead of buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declared {
    /// Number of raw input bytes
    pub size: u64,
    /// IEEE CRC32 of the raw input
    pub crc32: u32,
}

/// Encoder configuration
///
/// # Example
///
/// ```
/// use yenc_rs::EncodeConfig;
///
/// let config = EncodeConfig::new("file.bin").line_length(64);
/// assert_eq!(config.line_length, 64);
/// assert_eq!(config.name, "file.bin");
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodeConfig {
    /// Raw input bytes consumed per payload line (must be at least 1)
    #[cfg_attr(feature = "serde", serde(default = "default_line_length"))]
    pub line_length: usize,

    /// File name written to the `=ybegin` header
    pub name: String,

    /// Precomputed size and CRC32; enables streaming encode
    #[cfg_attr(feature = "serde", serde(default))]
    pub declared: Option<Declared>,
}

#[cfg(feature = "serde")]
fn default_line_length() -> usize {
    DEFAULT_LINE_LENGTH
}

impl EncodeConfig {
    /// Create a configuration with the default line length
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            line_length: DEFAULT_LINE_LENGTH,
            name: name.into(),
            declared: None,
        }
    }

    /// Set the line length
    pub fn line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    /// Check the configuration before any I/O happens
    ///
    /// The line length must be at least 1 and the name must fit on the
    /// `=ybegin` line: no CR, LF or NUL.
    pub fn validate(&self) -> Result<()> {
        if self.line_length == 0 {
            return Err(YencError::InvalidLineLength(self.line_length));
        }
        if self.name.contains(['\r', '\n', '\0']) {
            return Err(YencError::InvalidName(self.name.clone()));
        }
        Ok(())
    }

    /// Supply the input's size and CRC32 up front
    ///
    /// The encoder then streams the input and checks it against these values
    /// once it is exhausted.
    pub fn with_declared(mut self, declared: Declared) -> Self {
        self.declared = Some(declared);
        self
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self::new("")
    }
}

/// What happens to an escape byte that ends a payload line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EscapePolicy {
    /// The escape applies to the first byte of the next payload line.
    ///
    /// CRLF is not part of the payload, so this is what real producers expect.
    #[default]
    PersistAcrossLines,
    /// The dangling escape is dropped at the end of the line.
    ResetPerLine,
}

/// Decoder configuration
///
/// # Example
///
/// ```
/// use yenc_rs::{DecodeConfig, EscapePolicy};
///
/// let config = DecodeConfig::new()
///     .escape_policy(EscapePolicy::ResetPerLine)
///     .verify_crc(false);
/// assert!(!config.verify_crc);
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeConfig {
    /// Escape handling at line boundaries
    #[cfg_attr(feature = "serde", serde(default))]
    pub escape_policy: EscapePolicy,

    /// Compare the CRC32 of the decoded bytes against the `=yend` crc32
    ///
    /// Default: `true`
    #[cfg_attr(feature = "serde", serde(default = "default_verify_crc"))]
    pub verify_crc: bool,
}

#[cfg(feature = "serde")]
fn default_verify_crc() -> bool {
    true
}

impl DecodeConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            escape_policy: EscapePolicy::default(),
            verify_crc: true,
        }
    }

    /// Set the escape policy
    pub fn escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.escape_policy = policy;
        self
    }

    /// Enable or disable CRC32 verification
    pub fn verify_crc(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}
