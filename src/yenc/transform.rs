//! The yEnc byte transform and critical byte rule
//!
//! Encoding: output = (input + 42) mod 256
//! Critical outputs are written as `=` followed by (output + 64) mod 256.

/// Offset added to every raw byte
pub const OFFSET: u8 = 0x2A;
/// Escape marker
pub const ESCAPE: u8 = 0x3D;
/// Offset added to a critical byte after the escape marker
pub const ESCAPE_OFFSET: u8 = 0x40;

/// Check if a shifted byte must be escaped
pub fn is_critical(byte: u8) -> bool {
    matches!(
        byte,
        0x00 |  // NUL
        0x0A |  // LF
        0x0D |  // CR
        ESCAPE
    )
}

/// Transform one raw byte
///
/// Returns whether the value must be preceded by [`ESCAPE`], and the value.
pub fn encode_byte(raw: u8) -> (bool, u8) {
    let candidate = raw.wrapping_add(OFFSET);
    if is_critical(candidate) {
        (true, candidate.wrapping_add(ESCAPE_OFFSET))
    } else {
        (false, candidate)
    }
}

/// Reverse [`encode_byte`]
pub fn decode_byte(escaped: bool, value: u8) -> u8 {
    if escaped {
        value.wrapping_sub(ESCAPE_OFFSET).wrapping_sub(OFFSET)
    } else {
        value.wrapping_sub(OFFSET)
    }
}

/// Append the encoded form of `raw` to `out`
#[inline]
pub(crate) fn push_encoded(raw: u8, out: &mut Vec<u8>) {
    let (escaped, value) = encode_byte(raw);
    if escaped {
        out.push(ESCAPE);
    }
    out.push(value);
}

/// Stateful reverse transform
///
/// Carries the "escape pending" flag between bytes. Whether it survives a line
/// break is up to the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Unescaper {
    pending: bool,
}

impl Unescaper {
    /// Create an unescaper with no pending escape
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one encoded byte, returning the raw byte if one is produced
    #[inline]
    pub fn feed(&mut self, byte: u8) -> Option<u8> {
        if self.pending {
            self.pending = false;
            Some(decode_byte(true, byte))
        } else if byte == ESCAPE {
            self.pending = true;
            None
        } else {
            Some(decode_byte(false, byte))
        }
    }

    /// Whether the last byte fed was an unconsumed escape marker
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Drop any pending escape
    pub fn reset(&mut self) {
        self.pending = false;
    }
}
