/// yEnc header from =ybegin line
#[derive(Debug, Clone, PartialEq)]
pub struct YencHeader {
    /// Line length (raw bytes per payload line, typically 128)
    pub line: usize,
    /// Total file size in bytes
    pub size: u64,
    /// Original filename
    pub name: String,
}

/// yEnc part header from =ypart line
///
/// Only parsed for completeness; multi-part transfers are not assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct YencPart {
    /// Byte offset where this part begins in the original file
    pub begin: u64,
    /// Byte offset where this part ends in the original file
    pub end: u64,
}

/// yEnc trailer from =yend line
#[derive(Debug, Clone, PartialEq)]
pub struct YencEnd {
    /// Size of decoded data in bytes
    pub size: u64,
    /// CRC32 of the decoded data, if the producer wrote one
    pub crc32: Option<u32>,
}

/// Result of a successful encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Raw bytes consumed
    pub size: u64,
    /// Payload lines written (header and trailer not counted)
    pub lines: u64,
    /// CRC32 of the raw input
    pub crc32: u32,
}

/// Result of a successful decode
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeSummary {
    /// Parsed header information
    pub header: YencHeader,
    /// Trailer information
    pub trailer: YencEnd,
    /// Bytes written to the output
    pub decoded_size: u64,
    /// Calculated CRC32 of decoded data
    pub crc32: u32,
}

impl DecodeSummary {
    /// Verify CRC32 matches expected value
    ///
    /// Returns `false` when the trailer carries no CRC32.
    pub fn verify_crc32(&self) -> bool {
        self.trailer.crc32 == Some(self.crc32)
    }
}
