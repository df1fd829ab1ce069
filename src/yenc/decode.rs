use crate::config::{DecodeConfig, EscapePolicy};
use crate::{Result, YencError};
use crc32fast::Hasher;
use std::io::{BufRead, Write};
use tracing::{debug, trace, warn};

use super::marker::{MarkerTag, parse_ybegin, parse_yend, parse_ypart};
use super::transform::Unescaper;
use super::types::{DecodeSummary, YencEnd, YencHeader};

/// Decode yEnc encoded text
///
/// Lines before `=ybegin` and after `=yend` are ignored. Decoded bytes are
/// written to `output` as each payload line is read and `output` is flushed
/// before returning, so a failed decode still leaves whatever was decoded.
///
/// Once the input is exhausted the header size, trailer size, decoded length
/// and (when present) trailer CRC32 are checked against each other.
///
/// # Example
/// ```
/// let encoded = b"=ybegin line=128 size=1 name=a\r\n=@\r\n=yend size=1 crc32=bdb2986c\r\n";
/// let mut decoded = Vec::new();
/// let summary = yenc_rs::decode(&mut decoded, &encoded[..])?;
/// assert_eq!(decoded, [0xD6]);
/// assert_eq!(summary.header.name, "a");
/// # Ok::<(), yenc_rs::YencError>(())
/// ```
pub fn decode<W, R>(output: &mut W, input: R) -> Result<DecodeSummary>
where
    W: Write + ?Sized,
    R: BufRead,
{
    decode_with(output, input, &DecodeConfig::default())
}

/// Decode yEnc encoded text using `config`
pub fn decode_with<W, R>(output: &mut W, input: R, config: &DecodeConfig) -> Result<DecodeSummary>
where
    W: Write + ?Sized,
    R: BufRead,
{
    let mut session = Session::new(output, config);
    let outcome = session.run(input);

    // Best effort, then verify: keep what was decoded even on failure
    let flushed = session.output.flush();
    outcome?;
    flushed?;

    session.finish()
}

/// Decode an in-memory buffer into a new `Vec`
///
/// The decoded bytes are lost on error; use [`decode`] with your own writer
/// to keep partial output.
pub fn decode_slice(input: &[u8]) -> Result<(Vec<u8>, DecodeSummary)> {
    let mut output = Vec::with_capacity(input.len());
    let summary = decode(&mut output, input)?;
    Ok((output, summary))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    InPayload,
    AfterFooter,
}

/// Per-invocation decoder state
struct Session<'a, W: ?Sized> {
    output: &'a mut W,
    config: &'a DecodeConfig,
    state: State,
    header: Option<YencHeader>,
    trailer: Option<YencEnd>,
    unescaper: Unescaper,
    hasher: Hasher,
    decoded: u64,
    ignored: u64,
    scratch: Vec<u8>,
}

impl<'a, W: Write + ?Sized> Session<'a, W> {
    fn new(output: &'a mut W, config: &'a DecodeConfig) -> Self {
        Self {
            output,
            config,
            state: State::AwaitingHeader,
            header: None,
            trailer: None,
            unescaper: Unescaper::new(),
            hasher: Hasher::new(),
            decoded: 0,
            ignored: 0,
            scratch: Vec::new(),
        }
    }

    fn run<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            self.process_line(trim_line_ending(&line))?;
        }
    }

    fn process_line(&mut self, line: &[u8]) -> Result<()> {
        match (self.state, MarkerTag::detect(line)) {
            (State::AwaitingHeader, Some(MarkerTag::Begin)) => {
                let header = parse_ybegin(&String::from_utf8_lossy(line))?;
                debug!(
                    "Found yEnc header for {} ({} bytes, line={}) after {} ignored lines",
                    header.name, header.size, header.line, self.ignored
                );
                self.header = Some(header);
                self.state = State::InPayload;
            }
            (State::AwaitingHeader, Some(MarkerTag::End)) => {
                return Err(YencError::FooterBeforeHeader);
            }
            (State::AwaitingHeader, _) => self.ignored += 1,
            (State::InPayload | State::AfterFooter, Some(MarkerTag::Begin)) => {
                return Err(YencError::DuplicateHeader);
            }
            (State::InPayload, Some(MarkerTag::Part)) => {
                // Multi-part transfers are not assembled; the range is informational only
                match parse_ypart(&String::from_utf8_lossy(line)) {
                    Ok(part) => warn!(
                        "Ignoring =ypart line (begin={}, end={}); multi-part is not supported",
                        part.begin, part.end
                    ),
                    Err(e) => warn!("Ignoring unparseable =ypart line: {}", e),
                }
            }
            (State::InPayload, Some(MarkerTag::End)) => {
                let trailer = parse_yend(&String::from_utf8_lossy(line))?;
                if self.unescaper.is_pending() {
                    warn!("Payload ended with a dangling escape byte");
                    self.unescaper.reset();
                }
                trace!("Found yEnc trailer (size={})", trailer.size);
                self.trailer = Some(trailer);
                self.state = State::AfterFooter;
            }
            (State::InPayload, None) => self.decode_payload(line)?,
            (State::AfterFooter, Some(MarkerTag::End)) => {
                return Err(YencError::DuplicateFooter);
            }
            (State::AfterFooter, _) => self.ignored += 1,
        }
        Ok(())
    }

    /// Decode a single yEnc encoded line
    ///
    /// yEnc decoding: output = (input - 42) mod 256
    /// Escape sequences: =X means (X - 64 - 42) mod 256
    fn decode_payload(&mut self, line: &[u8]) -> Result<()> {
        self.scratch.clear();
        for &byte in line {
            if let Some(raw) = self.unescaper.feed(byte) {
                self.scratch.push(raw);
            }
        }

        if self.config.escape_policy == EscapePolicy::ResetPerLine && self.unescaper.is_pending() {
            warn!("Dropping escape byte at end of payload line");
            self.unescaper.reset();
        }

        self.output.write_all(&self.scratch)?;
        self.hasher.update(&self.scratch);
        self.decoded += self.scratch.len() as u64;
        Ok(())
    }

    fn finish(self) -> Result<DecodeSummary> {
        let header = self.header.ok_or(YencError::MissingHeader)?;
        let trailer = self.trailer.ok_or(YencError::MissingFooter)?;

        if header.size != trailer.size {
            return Err(YencError::SizeMismatch {
                header: header.size,
                footer: trailer.size,
            });
        }

        if header.size != self.decoded {
            return Err(YencError::LengthMismatch {
                declared: header.size,
                actual: self.decoded,
            });
        }

        let crc32 = self.hasher.finalize();
        if self.config.verify_crc
            && let Some(expected) = trailer.crc32
            && expected != crc32
        {
            return Err(YencError::CrcMismatch {
                expected,
                actual: crc32,
            });
        }

        debug!(
            "Decoded {} ({} bytes, crc32={:08x}, {} lines ignored)",
            header.name, self.decoded, crc32, self.ignored
        );

        Ok(DecodeSummary {
            header,
            trailer,
            decoded_size: self.decoded,
            crc32,
        })
    }
}

/// Strip a trailing LF and then a trailing CR
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
