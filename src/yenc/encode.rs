use crate::config::{Declared, EncodeConfig};
use crate::{Result, YencError};
use crc32fast::Hasher;
use std::io::{self, Read, Write};
use tracing::debug;

use super::marker::{MarkerTag, format_marker};
use super::transform::push_encoded;
use super::types::EncodeSummary;

/// Read size for streaming encode when the line length is larger
const STREAM_BUFFER: usize = 64 * 1024;

/// Encode a byte stream to yEnc
///
/// Reads `input` to the end, then writes the `=ybegin` header, the payload
/// wrapped every `line_length` raw input bytes, and the `=yend` trailer.
/// Nothing is written if reading fails.
///
/// # Arguments
/// * `output` - Destination for the encoded text
/// * `input` - Raw bytes to encode
/// * `line_length` - Raw input bytes per payload line (must be at least 1)
/// * `filename` - Name written to the header
///
/// # Example
/// ```
/// let mut encoded = Vec::new();
/// yenc_rs::encode(&mut encoded, &b"Hello"[..], 128, "hello.txt")?;
/// assert!(encoded.starts_with(b"=ybegin line=128 size=5 name=hello.txt\r\n"));
/// # Ok::<(), yenc_rs::YencError>(())
/// ```
pub fn encode<W, R>(
    output: &mut W,
    input: R,
    line_length: usize,
    filename: &str,
) -> Result<EncodeSummary>
where
    W: Write + ?Sized,
    R: Read,
{
    encode_with(
        output,
        input,
        &EncodeConfig::new(filename).line_length(line_length),
    )
}

/// Encode a byte stream to yEnc using `config`
///
/// With [`EncodeConfig::declared`] set the header is written first and the
/// input is encoded as it is read; if the input then disagrees with the
/// declared size or CRC32 the trailer is withheld and
/// [`YencError::DeclaredMismatch`] is returned.
pub fn encode_with<W, R>(output: &mut W, input: R, config: &EncodeConfig) -> Result<EncodeSummary>
where
    W: Write + ?Sized,
    R: Read,
{
    config.validate()?;

    let summary = match config.declared {
        Some(declared) => encode_streaming(output, input, config, declared)?,
        None => encode_buffered(output, input, config)?,
    };

    debug!(
        "Encoded {} ({} bytes, {} lines, crc32={:08x})",
        config.name, summary.size, summary.lines, summary.crc32
    );

    Ok(summary)
}

/// Encode an in-memory buffer to a new `Vec`
pub fn encode_to_vec(data: &[u8], filename: &str, line_length: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() + data.len() / 32 + 128);
    encode(&mut output, data, line_length, filename)?;
    Ok(output)
}

fn encode_buffered<W, R>(output: &mut W, mut input: R, config: &EncodeConfig) -> Result<EncodeSummary>
where
    W: Write + ?Sized,
    R: Read,
{
    // The header needs the size, so the whole input is read first
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;

    let encoded = encode_data(&raw, config.line_length);
    let size = raw.len() as u64;
    let crc32 = crc32fast::hash(&raw);

    output.write_all(header_line(config, size).as_bytes())?;
    output.write_all(&encoded)?;
    output.write_all(trailer_line(size, crc32).as_bytes())?;
    output.flush()?;

    Ok(EncodeSummary {
        size,
        lines: raw.len().div_ceil(config.line_length) as u64,
        crc32,
    })
}

fn encode_streaming<W, R>(
    output: &mut W,
    mut input: R,
    config: &EncodeConfig,
    declared: Declared,
) -> Result<EncodeSummary>
where
    W: Write + ?Sized,
    R: Read,
{
    output.write_all(header_line(config, declared.size).as_bytes())?;

    let mut buf = vec![0u8; config.line_length.min(STREAM_BUFFER)];
    let mut encoded = Vec::with_capacity(buf.len() * 2 + 2);
    let mut hasher = Hasher::new();
    let mut size = 0u64;
    let mut lines = 0u64;
    // Raw bytes already on the current line
    let mut column = 0usize;

    loop {
        let want = (config.line_length - column).min(buf.len());
        let n = read_some(&mut input, &mut buf[..want])?;
        if n == 0 {
            break;
        }

        let chunk = &buf[..n];
        hasher.update(chunk);
        size += n as u64;

        encoded.clear();
        for &byte in chunk {
            push_encoded(byte, &mut encoded);
        }

        column += n;
        if column == config.line_length {
            encoded.extend_from_slice(b"\r\n");
            column = 0;
            lines += 1;
        }

        output.write_all(&encoded)?;
    }

    if column > 0 {
        output.write_all(b"\r\n")?;
        lines += 1;
    }

    let crc32 = hasher.finalize();
    if size != declared.size || crc32 != declared.crc32 {
        output.flush()?;
        return Err(YencError::DeclaredMismatch {
            declared_size: declared.size,
            declared_crc32: declared.crc32,
            actual_size: size,
            actual_crc32: crc32,
        });
    }

    output.write_all(trailer_line(size, crc32).as_bytes())?;
    output.flush()?;

    Ok(EncodeSummary { size, lines, crc32 })
}

fn read_some<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match input.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

fn header_line(config: &EncodeConfig, size: u64) -> String {
    format_marker(
        MarkerTag::Begin,
        &[
            ("line", config.line_length.to_string().as_str()),
            ("size", size.to_string().as_str()),
            ("name", config.name.as_str()),
        ],
    )
}

fn trailer_line(size: u64, crc32: u32) -> String {
    format_marker(
        MarkerTag::End,
        &[
            ("size", size.to_string().as_str()),
            ("crc32", format!("{crc32:08x}").as_str()),
        ],
    )
}

/// Encode binary data with escaping and line breaks
///
/// Every `line_length` raw bytes end a line, however many encoded bytes they
/// produced. Empty input produces no lines.
fn encode_data(data: &[u8], line_length: usize) -> Vec<u8> {
    let lines = data.len().div_ceil(line_length);
    let mut output = Vec::with_capacity(data.len() + data.len() / 32 + lines * 2);

    for line in data.chunks(line_length) {
        for &byte in line {
            push_encoded(byte, &mut output);
        }
        output.extend_from_slice(b"\r\n");
    }

    output
}
