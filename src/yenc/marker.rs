//! Marker lines: `=ybegin`, `=ypart` and `=yend`
//!
//! A marker line is a tag followed by space separated `key=value` pairs in
//! any order. The `name` value may contain spaces: tokens that follow it and
//! are not themselves `key=value` pairs belong to the name. Any other token
//! without `=` rejects the whole line.

use crate::{Result, YencError};
use std::collections::HashMap;

use super::types::{YencEnd, YencHeader, YencPart};

/// Attribute mapping of one marker line
pub type Attributes = HashMap<String, String>;

const NAME_KEY: &str = "name";

/// Marker line tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerTag {
    /// `=ybegin`, the header
    Begin,
    /// `=ypart`, multi-part range header
    Part,
    /// `=yend`, the trailer
    End,
}

impl MarkerTag {
    /// Tag text including the leading `=`
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerTag::Begin => "=ybegin",
            MarkerTag::Part => "=ypart",
            MarkerTag::End => "=yend",
        }
    }

    /// Recognize the tag at the start of a line
    ///
    /// The tag must be followed by a space or the end of the line. Payload
    /// lines from a conforming encoder never match, since it only ever
    /// follows an escape with `@`, `J`, `M` or `}` on the same line. A
    /// producer that splits an escape pair across a line break could emit a
    /// payload line starting with `=y`; it is read as a marker.
    pub fn detect(line: &[u8]) -> Option<MarkerTag> {
        [MarkerTag::Begin, MarkerTag::Part, MarkerTag::End]
            .into_iter()
            .find(|tag| {
                let tag = tag.as_str().as_bytes();
                line.starts_with(tag) && matches!(line.get(tag.len()), None | Some(&b' '))
            })
    }
}

/// Format a marker line, CRLF terminated
///
/// Format: =ybegin line=128 size=1024 name=foo.bin
pub fn format_marker(tag: MarkerTag, attributes: &[(&str, &str)]) -> String {
    let mut line = String::from(tag.as_str());
    for (key, value) in attributes {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(value);
    }
    line.push_str("\r\n");
    line
}

/// Parse a marker line into its attributes
///
/// Repeated keys keep the last value. Whitespace around the attribute list is
/// stripped, so a name with leading or trailing spaces comes back without
/// them; spaces inside a name are kept as written.
pub fn parse_marker(line: &str, tag: MarkerTag) -> Result<Attributes> {
    let tag_str = tag.as_str();
    let rest = line
        .strip_prefix(tag_str)
        .filter(|rest| rest.is_empty() || rest.starts_with(' '))
        .ok_or_else(|| YencError::malformed(tag_str, format!("expected {tag_str} prefix")))?
        .trim();

    let mut attributes = Attributes::new();
    // Byte range of the name value within `rest`
    let mut name: Option<(usize, usize)> = None;
    // Whether the last key seen was `name`, so bare tokens extend it
    let mut in_name = false;
    let mut offset = 0;

    for token in rest.split(' ') {
        let start = offset;
        offset += token.len() + 1;

        // Repeated separators
        if token.is_empty() {
            continue;
        }

        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                in_name = key == NAME_KEY;
                if in_name {
                    name = Some((start + key.len() + 1, start + token.len()));
                } else {
                    attributes.insert(key.to_string(), value.to_string());
                }
            }
            _ if in_name => {
                if let Some((_, end)) = name.as_mut() {
                    *end = start + token.len();
                }
            }
            Some(_) => {
                return Err(YencError::malformed(
                    tag_str,
                    format!("token '{token}' has an empty key"),
                ));
            }
            None => {
                return Err(YencError::malformed(
                    tag_str,
                    format!("token '{token}' has no '='"),
                ));
            }
        }
    }

    if let Some((start, end)) = name {
        attributes.insert(NAME_KEY.to_string(), rest[start..end].to_string());
    }

    Ok(attributes)
}

fn required<'a>(attributes: &'a Attributes, key: &str, tag: MarkerTag) -> Result<&'a str> {
    attributes
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| YencError::malformed(tag.as_str(), format!("missing '{key}' parameter")))
}

fn required_number<T: std::str::FromStr>(
    attributes: &Attributes,
    key: &str,
    tag: MarkerTag,
) -> Result<T> {
    let value = required(attributes, key, tag)?;
    value.parse().map_err(|_| {
        YencError::malformed(
            tag.as_str(),
            format!("'{key}' is not a valid number: {value}"),
        )
    })
}

/// Parse yEnc =ybegin header line
///
/// Format: =ybegin line=128 size=123456 name=file.bin
pub(crate) fn parse_ybegin(line: &str) -> Result<YencHeader> {
    let tag = MarkerTag::Begin;
    let attributes = parse_marker(line, tag)?;

    Ok(YencHeader {
        line: required_number(&attributes, "line", tag)?,
        size: required_number(&attributes, "size", tag)?,
        name: required(&attributes, NAME_KEY, tag)?.to_string(),
    })
}

/// Parse yEnc =ypart line
///
/// Format: =ypart begin=1 end=123456
pub(crate) fn parse_ypart(line: &str) -> Result<YencPart> {
    let tag = MarkerTag::Part;
    let attributes = parse_marker(line, tag)?;

    Ok(YencPart {
        begin: required_number(&attributes, "begin", tag)?,
        end: required_number(&attributes, "end", tag)?,
    })
}

/// Parse yEnc =yend line
///
/// Format: =yend size=123456 [crc32=1a2b3c4d]
pub(crate) fn parse_yend(line: &str) -> Result<YencEnd> {
    let tag = MarkerTag::End;
    let attributes = parse_marker(line, tag)?;

    let size = required_number(&attributes, "size", tag)?;

    // CRC32 is in hex format
    let crc32 = attributes
        .get("crc32")
        .map(|s| {
            u32::from_str_radix(s, 16).map_err(|_| {
                YencError::malformed(tag.as_str(), format!("'crc32' is not valid hex: {s}"))
            })
        })
        .transpose()?;

    Ok(YencEnd { size, crc32 })
}
