#![doc = include_str!("../README.md")]

mod config;
mod error;
/// yEnc binary encoding/decoding
pub mod yenc;

pub use config::{DEFAULT_LINE_LENGTH, DecodeConfig, Declared, EncodeConfig, EscapePolicy};
pub use error::{ErrorKind, Result, YencError};
pub use yenc::{
    DecodeSummary, EncodeSummary, YencEnd, YencHeader, YencPart, decode, decode_slice,
    decode_with, encode, encode_to_vec, encode_with,
};
