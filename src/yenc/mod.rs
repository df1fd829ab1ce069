//! yEnc binary encoding/decoding
//!
//! yEnc is a binary-to-text encoding scheme designed specifically for Usenet.
//! It has only 1-2% overhead compared to 33-40% for Base64.
//!
//! Reference: http://www.yenc.org/yenc-draft.1.3.txt
//!
//! Only single-part transfers are produced. `=ypart` lines are recognized on
//! decode and skipped; parts are not reassembled.

pub mod decode;
pub mod encode;
pub mod marker;
pub mod transform;
pub mod types;

pub use decode::{decode, decode_slice, decode_with};
pub use encode::{encode, encode_to_vec, encode_with};
pub use marker::{Attributes, MarkerTag, format_marker, parse_marker};
pub use transform::{Unescaper, decode_byte, encode_byte, is_critical};
pub use types::{DecodeSummary, EncodeSummary, YencEnd, YencHeader, YencPart};
