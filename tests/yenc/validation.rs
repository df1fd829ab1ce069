//! Protocol and validation error tests

use yenc_rs::{decode, DecodeConfig, EscapePolicy, ErrorKind, YencError};

fn decode_to_vec(input: &[u8]) -> (Vec<u8>, Result<yenc_rs::DecodeSummary, YencError>) {
    let mut output = Vec::new();
    let result = decode(&mut output, input);
    (output, result)
}

#[test]
fn test_header_footer_size_mismatch_still_writes_output() {
    let (output, result) = decode_to_vec(b"=ybegin line=128 size=3 name=a\r\nkkk\r\n=yend size=4\r\n");

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(err, YencError::SizeMismatch { header: 3, footer: 4 }));
    assert_eq!(output, b"AAA");
}

#[test]
fn test_footer_before_header_produces_nothing() {
    let (output, result) =
        decode_to_vec(b"=yend size=1\r\n=ybegin line=128 size=1 name=a\r\nk\r\n=yend size=1\r\n");

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(matches!(err, YencError::FooterBeforeHeader));
    assert!(output.is_empty());
}

#[test]
fn test_truncated_payload() {
    let encoded = yenc_rs::encode_to_vec(&[1u8; 300], "t.bin", 100).unwrap();

    // Drop the second payload line
    let lines: Vec<&[u8]> = encoded.split_inclusive(|&b| b == b'\n').collect();
    let truncated: Vec<u8> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2)
        .flat_map(|(_, line)| line.iter().copied())
        .collect();

    let (output, result) = decode_to_vec(&truncated);
    assert!(matches!(
        result.unwrap_err(),
        YencError::LengthMismatch {
            declared: 300,
            actual: 200
        }
    ));
    assert_eq!(output.len(), 200);
}

#[test]
fn test_corrupted_payload_fails_crc() {
    let mut encoded = yenc_rs::encode_to_vec(b"hello world", "h.txt", 128).unwrap();
    let header_end = encoded.iter().position(|&b| b == b'\n').unwrap();
    // 'h' + 42 = 0x92; flip it to another plain byte
    encoded[header_end + 1] = 0x93;

    let (output, result) = decode_to_vec(&encoded);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(err, YencError::CrcMismatch { .. }));
    assert_eq!(output, b"iello world");
}

#[test]
fn test_malformed_trailer() {
    let (_, result) = decode_to_vec(b"=ybegin line=128 size=1 name=a\r\nk\r\n=yend size=1 junk\r\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(matches!(err, YencError::MalformedMarker { tag: "=yend", .. }));
}

#[test]
fn test_escape_policy_at_line_boundary() {
    // A producer that split an escape pair across lines
    let input = b"=ybegin line=128 size=1 name=a\r\n=\r\n@\r\n=yend size=1 crc32=bdb2986c\r\n";

    let (output, result) = decode_to_vec(input);
    result.unwrap();
    assert_eq!(output, [0xD6]);

    let mut output = Vec::new();
    let config = DecodeConfig::new().escape_policy(EscapePolicy::ResetPerLine);
    let err = yenc_rs::decode_with(&mut output, &input[..], &config).unwrap_err();
    // '@' decoded unescaped gives a different byte and the CRC no longer matches
    assert!(matches!(err, YencError::CrcMismatch { .. }));
    assert_eq!(output, [b'@'.wrapping_sub(42)]);
}
