//! Marker line and line framing tests

use yenc_rs::{decode_slice, encode_to_vec};

/// Split encoded output into lines, checking every one ends in CRLF
fn lines(encoded: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = encoded.split(|&b| b == b'\n').collect();
    // Nothing after the final CRLF
    assert_eq!(lines.pop(), Some(&b""[..]));
    lines
        .into_iter()
        .map(|line| line.strip_suffix(b"\r").expect("CRLF line ending"))
        .collect()
}

#[test]
fn test_concrete_single_escaped_byte() {
    let encoded = encode_to_vec(&[0xD6], "a", 128).unwrap();
    let lines = lines(&encoded);

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], b"=ybegin line=128 size=1 name=a");
    assert_eq!(lines[1], [0x3Du8, 0x40]);
    assert_eq!(lines[2], b"=yend size=1 crc32=bdb2986c");
}

#[test]
fn test_payload_line_count() {
    for (size, line_length, expected) in [
        (0usize, 128usize, 0usize),
        (1, 128, 1),
        (128, 128, 1),
        (129, 128, 2),
        (1000, 10, 100),
        (1001, 10, 101),
        (5, 1, 5),
    ] {
        let data = vec![b'x'; size];
        let encoded = encode_to_vec(&data, "f", line_length).unwrap();
        // header and trailer
        assert_eq!(
            lines(&encoded).len() - 2,
            expected,
            "size={size} line_length={line_length}"
        );
    }
}

#[test]
fn test_header_and_trailer_attributes() {
    let data: Vec<u8> = (0..500u32).map(|i| (i % 251) as u8).collect();
    let encoded = encode_to_vec(&data, "archive.part.bin", 64).unwrap();
    let lines = lines(&encoded);

    assert_eq!(
        lines[0],
        b"=ybegin line=64 size=500 name=archive.part.bin"
    );
    let trailer = format!("=yend size=500 crc32={:08x}", crc32fast::hash(&data));
    assert_eq!(*lines.last().unwrap(), trailer.as_bytes());
}

#[test]
fn test_filename_with_spaces_survives() {
    let encoded = encode_to_vec(b"abc", "my holiday photo.jpg", 128).unwrap();
    let (_, summary) = decode_slice(&encoded).unwrap();
    assert_eq!(summary.header.name, "my holiday photo.jpg");
}

#[test]
fn test_decode_summary_fields() {
    let encoded = encode_to_vec(b"abc", "abc.txt", 2).unwrap();
    let (data, summary) = decode_slice(&encoded).unwrap();

    assert_eq!(data, b"abc");
    assert_eq!(summary.header.line, 2);
    assert_eq!(summary.header.size, 3);
    assert_eq!(summary.trailer.size, 3);
    assert_eq!(summary.trailer.crc32, Some(0x352441c2));
    assert_eq!(summary.crc32, 0x352441c2);
}
