//! Round-trip and escaping tests

use yenc_rs::{decode_slice, encode_to_vec};

fn round_trip(data: &[u8], line_length: usize) {
    let encoded = encode_to_vec(data, "data.bin", line_length).unwrap();
    let (decoded, summary) = decode_slice(&encoded).unwrap();
    assert_eq!(decoded, data, "line_length={line_length}");
    assert_eq!(summary.decoded_size, data.len() as u64);
    assert!(summary.verify_crc32());
}

#[test]
fn test_round_trip_empty() {
    round_trip(b"", 128);
}

#[test]
fn test_round_trip_single_bytes() {
    for byte in 0..=255u8 {
        round_trip(&[byte], 128);
    }
}

#[test]
fn test_round_trip_all_byte_values() {
    let data: Vec<u8> = (0..=255).collect();
    for line_length in [1, 2, 3, 7, 64, 128, 255, 256, 257, 997, 5000] {
        round_trip(&data, line_length);
    }
}

#[test]
fn test_round_trip_only_critical_inputs() {
    // Raw values whose shifted form is NUL, LF, CR or '='
    let data = [0xD6u8, 0xE0, 0xE3, 0x13].repeat(100);
    round_trip(&data, 128);
    round_trip(&data, 1);
}

#[test]
fn test_round_trip_text_patterns() {
    let test_cases = vec![
        b"Hello, World!".to_vec(),
        b"Line\nBreak\rTest\r\n".to_vec(),
        b"Equals=Sign=Test".to_vec(),
        b"=ybegin line=128 size=3 name=x\r\n".to_vec(),
        vec![0xDE, 0xAD, 0xBE, 0xEF],
    ];

    for data in test_cases {
        round_trip(&data, 128);
    }
}

#[test]
fn test_round_trip_large() {
    let data: Vec<u8> = (0..100_000u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
    round_trip(&data, 128);
}

#[test]
fn test_payload_never_contains_unescaped_critical_bytes() {
    let data: Vec<u8> = (0..=255).cycle().take(4096).collect();
    let encoded = encode_to_vec(&data, "x", 128).unwrap();

    for line in encoded.split(|&b| b == b'\n').filter(|l| !l.is_empty()) {
        let line = line.strip_suffix(b"\r").expect("CRLF line ending");
        if line.starts_with(b"=y") {
            continue;
        }
        assert!(!line.contains(&0x00));
        assert!(!line.contains(&b'\r'));

        // Every '=' is an escape marker followed by one escaped value
        let mut i = 0;
        while i < line.len() {
            if line[i] == b'=' {
                assert!(i + 1 < line.len(), "escape at end of line");
                assert!(matches!(line[i + 1], b'@' | b'J' | b'M' | b'}'));
                i += 2;
            } else {
                i += 1;
            }
        }
    }
}
