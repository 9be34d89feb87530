// tests/cd.rs — black-box coverage of the RLE codec through its
// hex-in/hex-out public entry points.

use calldata_compress::{cd_compress, cd_decompress};

fn hex_of(bytes: &[u8]) -> String {
    let mut s = String::from("0x");
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

#[test]
fn long_zero_run_compresses_to_a_handful_of_bytes() {
    let data = vec![0x00u8; 1000];
    let h = hex_of(&data);
    let compressed = cd_compress(&h).unwrap();
    assert!((compressed.len() - 2) / 2 < 20);
    assert_eq!(cd_decompress(&compressed).unwrap(), h);
}

#[test]
fn incompressible_payload_still_roundtrips() {
    let data: Vec<u8> = (0u16..256).map(|n| (n * 37 + 11) as u8).collect();
    let h = hex_of(&data);
    let compressed = cd_compress(&h).unwrap();
    assert_eq!(cd_decompress(&compressed).unwrap(), h);
}

#[test]
fn single_byte_inputs_roundtrip() {
    for b in [0x00u8, 0x01, 0x7f, 0xfe, 0xff] {
        let h = hex_of(&[b]);
        let compressed = cd_compress(&h).unwrap();
        assert_eq!(cd_decompress(&compressed).unwrap(), h);
    }
}
