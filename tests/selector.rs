// tests/selector.rs — black-box coverage of the selector's public entry
// point across all five algorithm names.

use std::str::FromStr;

use alloy_primitives::Address;
use calldata_compress::{compress_call_data, Alg};

fn addr(n: u8) -> Address {
    Address::new([n; 20])
}

fn hex_of(bytes: &[u8]) -> String {
    let mut s = String::from("0x");
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

#[test]
fn every_known_alg_name_is_case_insensitive() {
    for name in ["AUTO", "Vanilla", "CD", "Flz", "JIT"] {
        assert!(Alg::from_str(name).is_ok(), "{name} should parse");
    }
}

#[test]
fn forced_alg_below_min_size_is_overridden_by_the_size_gate() {
    let data = vec![0x01u8; 10];
    let h = hex_of(&data);
    for alg in ["cd", "flz", "jit"] {
        let result = compress_call_data(addr(9), &h, 800, alg).unwrap();
        // 10 bytes is below the 800-byte min_size, so the gate fires before
        // `alg` is ever consulted — the override path is never attempted.
        assert_eq!(result.meta.alg, Alg::Vanilla);
    }
}

#[test]
fn min_size_zero_lets_auto_mode_attempt_compression_on_tiny_payloads() {
    let mut data = vec![0x00u8; 64];
    data[0] = 0xAA;
    let h = hex_of(&data);
    let result = compress_call_data(addr(10), &h, 0, "auto").unwrap();
    // Either it found a benefit, or it correctly degraded — both are valid,
    // but the accounting must be internally consistent either way.
    if result.meta.benefit {
        assert!(result.meta.compressed_size + result.meta.code_size < result.meta.original_size);
    } else {
        assert_eq!(result.meta.alg, Alg::Vanilla);
    }
}

#[test]
fn meta_original_size_always_matches_the_input_length() {
    let data = vec![0x55u8; 123];
    let h = hex_of(&data);
    let result = compress_call_data(addr(11), &h, 800, "auto").unwrap();
    assert_eq!(result.meta.original_size, 123);
}
