//! End-to-end selector fixtures (the reference's `test_selection.py`).

use alloy_primitives::Address;
use calldata_compress::{compress_call_data, Alg, DECOMPRESSOR_ADDRESS};

fn target() -> Address {
    "0x000000000000000000000000000000000000dEaD"
        .parse()
        .unwrap()
}

fn hex_of(bytes: &[u8]) -> String {
    let mut s = String::from("0x");
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

fn pseudo_random(n: usize, seed: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(n);
    let mut x = seed;
    for _ in 0..n {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
        out.push((x >> 16) as u8);
    }
    out
}

#[test]
fn auto_select_small_compares_cd_vs_flz() {
    let mut data = Vec::new();
    for _ in 0..256 {
        data.extend_from_slice(b"ABCD");
    }
    data.extend(pseudo_random(256, 1));
    let hex = hex_of(&data);

    let result = compress_call_data(target(), &hex, 800, "auto").unwrap();
    assert!(matches!(
        result.meta.alg,
        Alg::Cd | Alg::Flz | Alg::Vanilla
    ));
    if result.meta.alg != Alg::Vanilla {
        assert_eq!(result.to, DECOMPRESSOR_ADDRESS);
        assert_eq!(result.overrides.len(), 1);
        assert_eq!(result.overrides[0].address, DECOMPRESSOR_ADDRESS);
    }
}

#[test]
fn auto_select_large_prefers_jit_or_degrades_cleanly() {
    let data = pseudo_random(4096, 2);
    let hex = hex_of(&data);

    let result = compress_call_data(target(), &hex, 800, "auto").unwrap();
    assert!(matches!(
        result.meta.alg,
        Alg::Jit | Alg::Vanilla | Alg::Cd | Alg::Flz
    ));
    if result.meta.alg == Alg::Jit {
        assert_eq!(result.to, DECOMPRESSOR_ADDRESS);
        assert_eq!(result.overrides.len(), 1);
        // JIT calldata is a single 32-byte address word.
        assert_eq!(result.data.len(), 2 + 64);
    }
}

#[test]
fn vanilla_when_not_beneficial() {
    let data = pseudo_random(900, 3);
    let hex = hex_of(&data);

    let result = compress_call_data(target(), &hex, 800, "auto").unwrap();
    if result.meta.alg == Alg::Vanilla {
        assert_eq!(result.to, target());
        assert!(result.data.starts_with("0x"));
        assert_eq!((result.data.len() - 2) / 2, data.len());
        assert!(result.overrides.is_empty());
    }
}
