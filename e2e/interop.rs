//! Bit-exact interop fixtures against the reference implementation's
//! documented behavior (the reference's `test_cd_roundtrip.py` /
//! `test_flz_roundtrip.py` / `test_jit.py`).

use calldata_compress::{cd_compress, cd_decompress, flz_compress, flz_decompress, jit_bytecode};

fn hex_of(bytes: &[u8]) -> String {
    let mut s = String::from("0x");
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

#[test]
fn cd_roundtrips_zero_and_ff_runs() {
    let mut data = vec![0x00u8; 200];
    data.extend(std::iter::repeat(0xFFu8).take(64));
    data.extend(std::iter::repeat(0x00u8).take(17));
    let h = hex_of(&data);

    let comp = cd_compress(&h).unwrap();
    let decomp = cd_decompress(&comp).unwrap();
    assert_eq!(decomp, h);
}

#[test]
fn cd_roundtrips_pseudo_random_payloads() {
    for n in [64usize, 1024, 5000] {
        let mut data = Vec::with_capacity(n);
        let mut x: u32 = 0xDEAD_BEEF;
        for _ in 0..n {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
            data.push((x >> 16) as u8);
        }
        let h = hex_of(&data);
        let comp = cd_compress(&h).unwrap();
        let decomp = cd_decompress(&comp).unwrap();
        assert_eq!(decomp, h);
    }
}

#[test]
fn flz_roundtrips_pseudo_random_payloads() {
    for n in [64usize, 1024, 5000] {
        let mut data = Vec::with_capacity(n);
        let mut x: u32 = 0xC0FF_EE11;
        for _ in 0..n {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
            data.push((x >> 16) as u8);
        }
        let h = hex_of(&data);
        let comp = flz_compress(&h).unwrap();
        let decomp = flz_decompress(&comp).unwrap();
        assert_eq!(decomp, h);
    }
}

#[test]
fn jit_bytecode_is_nonempty_hex_with_the_fixed_epilogue() {
    let mut data = Vec::with_capacity(1024);
    let mut x: u32 = 0x1357_9BDF;
    for _ in 0..1024 {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12345);
        data.push((x >> 16) as u8);
    }
    let h = hex_of(&data);
    let bc = jit_bytecode(&h).unwrap();
    assert!(bc.starts_with("0x"));
    assert!(bc.len() > 2);
    assert!(bc.ends_with("345f355af13d5f5f3e3d5ff3"));
}
