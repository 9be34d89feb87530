//! End-to-end error propagation across module boundaries.

use std::str::FromStr;

use alloy_primitives::Address;
use calldata_compress::{cd_decompress, compress_call_data, flz_decompress, Alg};

fn target() -> Address {
    Address::new([0xAB; 20])
}

#[test]
fn malformed_hex_rejected_at_the_selector_boundary() {
    let err = compress_call_data(target(), "0xzz", 800, "auto").unwrap_err();
    assert!(err.to_string().contains("hex"));
}

#[test]
fn odd_length_hex_rejected() {
    let err = compress_call_data(target(), "0x0", 800, "auto").unwrap_err();
    assert!(err.to_string().contains("multiple of 2"));
}

#[test]
fn truncated_cd_stream_reports_the_underlying_codec_error() {
    // A run token (0x00, header-obfuscated) with nothing following it.
    let err = cd_decompress("0xff").unwrap_err();
    assert!(err.to_string().contains("end of data"));
}

#[test]
fn invalid_flz_back_reference_reports_the_underlying_codec_error() {
    let err = flz_decompress("0x2000").unwrap_err();
    assert!(err.to_string().contains("back-reference"));
}

#[test]
fn strict_alg_parser_rejects_unknown_names_but_the_selector_degrades() {
    assert!(Alg::from_str("zzz").is_err());
    // The programmatic entry point never errors on an unrecognised alg name;
    // it silently treats it as vanilla delivery.
    let data = "0x".to_string() + &"00".repeat(2000);
    let result = compress_call_data(target(), &data, 800, "zzz").unwrap();
    assert_eq!(result.meta.alg, Alg::Vanilla);
}
