// tests/config.rs — black-box coverage of configuration defaults (config.rs)
// and their effect on CompressedCall construction.

use alloy_primitives::Address;
use calldata_compress::config::{DEFAULT_ALG, DEFAULT_MIN_SIZE};
use calldata_compress::CompressedCall;

#[test]
fn compressed_call_new_picks_up_the_configured_defaults_absent_env_overrides() {
    let call = CompressedCall::new(Address::new([7u8; 20]), "0x0102");
    assert_eq!(call.min_size, DEFAULT_MIN_SIZE);
    assert_eq!(call.alg, DEFAULT_ALG);
}

#[test]
fn builder_methods_override_the_defaults() {
    let call = CompressedCall::new(Address::new([8u8; 20]), "0x0102")
        .with_min_size(42)
        .with_alg("jit");
    assert_eq!(call.min_size, 42);
    assert_eq!(call.alg, "jit");
}
