//! Decompressor program templates (C4) — fixed, opaque bytecode sequences
//! parameterised only by a 20-byte target address.
//!
//! These are byte-for-byte copies of the forwarder templates this crate must
//! stay bit-exact with (spec.md §6); nothing here is "designed", it is
//! reproduced.

use alloy_primitives::Address;

/// The pseudo-address at which the compressed-call override injects
/// decompressor bytecode. `0x00000000000000000000000000000000000000e0`.
pub const DECOMPRESSOR_ADDRESS: Address = Address::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xe0,
]);

const RLE_PREFIX: &str = "5f5f5b368110602d575f8083813473";
const RLE_SUFFIX: &str = "5af1503d5f803e3d5ff35b600180820192909160031981019035185f1a8015604c57815301906002565b505f19815282820192607f9060031981019035185f1a818111156072575b160101906002565b838101368437606a56";

const FLZ_PREFIX: &str = "365f73";
const FLZ_SUFFIX: &str = "815b838110602f575f80848134865af1503d5f803e3d5ff35b803590815f1a8060051c908115609857600190600783149285831a6007018118840218600201948383011a90601f1660081b0101808603906020811860208211021890815f5b80830151818a015201858110609257505050600201019201916018565b82906075565b6001929350829150019101925f5b82811060b3575001916018565b85851060c1575b60010160a6565b936001818192355f1a878501530194905060ba56";

/// The 12-byte epilogue appended verbatim to every JIT program (spec.md §6).
pub const JIT_TRAILER: [u8; 12] = [
    0x34, 0x5f, 0x35, 0x5a, 0xf1, 0x3d, 0x5f, 0x5f, 0x3e, 0x3d, 0x5f, 0xf3,
];

fn addr_lowercase_hex(addr: Address) -> String {
    let mut s = String::with_capacity(40);
    for b in addr.as_slice() {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

/// `rle_forwarder(addr) -> hex` — the RLE-forwarder decompressor template
/// with `addr` spliced into its fixed prefix/suffix.
pub fn rle_forwarder(addr: Address) -> String {
    format!("0x{RLE_PREFIX}{}{RLE_SUFFIX}", addr_lowercase_hex(addr))
}

/// `flz_forwarder(addr) -> hex` — the FLZ-forwarder decompressor template
/// with `addr` spliced into its fixed prefix/suffix.
pub fn flz_forwarder(addr: Address) -> String {
    format!("0x{FLZ_PREFIX}{}{FLZ_SUFFIX}", addr_lowercase_hex(addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn decompressor_address_is_the_fixed_constant() {
        assert_eq!(
            DECOMPRESSOR_ADDRESS.to_string().to_lowercase(),
            "0x00000000000000000000000000000000000000e0"
        );
    }

    #[test]
    fn rle_forwarder_splices_address_verbatim() {
        let addr = Address::from_str("0x1111111111111111111111111111111111111111").unwrap();
        let hex = rle_forwarder(addr);
        assert!(hex.starts_with("0x5f5f5b368110602d575f8083813473"));
        assert!(hex.contains("1111111111111111111111111111111111111111"));
        assert!(hex.ends_with("838101368437606a56"));
    }

    #[test]
    fn flz_forwarder_splices_address_verbatim() {
        let addr = Address::from_str("0x2222222222222222222222222222222222222222").unwrap();
        let hex = flz_forwarder(addr);
        assert!(hex.starts_with("0x365f732222222222222222222222222222222222222222"));
        assert!(hex.ends_with("936001818192355f1a878501530194905060ba56"));
    }

    #[test]
    fn jit_trailer_matches_epilogue_bytes() {
        assert_eq!(
            JIT_TRAILER,
            [0x34, 0x5f, 0x35, 0x5a, 0xf1, 0x3d, 0x5f, 0x5f, 0x3e, 0x3d, 0x5f, 0xf3]
        );
    }
}
