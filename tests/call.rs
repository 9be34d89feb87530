// tests/call.rs — black-box coverage of CompressedCall::execute against an
// externally-implemented Provider, exercising the public trait boundary.

use std::cell::Cell;

use calldata_compress::{BlockTag, CallError, CompressedCall, EthCallTx, Provider, StateOverride};

struct CountingProvider {
    calls: Cell<u32>,
}

impl Provider for CountingProvider {
    fn eth_call(
        &self,
        _tx: EthCallTx,
        _block: BlockTag,
        _override_: Option<StateOverride>,
    ) -> Result<Vec<u8>, CallError> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![0x01, 0x02, 0x03])
    }
}

#[test]
fn a_third_party_provider_implementation_can_drive_execute() {
    let provider = CountingProvider { calls: Cell::new(0) };
    let call = CompressedCall::new(
        alloy_primitives::Address::new([1u8; 20]),
        "0xdeadbeef",
    );
    let result = call.execute(&provider, BlockTag::Number(12345)).unwrap();
    assert_eq!(result, vec![0x01, 0x02, 0x03]);
    assert_eq!(provider.calls.get(), 1);
}

#[test]
fn block_tag_variants_are_all_constructible() {
    let _ = BlockTag::Latest;
    let _ = BlockTag::Pending;
    let _ = BlockTag::Number(1);
}
