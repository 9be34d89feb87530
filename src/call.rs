//! Executable compressed call (C7) — drives a [`Provider`]/[`AsyncProvider`]
//! through the selector's decision, falling back to a vanilla `eth_call` if
//! the compressed attempt fails. Ported from
//! `examples/original_source/src/ethcompress/compressor.py`'s
//! `CompressedCall.execute` / `compress_eth_call`.
//!
//! `Provider`/`AsyncProvider` stand in for "the RPC transport", which
//! spec.md §1 declares out of scope — this module ships the traits and the
//! driving logic, not a concrete HTTP/WebSocket client.

use std::fmt;

use alloy_primitives::Address;

use crate::config::NotifyLevel;
use crate::displaylevel;
use crate::hex::{self, HexError};
use crate::selector::{self, Alg, SelectError, StateOverride};

/// The block tag an `eth_call` is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Pending,
    Number(u64),
}

/// A minimal `eth_call` transaction request: target address and hex `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthCallTx {
    pub to: Address,
    pub data: String,
}

/// Errors raised while planning or executing a compressed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    Hex(HexError),
    Select(SelectError),
    /// Both the compressed attempt and the vanilla fallback failed; carries
    /// the transport's own error message (opaque — transports are out of
    /// scope per spec.md §1).
    CompressedCallFailed(String),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Hex(e) => write!(f, "{e}"),
            CallError::Select(e) => write!(f, "{e}"),
            CallError::CompressedCallFailed(msg) => {
                write!(f, "compressed call failed: {msg}")
            }
        }
    }
}

impl std::error::Error for CallError {}

impl From<HexError> for CallError {
    fn from(e: HexError) -> Self {
        CallError::Hex(e)
    }
}

impl From<SelectError> for CallError {
    fn from(e: SelectError) -> Self {
        CallError::Select(e)
    }
}

/// A blocking RPC transport, narrowed to the single operation this crate
/// needs (spec.md §4.11).
pub trait Provider {
    fn eth_call(
        &self,
        tx: EthCallTx,
        block: BlockTag,
        override_: Option<StateOverride>,
    ) -> Result<Vec<u8>, CallError>;
}

/// The async counterpart of [`Provider`].
pub trait AsyncProvider {
    async fn eth_call(
        &self,
        tx: EthCallTx,
        block: BlockTag,
        override_: Option<StateOverride>,
    ) -> Result<Vec<u8>, CallError>;
}

/// A planned, not-yet-executed compressed `eth_call`: the original target
/// and calldata, plus the selector parameters that decide how it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedCall {
    pub to: Address,
    pub calldata_hex: String,
    pub min_size: usize,
    pub alg: String,
    pub allow_fallback: bool,
}

impl CompressedCall {
    /// Builds a call using the configured defaults for `min_size`/`alg`
    /// (C8), with fallback to vanilla delivery enabled; override with
    /// [`Self::with_min_size`]/[`Self::with_alg`]/[`Self::with_allow_fallback`].
    pub fn new(to: Address, calldata_hex: impl Into<String>) -> Self {
        CompressedCall {
            to,
            calldata_hex: calldata_hex.into(),
            min_size: crate::config::min_size_default(),
            alg: crate::config::alg_default(),
            allow_fallback: true,
        }
    }

    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
        self.alg = alg.into();
        self
    }

    /// Controls whether a failed compressed call retries once against
    /// vanilla delivery (spec.md §4.7). When disabled, a compressed-call
    /// failure is propagated directly as [`CallError::CompressedCallFailed`].
    pub fn with_allow_fallback(mut self, allow_fallback: bool) -> Self {
        self.allow_fallback = allow_fallback;
        self
    }

    fn plan(&self) -> Result<selector::CompressedCallData, CallError> {
        Ok(selector::compress_call_data(
            self.to,
            &self.calldata_hex,
            self.min_size,
            &self.alg,
        )?)
    }

    fn vanilla_tx(&self) -> Result<EthCallTx, CallError> {
        let bytes = hex::to_bytes(&self.calldata_hex)?;
        Ok(EthCallTx {
            to: self.to,
            data: hex::to_hex(&bytes),
        })
    }

    /// Plans the call via the selector, executes it through `provider`, and
    /// — if compression was actually used, the call failed, and
    /// `allow_fallback` is set — retries once against vanilla (uncompressed)
    /// delivery. If fallback is disabled, the first failure is propagated
    /// directly as [`CallError::CompressedCallFailed`] (spec.md §4.7/§7).
    pub fn execute<P: Provider>(&self, provider: &P, block: BlockTag) -> Result<Vec<u8>, CallError> {
        let planned = self.plan()?;
        let tx = EthCallTx {
            to: planned.to,
            data: planned.data.clone(),
        };
        let override_ = planned.overrides.first().cloned();

        match provider.eth_call(tx, block, override_) {
            Ok(result) => Ok(result),
            Err(e) if planned.meta.alg != Alg::Vanilla && !self.allow_fallback => {
                Err(CallError::CompressedCallFailed(e.to_string()))
            }
            Err(e) if planned.meta.alg != Alg::Vanilla => {
                displaylevel!(
                    NotifyLevel::Info,
                    "compressed call ({}) failed, falling back to vanilla: {e}",
                    planned.meta.alg
                );
                let tx = self.vanilla_tx()?;
                provider
                    .eth_call(tx, block, None)
                    .map_err(|e2| CallError::CompressedCallFailed(e2.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Async counterpart of [`Self::execute`].
    pub async fn execute_async<P: AsyncProvider>(
        &self,
        provider: &P,
        block: BlockTag,
    ) -> Result<Vec<u8>, CallError> {
        let planned = self.plan()?;
        let tx = EthCallTx {
            to: planned.to,
            data: planned.data.clone(),
        };
        let override_ = planned.overrides.first().cloned();

        match provider.eth_call(tx, block, override_).await {
            Ok(result) => Ok(result),
            Err(e) if planned.meta.alg != Alg::Vanilla && !self.allow_fallback => {
                Err(CallError::CompressedCallFailed(e.to_string()))
            }
            Err(e) if planned.meta.alg != Alg::Vanilla => {
                displaylevel!(
                    NotifyLevel::Info,
                    "compressed call ({}) failed, falling back to vanilla: {e}",
                    planned.meta.alg
                );
                let tx = self.vanilla_tx()?;
                provider
                    .eth_call(tx, block, None)
                    .await
                    .map_err(|e2| CallError::CompressedCallFailed(e2.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every call made to it; `fail_first` makes the first call
    /// return an error so fallback behavior can be exercised.
    struct MockProvider {
        calls: RefCell<Vec<(EthCallTx, Option<StateOverride>)>>,
        fail_first: bool,
    }

    impl MockProvider {
        fn new(fail_first: bool) -> Self {
            MockProvider {
                calls: RefCell::new(Vec::new()),
                fail_first,
            }
        }
    }

    impl Provider for MockProvider {
        fn eth_call(
            &self,
            tx: EthCallTx,
            _block: BlockTag,
            override_: Option<StateOverride>,
        ) -> Result<Vec<u8>, CallError> {
            let call_index = self.calls.borrow().len();
            self.calls.borrow_mut().push((tx, override_));
            if self.fail_first && call_index == 0 {
                return Err(CallError::CompressedCallFailed("mock transport error".into()));
            }
            Ok(vec![0xAB])
        }
    }

    impl AsyncProvider for MockProvider {
        async fn eth_call(
            &self,
            tx: EthCallTx,
            block: BlockTag,
            override_: Option<StateOverride>,
        ) -> Result<Vec<u8>, CallError> {
            Provider::eth_call(self, tx, block, override_)
        }
    }

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn small_payload_sends_vanilla_call_to_the_real_target() {
        let call = CompressedCall::new(addr(1), hex::to_hex(&[0x01, 0x02]))
            .with_min_size(800)
            .with_alg("auto");
        let provider = MockProvider::new(false);
        let result = call.execute(&provider, BlockTag::Latest).unwrap();
        assert_eq!(result, vec![0xAB]);
        let calls = provider.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.to, addr(1));
        assert!(calls[0].1.is_none());
    }

    #[test]
    fn large_payload_sends_override_to_the_decompressor_address() {
        let mut data = vec![0x00u8; 900];
        data.extend(std::iter::repeat(0xAAu8).take(50));
        let call = CompressedCall::new(addr(2), hex::to_hex(&data))
            .with_min_size(800)
            .with_alg("auto");
        let provider = MockProvider::new(false);
        call.execute(&provider, BlockTag::Latest).unwrap();
        let calls = provider.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.to, crate::forwarder::DECOMPRESSOR_ADDRESS);
        assert!(calls[0].1.is_some());
    }

    #[test]
    fn compressed_failure_falls_back_to_vanilla() {
        let mut data = vec![0x00u8; 900];
        data.extend(std::iter::repeat(0xAAu8).take(50));
        let call = CompressedCall::new(addr(3), hex::to_hex(&data))
            .with_min_size(800)
            .with_alg("auto");
        let provider = MockProvider::new(true);
        let result = call.execute(&provider, BlockTag::Latest).unwrap();
        assert_eq!(result, vec![0xAB]);
        let calls = provider.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].1.is_some());
        assert_eq!(calls[1].0.to, addr(3));
        assert!(calls[1].1.is_none());
    }

    #[test]
    fn fallback_disabled_propagates_the_first_error_without_retrying() {
        let mut data = vec![0x00u8; 900];
        data.extend(std::iter::repeat(0xAAu8).take(50));
        let call = CompressedCall::new(addr(5), hex::to_hex(&data))
            .with_min_size(800)
            .with_alg("auto")
            .with_allow_fallback(false);
        let provider = MockProvider::new(true);
        let err = call.execute(&provider, BlockTag::Latest).unwrap_err();
        assert!(matches!(err, CallError::CompressedCallFailed(_)));
        assert_eq!(provider.calls.borrow().len(), 1);
    }

    /// Polls a future to completion on a busy-loop noop waker. The mock
    /// provider's futures never actually suspend, so this is sufficient
    /// without pulling in an async runtime dependency just for tests.
    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

        let raw_waker = RawWaker::new(std::ptr::null(), &VTABLE);
        let waker = unsafe { Waker::from_raw(raw_waker) };
        let mut cx = Context::from_waker(&waker);
        let mut future = Box::pin(future);
        loop {
            if let Poll::Ready(v) = future.as_mut().poll(&mut cx) {
                return v;
            }
        }
    }

    #[test]
    fn execute_async_mirrors_execute() {
        let call = CompressedCall::new(addr(4), hex::to_hex(&[0x01, 0x02]))
            .with_min_size(800)
            .with_alg("auto");
        let provider = MockProvider::new(false);
        let result = block_on(call.execute_async(&provider, BlockTag::Latest)).unwrap();
        assert_eq!(result, vec![0xAB]);
    }
}
