//! JIT bytecode synthesizer (C5) — the hardest subsystem.
//!
//! Two-pass plan-and-emit compiler from calldata bytes to a stack-machine
//! program that reconstructs the calldata in memory and forwards it as an
//! inner CALL. Ported from `examples/original_source/src/compressions/jit.py`,
//! reorganised per spec.md §9's "two-pass planning with shared abstract
//! stack" design note: pass 1 emits a typed [`PlanStep`] list plus a
//! frequency table; pass 2 replays the plan after pre-seeding the stack with
//! the most frequent literals. The abstract-stack model ([`JitState`]) is a
//! distinct structure from the emitted byte buffer and never escapes this
//! module.

use std::cmp::Reverse;
use std::collections::HashMap;

use alloy_primitives::U256;

use crate::forwarder::JIT_TRAILER;
use crate::hex::{self, HexError};

/// One step of the plan recorded by pass 1 and replayed verbatim by pass 2.
#[derive(Debug, Clone)]
enum PlanStep {
    Num(U256),
    Bytes(Vec<u8>),
    Op(u8),
}

/// The synthesizer's model of the target stack machine's operand stack and
/// linear memory, used to decide when to DUP/SWAP/elide a push instead of
/// emitting a fresh literal (spec.md §3, "Abstract stack").
struct JitState {
    ops: Vec<u8>,
    data: Vec<Option<Vec<u8>>>,
    stack: Vec<U256>,
    tracked_mem_size: u64,
    mem: HashMap<u64, U256>,
    stack_freq: HashMap<U256, i64>,
    stack_cnt: HashMap<U256, u64>,
    push_counter: u64,
}

impl JitState {
    fn new() -> Self {
        JitState {
            ops: Vec::new(),
            data: Vec::new(),
            stack: Vec::new(),
            tracked_mem_size: 0,
            mem: HashMap::new(),
            stack_freq: HashMap::new(),
            stack_cnt: HashMap::new(),
            push_counter: 0,
        }
    }

    /// Resets everything the second pass re-derives from scratch. Frequency
    /// counters, last-push ordinals and the push counter survive — they are
    /// what let pass 2 choose which literals to pre-push.
    fn begin_second_pass(&mut self) {
        self.ops.clear();
        self.data.clear();
        self.stack.clear();
        self.tracked_mem_size = 0;
        self.mem.clear();
    }

    fn push_op(&mut self, op: u8) {
        self.ops.push(op);
    }

    fn push_d(&mut self, d: Option<Vec<u8>>) {
        self.data.push(d);
    }

    fn push_s(&mut self, v: U256, freq: i64) {
        self.stack.push(v);
        *self.stack_freq.entry(v).or_insert(0) += freq;
        self.push_counter += 1;
        self.stack_cnt.insert(v, self.push_counter);
    }

    fn dec_freq(&mut self, v: U256) {
        *self.stack_freq.entry(v).or_insert(0) -= 1;
    }

    /// Stack underflow here means pass 1 and pass 2 disagree about what the
    /// machine's stack contains at this plan step — a synthesizer bug, not
    /// something a caller's input can trigger (spec.md §7).
    fn pop2(&mut self) -> (U256, U256) {
        let a = self.stack.pop().expect("abstract stack underflow");
        let b = self.stack.pop().expect("abstract stack underflow");
        (a, b)
    }

    /// Depth of the top-most occurrence of `v` (0 = top), if any.
    fn get_stack_idx(&self, v: U256) -> Option<usize> {
        self.stack
            .iter()
            .rposition(|&x| x == v)
            .map(|i| self.stack.len() - 1 - i)
    }

    fn is_in_stack(&self, v: U256) -> bool {
        self.get_stack_idx(v).is_some() || v == U256::from(0xE0u32) || v == U256::from(32u32)
    }

    fn track_mem(&mut self, offset: u64, size: u64) {
        self.tracked_mem_size = round_up_32(offset + size);
    }

    /// Mirrors the semantics of each opcode this synthesizer ever emits,
    /// keeping `stack`/`mem`/`tracked_mem_size` in lock-step with what a
    /// real machine would do when executing `op`. See spec.md §4.5,
    /// "Abstract push semantics".
    fn add_op(&mut self, op: u8, imm: Option<&[u8]>) {
        match op {
            0x36 => self.push_s(U256::from(32u32), 1), // CALLDATASIZE
            0x59 => {
                // MSIZE
                let v = U256::from(self.tracked_mem_size);
                self.push_s(v, 0);
            }
            0x1B => {
                // SHL — peephole: a preceding SWAP1 used purely to reorder
                // operands for a DUP-reuse is cancelled here instead, fixing
                // up which popped value is the shift and which is the value.
                let (mut shift, mut val) = self.pop2();
                if self.ops.last() == Some(&0x90) {
                    self.ops.pop();
                    self.data.pop();
                    std::mem::swap(&mut shift, &mut val);
                }
                let shift_amt = shift.as_limbs()[0];
                let result = if shift_amt >= 256 {
                    U256::ZERO
                } else {
                    val.wrapping_shl(shift_amt as usize)
                };
                self.push_s(result, 1);
            }
            0x17 => {
                // OR — same SWAP1 peephole; OR is commutative so no operand
                // fixup is needed, only the cancellation.
                let (a, b) = self.pop2();
                if self.ops.last() == Some(&0x90) {
                    self.ops.pop();
                    self.data.pop();
                }
                self.push_s(a | b, 1);
            }
            op2 if (0x60..=0x7F).contains(&op2) || op2 == 0x5F => {
                // PUSHx / PUSH0
                let v = U256::from_be_slice(imm.unwrap_or(&[]));
                if v == U256::from(0xE0u32) {
                    // The decompressor's own address word: ADDRESS is free.
                    self.push_s(v, 1);
                    self.push_op(0x30);
                    self.push_d(None);
                    return;
                }
                if let Some(idx) = self.get_stack_idx(v) {
                    if op2 != 0x5F {
                        let last = *self.stack_freq.get(&v).unwrap_or(&0) == 0;
                        if idx == 0 && last {
                            // Already on top and this is the final use: skip the push.
                            self.dec_freq(v);
                            return;
                        }
                        if idx == 1 && last {
                            // Bring it to the top with SWAP1 instead of pushing.
                            self.push_op(0x90);
                            let (a, b) = self.pop2();
                            self.stack.push(b);
                            self.stack.push(a);
                            self.push_d(None);
                            self.dec_freq(v);
                            return;
                        }
                        self.push_s(v, -1);
                        self.push_op(0x80 + idx as u8); // DUP(idx+1)
                        self.push_d(None);
                        return;
                    }
                }
                self.push_s(v, 1);
            }
            0x51 => {
                // MLOAD
                let k = self.stack.pop().expect("abstract stack underflow");
                let off = k.as_limbs()[0];
                let val = *self.mem.get(&off).unwrap_or(&U256::ZERO);
                self.push_s(val, 1);
            }
            0x52 => {
                // MSTORE
                let (offset, value) = self.pop2();
                let off = offset.as_limbs()[0];
                self.mem.insert(off, value);
                self.track_mem(off, 32);
            }
            0x53 => {
                // MSTORE8
                let (offset, _value) = self.pop2();
                let off = offset.as_limbs()[0];
                self.track_mem(off, 1);
            }
            0xF3 => {
                // RETURN (never emitted by this synthesizer; kept for completeness).
                let _ = self.pop2();
            }
            _ => {}
        }
        self.push_op(op);
        self.push_d(imm.map(|s| s.to_vec()));
    }

    fn op(&mut self, opcode: u8) {
        self.add_op(opcode, None);
    }

    /// Pushes an integer, specialising to the cheapest opcode available
    /// (spec.md §4.5, "Abstract push semantics").
    fn push_n(&mut self, value: U256) {
        if !value.is_zero() && value == U256::from(self.tracked_mem_size) {
            self.add_op(0x59, None);
            return;
        }
        if value.is_zero() {
            self.add_op(0x5F, None);
            return;
        }
        if value == U256::from(32u32) {
            self.add_op(0x36, None);
            return;
        }
        let bytes_be = minimal_be_bytes(value);
        self.add_op(0x5F + bytes_be.len() as u8, Some(&bytes_be));
    }

    /// Pushes an exact byte sequence (not minimally trimmed — used for
    /// literal/segment bytes that may legitimately contain interior zeros).
    fn push_b(&mut self, b: &[u8]) {
        self.add_op(0x5F + b.len() as u8, Some(b));
    }
}

#[inline]
fn round_up_32(x: u64) -> u64 {
    (x + 31) & !31u64
}

fn minimal_be_bytes(value: U256) -> Vec<u8> {
    let full = value.to_be_bytes::<32>();
    let first_nonzero = full.iter().position(|&b| b != 0).unwrap_or(31);
    full[first_nonzero..].to_vec()
}

fn lower_hex_no_prefix(b: &[u8]) -> String {
    let mut s = String::with_capacity(b.len() * 2);
    for x in b {
        s.push_str(&format!("{x:02x}"));
    }
    s
}

/// Non-overlapping substring count, matching Python's `str.count`.
fn count_substr(haystack: &str, needle: &str) -> i64 {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0i64;
    let mut start = 0usize;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        start += pos + needle.len();
    }
    count
}

/// Maximal non-zero byte runs within a 32-byte word (spec.md §3, "Segment").
fn find_segments(word: &[u8; 32]) -> Vec<(usize, usize)> {
    let mut segs = Vec::new();
    let mut i = 0usize;
    while i < 32 {
        while i < 32 && word[i] == 0 {
            i += 1;
        }
        if i >= 32 {
            break;
        }
        let s = i;
        while i < 32 && word[i] != 0 {
            i += 1;
        }
        segs.push((s, i - 1));
    }
    segs
}

/// Cost, in bytes, of pushing `base` as a minimally-encoded immediate — used
/// only for word-cache reuse heuristics, not for the actual `push_n` it is
/// compared against.
fn base_bytes(base: u64) -> u64 {
    if base == 0 {
        return 1;
    }
    let v = (base + 1) as f64;
    (v.log2() / 8.0).ceil() as u64
}

/// Estimated cost of the shift-OR assembly scheme for a word's segments
/// (spec.md §4.5, `est_shl_cost`).
fn est_shl_cost(segs: &[(usize, usize)]) -> u64 {
    let mut cost = 0u64;
    let mut first = true;
    for &(s, e) in segs {
        cost += 1 + (e - s + 1) as u64;
        let suffix = 31 - e;
        if suffix > 0 {
            cost += 3;
        }
        if !first {
            cost += 1;
        }
        first = false;
    }
    cost
}

/// Right-aligns the first four bytes of `calldata` into a 32-byte slot
/// (spec.md §3, "Input buffer"). Returns `(padded_buffer, padding_len)`.
fn pad_buffer(calldata: &[u8]) -> (Vec<u8>, usize) {
    if calldata.len() >= 4 {
        let mut buf = vec![0u8; 28];
        buf.extend_from_slice(&calldata[0..4]);
        buf.extend_from_slice(&calldata[4..]);
        (buf, 28)
    } else {
        (calldata.to_vec(), 0)
    }
}

fn emit_push_n(st: &mut JitState, plan: &mut Vec<PlanStep>, v: U256) {
    plan.push(PlanStep::Num(v));
    st.push_n(v);
}

fn emit_push_b(st: &mut JitState, plan: &mut Vec<PlanStep>, b: &[u8]) {
    plan.push(PlanStep::Bytes(b.to_vec()));
    st.push_b(b);
}

fn emit_op(st: &mut JitState, plan: &mut Vec<PlanStep>, o: u8) {
    plan.push(PlanStep::Op(o));
    st.op(o);
}

const MAX_PRE_PUSH: usize = 13;

/// Synthesizes the JIT program for `calldata`, returning the raw opcode
/// bytes (including the fixed epilogue). Total over any input of length
/// `<= 2^24` bytes (spec.md §4.5).
pub fn jit_bytecode_bytes(calldata: &[u8]) -> Vec<u8> {
    let original_len = calldata.len();
    let hex_data = lower_hex_no_prefix(calldata);
    let (buf, padding) = pad_buffer(calldata);
    let n = buf.len();

    let mut st = JitState::new();
    let mut plan: Vec<PlanStep> = Vec::new();
    let mut word_cache: HashMap<String, u64> = HashMap::new();
    let mut word_cache_cost: HashMap<String, i64> = HashMap::new();

    // Feeds the abstract stack (not the plan) with an accumulator value of
    // 1, mirroring the reference: this push is rebuilt from scratch by pass
    // 2's own accumulator push below, but its effect on pass 1's frequency
    // bookkeeping must survive into pass 2's pre-push candidate selection.
    st.push_n(U256::from(1u32));

    let mut base = 0usize;
    while base < n {
        let copy_end = (base + 32).min(n);
        let mut word = [0u8; 32];
        word[..copy_end - base].copy_from_slice(&buf[base..copy_end]);

        let segs = find_segments(&word);
        if segs.is_empty() {
            base += 32;
            continue;
        }

        let literal = &word[segs[0].0..32];
        let literal_cost = 1 + literal.len() as u64;
        let base_bytes_v = base_bytes(base as u64);
        let word_hex = lower_hex_no_prefix(&word);

        let mut reused = false;
        if literal_cost > 8 {
            if let Some(&prior_base) = word_cache.get(&word_hex) {
                let cost = *word_cache_cost.get(&word_hex).unwrap_or(&0);
                if literal_cost as i64 > cost + base_bytes_v as i64 {
                    emit_push_n(&mut st, &mut plan, U256::from(prior_base));
                    emit_op(&mut st, &mut plan, 0x51);
                    emit_push_n(&mut st, &mut plan, U256::from(base as u64));
                    emit_op(&mut st, &mut plan, 0x52);
                    reused = true;
                }
            } else if *word_cache_cost.get(&word_hex).unwrap_or(&0) != -1 {
                let reuse_cost = base_bytes_v as i64 + 3;
                let freq = count_substr(&hex_data, &word_hex);
                let cost = if freq * 32 > freq * reuse_cost {
                    reuse_cost
                } else {
                    -1
                };
                word_cache_cost.insert(word_hex.clone(), cost);
                word_cache.insert(word_hex.clone(), base as u64);
            }
        }

        if reused {
            base += 32;
            continue;
        }

        let byte8s = segs.iter().all(|&(s, e)| s == e);
        // Whole-word literal interpreted as a value, to check whether it
        // matches something already live on the abstract stack (spec.md
        // §4.5, "Pre-pushed reuse"). The original source compares the raw
        // byte object against a list of integers, which can never match —
        // we follow spec.md's stated intent (a value-level comparison)
        // rather than that dead branch; see DESIGN.md.
        let literal_val = U256::from_be_slice(literal);

        if st.is_in_stack(literal_val) {
            emit_push_b(&mut st, &mut plan, literal);
        } else if byte8s {
            for &(s, _e) in &segs {
                emit_push_n(&mut st, &mut plan, U256::from(word[s] as u64));
                emit_push_n(&mut st, &mut plan, U256::from((base + s) as u64));
                emit_op(&mut st, &mut plan, 0x53); // MSTORE8
            }
            base += 32;
            continue;
        } else if literal_cost <= est_shl_cost(&segs) {
            emit_push_b(&mut st, &mut plan, literal);
        } else {
            let mut first = true;
            for &(s, e) in &segs {
                let suffix0s = 31 - e;
                emit_push_b(&mut st, &mut plan, &word[s..=e]);
                if suffix0s > 0 {
                    emit_push_n(&mut st, &mut plan, U256::from((suffix0s * 8) as u64));
                    emit_op(&mut st, &mut plan, 0x1B); // SHL
                }
                if !first {
                    emit_op(&mut st, &mut plan, 0x17); // OR
                }
                first = false;
            }
        }
        emit_push_n(&mut st, &mut plan, U256::from(base as u64));
        emit_op(&mut st, &mut plan, 0x52); // MSTORE

        base += 32;
    }

    st.begin_second_pass();

    let max_128_bit = U256::MAX.wrapping_shr(128);
    let mut pre_candidates: Vec<(U256, i64)> = st
        .stack_freq
        .iter()
        .filter(|&(&val, &freq)| {
            freq > 1 && val != U256::from(32u32) && val != U256::from(0xE0u32) && val <= max_128_bit
        })
        .map(|(&val, &freq)| (val, freq))
        .collect();
    // Deterministic: keyed by last-push ordinal (pass 1's insertion order),
    // not raw HashMap iteration order (spec.md §9, "Deterministic ordering").
    pre_candidates.sort_by_key(|&(val, _)| Reverse(*st.stack_cnt.get(&val).unwrap_or(&0)));

    for &(val, _) in pre_candidates.iter().take(MAX_PRE_PUSH) {
        st.push_n(val);
    }
    st.push_n(U256::from(1u32));

    for step in &plan {
        match step {
            PlanStep::Num(v) => st.push_n(*v),
            PlanStep::Bytes(b) => st.push_b(b),
            PlanStep::Op(o) => st.op(*o),
        }
    }

    // CALL trampoline stack (bottom to top): ..., retSize, retOffset, argsSize, argsOffset.
    st.op(0x5F); // PUSH0 retSize
    st.op(0x5F); // PUSH0 retOffset
    st.push_n(U256::from(original_len as u64)); // argsSize
    st.push_n(U256::from(padding as u64)); // argsOffset

    let mut out = Vec::with_capacity(st.ops.len() * 2 + JIT_TRAILER.len());
    for (i, &opcode) in st.ops.iter().enumerate() {
        out.push(opcode);
        if (0x60..=0x7F).contains(&opcode) {
            if let Some(d) = &st.data[i] {
                out.extend_from_slice(d);
            }
        }
    }
    out.extend_from_slice(&JIT_TRAILER);
    out
}

/// `jit_bytecode(hex) -> hex`.
pub fn jit_bytecode(data: &str) -> Result<String, HexError> {
    let bytes = hex::to_bytes(data)?;
    Ok(hex::to_hex(&jit_bytecode_bytes(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_epilogue_plus_fixed_prologue() {
        let out = jit_bytecode_bytes(&[]);
        assert!(out.ends_with(&JIT_TRAILER));
    }

    #[test]
    fn every_output_ends_with_the_epilogue() {
        for input in [
            vec![],
            vec![0x01],
            vec![0xde, 0xad, 0xbe, 0xef],
            vec![0x00; 64],
            (0u32..300).map(|i| i as u8).collect(),
        ] {
            let out = jit_bytecode_bytes(&input);
            assert!(out.ends_with(&JIT_TRAILER));
            assert_eq!(out.len() % 2, 0, "hex::to_hex always emits even-length hex, but byte length itself is not required to be even; this just sanity-checks the trailer boundary");
        }
    }

    #[test]
    fn public_entry_point_is_even_length_prefixed_hex() {
        let hex = jit_bytecode("0x1234abcd").unwrap();
        assert!(hex.starts_with("0x"));
        assert_eq!((hex.len() - 2) % 2, 0);
    }

    #[test]
    fn base_bytes_matches_expected_byte_counts() {
        assert_eq!(base_bytes(0), 1);
        assert_eq!(base_bytes(255), 1);
        assert_eq!(base_bytes(256), 2);
    }

    #[test]
    fn segments_split_on_zero_gaps() {
        let mut word = [0u8; 32];
        word[2] = 1;
        word[3] = 2;
        word[10] = 5;
        let segs = find_segments(&word);
        assert_eq!(segs, vec![(2, 3), (10, 10)]);
    }

    #[test]
    fn all_zero_word_has_no_segments() {
        assert!(find_segments(&[0u8; 32]).is_empty());
    }
}
