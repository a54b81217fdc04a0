//! Error types surfaced by the bus and the conformance harness.
//!
//! The CPU's instruction/addressing state machine itself cannot fail: every
//! byte is a legal opcode and every 8-bit value is a legal operand. Failures
//! only originate at the bus (an address nobody mapped, or a state-machine
//! bug that issues more than one access in a cycle) or in the conformance
//! harness (a recorded trace or final register state that disagrees with a
//! known-good test case).

use crate::bus::{BusKind, BusTransaction};

/// Errors the core can report. Ordered here by decreasing severity, matching
/// the severity ordering the harness uses when deciding whether to abort.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A bus access reached no mapping. Fatal to the current run.
    #[error("unmapped address {addr:#06x} ({kind:?})")]
    UnmappedAddress { addr: u16, kind: BusKind },

    /// More than one bus access happened in a single cycle. Indicates a bug
    /// in the CPU state machine; the corpus is the oracle, so this is
    /// reported but does not stop the run.
    #[error("bus conflict at cycle {cycle}: {accesses} accesses")]
    BusConflict { cycle: usize, accesses: u8 },

    /// A recorded bus transaction differs from the expected one.
    /// Conformance-only.
    #[error("trace mismatch at index {index}: expected {expected:?}, got {got:?}")]
    TraceMismatch {
        index: usize,
        expected: BusTransaction,
        got: BusTransaction,
    },

    /// Final register or RAM state differs from the expected one.
    /// Conformance-only.
    #[error("state mismatch on {field}: expected {expected:#x}, got {got:#x}")]
    StateMismatch {
        field: &'static str,
        expected: u32,
        got: u32,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
