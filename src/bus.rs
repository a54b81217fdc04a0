//! Address-decoded routing between the CPU and its memory-mapped devices.
//!
//! The bus holds an ordered list of `{start, end, device}` mappings and
//! dispatches each read or write to the first mapping whose range contains
//! the address, first-match-wins so a caller can layer a mirror or override
//! in front of a larger region. It also keeps a transaction log and a
//! per-cycle access counter so a scheduler (or the conformance harness) can
//! detect a CPU state machine issuing more than one access in a cycle.

use crate::error::CoreError;
use crate::memory::Device;

/// Direction of a single bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    Read,
    Write,
}

/// A single recorded read or write, in the shape the SingleStepTests corpus
/// uses for its `cycles` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusTransaction {
    pub addr: u16,
    pub val: u8,
    pub kind: BusKind,
}

struct Mapping {
    start: u16,
    end: u16,
    device: Box<dyn Device>,
}

/// Central bus. Owned by the scheduler, which also owns the CPU and passes
/// `&mut Bus` into `Cpu::tick` for the duration of each call.
pub struct Bus {
    mappings: Vec<Mapping>,
    log: Vec<BusTransaction>,
    access_counts: Vec<u8>,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            mappings: Vec::new(),
            log: Vec::new(),
            access_counts: Vec::new(),
        }
    }

    /// Register a device over an inclusive address range. Earlier mappings
    /// take priority over later, overlapping ones.
    pub fn map(&mut self, start: u16, end: u16, device: Box<dyn Device>) {
        self.mappings.push(Mapping { start, end, device });
    }

    /// Open a new slot in the access log. Must be called by the scheduler
    /// exactly once per CPU tick, before the tick itself.
    pub fn start_cycle(&mut self) {
        self.access_counts.push(0);
    }

    fn record(&mut self, addr: u16, val: u8, kind: BusKind) {
        self.log.push(BusTransaction { addr, val, kind });
        if let Some(count) = self.access_counts.last_mut() {
            *count += 1;
        }
    }

    /// Fallible read. Returns `UnmappedAddress` instead of panicking.
    pub fn try_read(&mut self, addr: u16) -> Result<u8, CoreError> {
        let start = self
            .mappings
            .iter()
            .position(|m| addr >= m.start && addr <= m.end)
            .ok_or(CoreError::UnmappedAddress {
                addr,
                kind: BusKind::Read,
            })?;
        let mapping = &mut self.mappings[start];
        let val = mapping.device.read(addr - mapping.start);
        self.record(addr, val, BusKind::Read);
        Ok(val)
    }

    /// Fallible write. Returns `UnmappedAddress` instead of panicking.
    pub fn try_write(&mut self, addr: u16, val: u8) -> Result<(), CoreError> {
        let start = self
            .mappings
            .iter()
            .position(|m| addr >= m.start && addr <= m.end)
            .ok_or(CoreError::UnmappedAddress {
                addr,
                kind: BusKind::Write,
            })?;
        let mapping = &mut self.mappings[start];
        mapping.device.write(addr - mapping.start, val);
        self.record(addr, val, BusKind::Write);
        Ok(())
    }

    /// Read used by the CPU's hot path. Panics on an unmapped address, the
    /// same way the original core has no recoverable path at the bus level.
    pub fn read(&mut self, addr: u16) -> u8 {
        match self.try_read(addr) {
            Ok(val) => val,
            Err(_) => panic!("bus: read from unmapped address {addr:#06x}"),
        }
    }

    /// Write used by the CPU's hot path. Panics on an unmapped address.
    pub fn write(&mut self, addr: u16, val: u8) {
        if self.try_write(addr, val).is_err() {
            panic!("bus: write to unmapped address {addr:#06x}");
        }
    }

    pub fn log(&self) -> &[BusTransaction] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.access_counts.clear();
    }

    /// True iff the recorded log matches `expected` element-for-element and
    /// every cycle performed exactly one access.
    pub fn verify_trace(&self, expected: &[BusTransaction]) -> bool {
        self.log == expected && self.access_counts.iter().all(|&c| c == 1)
    }

    /// Like `verify_trace`, but collects every discrepancy instead of
    /// stopping at the first one, mirroring the original's
    /// `analyse_operations`.
    pub fn analyse_trace(&self, expected: &[BusTransaction]) -> Vec<CoreError> {
        let mut errors = Vec::new();
        for (index, exp) in expected.iter().enumerate() {
            match self.log.get(index) {
                Some(got) if got == exp => {}
                Some(got) => errors.push(CoreError::TraceMismatch {
                    index,
                    expected: *exp,
                    got: *got,
                }),
                None => errors.push(CoreError::TraceMismatch {
                    index,
                    expected: *exp,
                    got: BusTransaction {
                        addr: 0,
                        val: 0,
                        kind: BusKind::Read,
                    },
                }),
            }
        }
        errors.extend(self.conflicts());
        errors
    }

    /// Cycles that recorded more than (or fewer than) one access.
    pub fn conflicts(&self) -> Vec<CoreError> {
        self.access_counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count != 1)
            .map(|(cycle, &accesses)| CoreError::BusConflict { cycle, accesses })
            .collect()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
