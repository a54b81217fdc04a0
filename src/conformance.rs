//! Types matching the SingleStepTests / ProcessorTests JSON shape.
//!
//! Deserializing a directory of `.json` fixture files is explicitly out of
//! scope (the test runner and its file I/O belong to the external harness);
//! these types exist so an in-repo test can express a literal fixture inline
//! as a Rust value, or a host harness can `serde_json::from_str` a fixture it
//! read itself and drive it through [`run_case`].

use serde::Deserialize;

use crate::bus::{Bus, BusKind, BusTransaction};
use crate::cpu::{Cpu, CpuRegisters};
use crate::error::CoreError;
use crate::memory::Ram;

/// One `[addr, value]` pair from a test case's `ram` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RamEntry(pub u16, pub u8);

/// The `initial` or `final` register/memory snapshot of a test case.
#[derive(Debug, Clone, Deserialize)]
pub struct StateSnapshot {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
    pub ram: Vec<RamEntry>,
}

impl StateSnapshot {
    pub fn registers(&self) -> CpuRegisters {
        CpuRegisters {
            pc: self.pc,
            a: self.a,
            x: self.x,
            y: self.y,
            s: self.s,
            p: self.p,
        }
    }
}

/// One `[addr, val, "read" | "write"]` triple from a test case's `cycles`
/// list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleEntry {
    pub addr: u16,
    pub val: u8,
    pub kind: BusKind,
}

impl<'de> Deserialize<'de> for CycleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (addr, val, kind): (u16, u8, String) = Deserialize::deserialize(deserializer)?;
        let kind = match kind.as_str() {
            "read" => BusKind::Read,
            "write" => BusKind::Write,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown cycle kind {other:?}, expected \"read\" or \"write\""
                )))
            }
        };
        Ok(CycleEntry { addr, val, kind })
    }
}

impl From<CycleEntry> for BusTransaction {
    fn from(entry: CycleEntry) -> Self {
        BusTransaction {
            addr: entry.addr,
            val: entry.val,
            kind: entry.kind,
        }
    }
}

/// One SingleStepTests test case: `{name, initial, final, cycles}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub name: String,
    pub initial: StateSnapshot,
    #[serde(rename = "final")]
    pub expected_final: StateSnapshot,
    pub cycles: Vec<CycleEntry>,
}

/// Outcome of running one [`TestCase`] through a fresh `Cpu`/`Bus` pair.
#[derive(Debug, Default)]
pub struct CaseResult {
    pub errors: Vec<CoreError>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Build a 64 KiB flat-RAM bus seeded from a snapshot's `ram` list, matching
/// the corpus's convention of addressing the whole 16-bit space as plain
/// memory (no mappers, no mirroring) so every opcode/addressing-mode
/// combination can be exercised without a real cartridge.
fn bus_from_snapshot(snapshot: &StateSnapshot) -> Bus {
    let mut ram = Ram::new(0x10000);
    for entry in &snapshot.ram {
        ram.bytes_mut()[entry.0 as usize] = entry.1;
    }
    let mut bus = Bus::new();
    bus.map(0x0000, 0xFFFF, Box::new(ram));
    bus
}

/// Run a single test case to completion and collect every discrepancy:
/// trace mismatches, bus conflicts, final register mismatches, and final RAM
/// mismatches. Mirrors the original's `analyse_state`/`analyse_operations`,
/// which report every discrepancy rather than stopping at the first.
pub fn run_case(case: &TestCase) -> CaseResult {
    let mut bus = bus_from_snapshot(&case.initial);
    let mut cpu = Cpu::new();
    cpu.load_state(case.initial.registers());

    bus.clear_log();
    bus.start_cycle();
    cpu.tick(&mut bus);
    while cpu.mid_instruction() {
        bus.start_cycle();
        cpu.tick(&mut bus);
    }

    let expected_trace: Vec<BusTransaction> = case.cycles.iter().map(|&c| c.into()).collect();
    let mut errors = bus.analyse_trace(&expected_trace);
    errors.extend(cpu.analyse_state(&case.expected_final.registers()));

    for entry in &case.expected_final.ram {
        let got = bus.read(entry.0);
        if got != entry.1 {
            errors.push(CoreError::StateMismatch {
                field: "ram",
                expected: entry.1 as u32,
                got: got as u32,
            });
        }
    }

    CaseResult { errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_a_single_step_tests_shaped_case() {
        let json = r#"{
            "name": "69 05",
            "initial": {"pc": 512, "a": 16, "x": 0, "y": 0, "s": 253, "p": 32, "ram": [[512, 105], [513, 5]]},
            "final":   {"pc": 514, "a": 21, "x": 0, "y": 0, "s": 253, "p": 32, "ram": [[512, 105], [513, 5]]},
            "cycles": [[512, 105, "read"], [513, 5, "read"]]
        }"#;
        let case: TestCase = serde_json::from_str(json).unwrap();
        assert_eq!(case.initial.a, 16);
        assert_eq!(case.cycles[0].kind, BusKind::Read);
    }

    #[test]
    fn test_run_case_passes_for_adc_immediate() {
        let json = r#"{
            "name": "adc",
            "initial": {"pc": 512, "a": 16, "x": 0, "y": 0, "s": 253, "p": 32, "ram": [[512, 105], [513, 5]]},
            "final":   {"pc": 514, "a": 21, "x": 0, "y": 0, "s": 253, "p": 32, "ram": [[512, 105], [513, 5]]},
            "cycles": [[512, 105, "read"], [513, 5, "read"]]
        }"#;
        let case: TestCase = serde_json::from_str(json).unwrap();
        let result = run_case(&case);
        assert!(result.passed(), "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_run_case_reports_trace_mismatch() {
        let json = r#"{
            "name": "bad trace",
            "initial": {"pc": 512, "a": 16, "x": 0, "y": 0, "s": 253, "p": 32, "ram": [[512, 105], [513, 5]]},
            "final":   {"pc": 514, "a": 21, "x": 0, "y": 0, "s": 253, "p": 32, "ram": [[512, 105], [513, 5]]},
            "cycles": [[512, 105, "write"], [513, 5, "read"]]
        }"#;
        let case: TestCase = serde_json::from_str(json).unwrap();
        let result = run_case(&case);
        assert!(!result.passed());
        assert!(result
            .errors
            .iter()
            .any(|e| matches!(e, CoreError::TraceMismatch { .. })));
    }
}
