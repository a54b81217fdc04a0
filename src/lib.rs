//! Cycle-accurate MOS 6502 ("NES 6502", no decimal mode) core.
//!
//! Internal library, not published or exposed externally. A scheduler
//! outside this crate owns a [`bus::Bus`] and a [`cpu::Cpu`], calls
//! `bus.start_cycle()` then `cpu.tick(&mut bus)` exactly once per master
//! cycle, and wires `trigger_rst`/`trigger_nmi`/`trigger_irq` to whatever
//! surrounding hardware (video unit, audio unit, cartridge mapper) raises
//! those lines. Everything outside the CPU/bus/memory-device triad — the
//! video and audio units, the cartridge/mapper layer, host I/O, cartridge
//! image parsing, and the conformance corpus's file-reading test runner —
//! is out of scope for this crate; see `conformance` for the corpus *shape*
//! this crate verifies itself against.

pub mod bus;
pub mod conformance;
pub mod cpu;
pub mod error;
pub mod memory;
