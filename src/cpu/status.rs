//! The `P` processor status register.

use bitflags::bitflags;

bitflags! {
    /// Bit layout (bit 7 -> bit 0): N V _ B _ I Z C.
    ///
    /// `BREAK` is never stored live in a [`Cpu`](super::Cpu)'s `p` field; it
    /// is only forced to 1 in the byte pushed by BRK/PHP and forced to 0 in
    /// the byte pushed by an IRQ/NMI service routine. `UNUSED` always reads
    /// back as 1.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const CARRY             = 0b0000_0001;
        const ZERO               = 0b0000_0010;
        const INTERRUPT_DISABLE  = 0b0000_0100;
        const DECIMAL            = 0b0000_1000;
        const BREAK              = 0b0001_0000;
        const UNUSED             = 0b0010_0000;
        const OVERFLOW           = 0b0100_0000;
        const NEGATIVE           = 0b1000_0000;
    }
}

impl Status {
    /// Power-on/reset value: interrupts disabled, unused bit set.
    pub const POWER_ON: Status = Status::from_bits_truncate(0x24);

    pub fn set_flag(&mut self, flag: Status, condition: bool) {
        self.set(flag, condition);
    }

    /// N and Z from a result byte, as every load/transfer/ALU op does.
    pub fn set_nz(&mut self, result: u8) {
        self.set(Status::ZERO, result == 0);
        self.set(Status::NEGATIVE, result & 0x80 != 0);
    }

    /// The byte pushed to the stack by BRK/PHP/an interrupt service
    /// routine: B forced per `brk`, unused always 1.
    pub fn to_pushed_byte(self, brk: bool) -> u8 {
        let mut pushed = self | Status::UNUSED;
        pushed.set(Status::BREAK, brk);
        pushed.bits()
    }

    /// The live register value after pulling `byte` via PLP/RTI: B is
    /// discarded, unused is forced back to 1.
    pub fn from_pulled_byte(byte: u8) -> Status {
        (Status::from_bits_truncate(byte) | Status::UNUSED) & !Status::BREAK
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::POWER_ON
    }
}
