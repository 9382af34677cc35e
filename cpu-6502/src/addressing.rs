//! 6502 addressing modes.
//!
//! The 6502 has 13 addressing encodings:
//! - Implied: No operand (e.g., CLC, RTS)
//! - Accumulator: Operates on A register (e.g., ASL A)
//! - Immediate: #$nn (literal value)
//! - Zero Page: $nn (8-bit address in page zero)
//! - Zero Page,X: $nn,X (8-bit address + X, wraps in page zero)
//! - Zero Page,Y: $nn,Y (8-bit address + Y, wraps in page zero)
//! - Relative: Branch offset (-128 to +127)
//! - Absolute: $nnnn (16-bit address)
//! - Absolute,X: $nnnn,X (16-bit address + X, may cross page)
//! - Absolute,Y: $nnnn,Y (16-bit address + Y, may cross page)
//! - Indirect: ($nnnn) (JMP only, buggy page boundary behavior)
//! - Indexed Indirect: ($nn,X) (pointer in zero page indexed by X)
//! - Indirect Indexed: ($nn),Y (zero page pointer + Y)
//!
//! Three distinct wrapping rules live here and are easy to conflate:
//! the indirect-JMP pointer wraps within its page, the ($nn,X) pointer
//! wraps within zero page, and the ($nn),Y pointer's second byte wraps
//! within zero page.

use crate::Mos6502;
use emu65_core::Bus;

/// Addressing mode of an opcode table entry.
///
/// `resolve` consumes the operand bytes for the mode, advances PC past
/// them, and leaves the operand location in `effective_addr`. The
/// indexed modes that can cross a page boundary set `penalty_address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
}

impl Mos6502 {
    /// Fetch the next byte at PC and increment PC.
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Fetch a 16-bit word (little-endian) at PC.
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.fetch(bus);
        let high = self.fetch(bus);
        u16::from_le_bytes([low, high])
    }

    /// Read a 16-bit word from memory (little-endian).
    pub(crate) fn read_word(&self, bus: &mut impl Bus, addr: u16) -> u16 {
        let low = bus.read(addr);
        let high = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Push a byte onto the stack.
    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(0x0100 | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Pull a byte from the stack.
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(0x0100 | u16::from(self.sp))
    }

    /// Push a 16-bit word onto the stack (high byte first).
    ///
    /// SP wraps within page 1: pushing at SP=$00 writes $0100 then
    /// $01FF.
    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    /// Pull a 16-bit word from the stack (low byte first).
    pub(crate) fn pull_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.pull(bus);
        let high = self.pull(bus);
        u16::from_le_bytes([low, high])
    }

    /// Compute the effective address for `mode`, consuming operand
    /// bytes at PC.
    pub(crate) fn resolve(&mut self, bus: &mut impl Bus, mode: Mode) {
        match mode {
            // No effective address; the operand is absent or in A.
            Mode::Implied | Mode::Accumulator => {}
            Mode::Immediate => {
                self.effective_addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
            }
            Mode::ZeroPage => {
                self.effective_addr = u16::from(self.fetch(bus));
            }
            Mode::ZeroPageX => {
                self.effective_addr = u16::from(self.fetch(bus).wrapping_add(self.x));
            }
            Mode::ZeroPageY => {
                self.effective_addr = u16::from(self.fetch(bus).wrapping_add(self.y));
            }
            Mode::Relative => {
                let offset = self.fetch(bus) as i8;
                self.effective_addr = self.pc.wrapping_add(offset as u16);
            }
            Mode::Absolute => {
                self.effective_addr = self.fetch_word(bus);
            }
            Mode::AbsoluteX => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.x));
                self.penalty_address = base & 0xFF00 != addr & 0xFF00;
                self.effective_addr = addr;
            }
            Mode::AbsoluteY => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.y));
                self.penalty_address = base & 0xFF00 != addr & 0xFF00;
                self.effective_addr = addr;
            }
            Mode::Indirect => {
                // JMP ($xxFF) fetches its high byte from $xx00: the
                // pointer's low byte wraps without carrying into the
                // high byte.
                let ptr = self.fetch_word(bus);
                let ptr_hi = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                let low = bus.read(ptr);
                let high = bus.read(ptr_hi);
                self.effective_addr = u16::from_le_bytes([low, high]);
            }
            Mode::IndexedIndirect => {
                // Pointer at (operand + X), both bytes wrapping within
                // zero page.
                let ptr = self.fetch(bus).wrapping_add(self.x);
                let low = bus.read(u16::from(ptr));
                let high = bus.read(u16::from(ptr.wrapping_add(1)));
                self.effective_addr = u16::from_le_bytes([low, high]);
            }
            Mode::IndirectIndexed => {
                // Pointer at operand, second byte wrapping within zero
                // page, then indexed by Y.
                let ptr = self.fetch(bus);
                let low = bus.read(u16::from(ptr));
                let high = bus.read(u16::from(ptr.wrapping_add(1)));
                let base = u16::from_le_bytes([low, high]);
                let addr = base.wrapping_add(u16::from(self.y));
                self.penalty_address = base & 0xFF00 != addr & 0xFF00;
                self.effective_addr = addr;
            }
        }
    }

    /// Read the operand for the current instruction.
    pub(crate) fn operand(&mut self, bus: &mut impl Bus, mode: Mode) -> u8 {
        if mode == Mode::Accumulator {
            self.a
        } else {
            bus.read(self.effective_addr)
        }
    }

    /// Write the operand back for the current instruction.
    pub(crate) fn put_operand(&mut self, bus: &mut impl Bus, mode: Mode, value: u8) {
        if mode == Mode::Accumulator {
            self.a = value;
        } else {
            bus.write(self.effective_addr, value);
        }
    }

    /// Execute a branch to the resolved target if `condition` holds.
    ///
    /// A taken branch costs 1 extra cycle, plus 1 more when the target
    /// sits on a different page from the branch instruction itself
    /// (PC - 1 is the operand byte of the two-byte branch).
    pub(crate) fn branch_if(&mut self, condition: bool) {
        if condition {
            self.cycles += 1;
            if self.pc.wrapping_sub(1) & 0xFF00 != self.effective_addr & 0xFF00 {
                self.cycles += 1;
            }
            self.pc = self.effective_addr;
        }
    }
}
