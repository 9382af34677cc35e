//! MOS 6502 CPU emulator (NMOS).
//!
//! Cycle-accurate emulation of the NMOS 6502, including decimal mode
//! and the undocumented opcodes. Dispatch is driven by a 256-entry
//! table mapping every opcode byte to an addressing mode, an operation
//! and a base cycle count; the step driver folds the dynamic cycle
//! penalties (page cross, branch taken, decimal adjust) on top.
//!
//! # Undocumented opcodes
//!
//! All 256 byte values execute. The stable undocumented groups (LAX,
//! SAX, the RMW combos SLO/RLA/SRE/RRA/DCP/ISC, the immediate-only
//! ANC/ALR/ARR/SBX, LAS) follow their widely documented behavior. The
//! unstable group (ANE, LXA, SHA, SHX, SHY, TAS) is undefined on real
//! silicon; this implementation adopts the commonly cited magic
//! constant conventions, documented at each operation. The JAM
//! encodings latch the processor until reset.

use emu65_core::{Bus, Cpu};

mod addressing;
mod flags;
mod opcodes;

pub use addressing::Mode;
pub use flags::Flags;
pub use opcodes::{Op, Opcode, OPCODES};

/// NMI vector address.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// RESET vector address.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector address.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Magic constant for ANE: `A = (A | 0xEF) & X & operand`.
const ANE_MAGIC: u8 = 0xEF;
/// Magic constant for LXA: `A = X = (A | 0xEE) & operand`.
const LXA_MAGIC: u8 = 0xEE;

/// The MOS 6502 CPU state.
///
/// Owns the registers, the six architectural flags, and the transient
/// per-instruction state. The bus is passed into each operation rather
/// than owned, so one bus can serve CPU and host-side device pumping.
pub struct Mos6502 {
    /// Accumulator
    pub(crate) a: u8,
    /// X index register
    pub(crate) x: u8,
    /// Y index register
    pub(crate) y: u8,
    /// Stack pointer (points into $0100-$01FF)
    pub(crate) sp: u8,
    /// Program counter
    pub(crate) pc: u16,
    /// Status flags (bits 4/5 synthesized on pack)
    pub(crate) flags: Flags,

    /// Opcode byte of the instruction being executed.
    opcode: u8,
    /// Effective address resolved by the addressing mode.
    effective_addr: u16,
    /// Set by an addressing mode that crossed a page boundary.
    penalty_address: bool,
    /// Set by an operation that pays the page-cross penalty.
    penalty_opcode: bool,
    /// Set by ADC/SBC when the decimal adjustment ran.
    decimal_extra: bool,
    /// Cycle count of the instruction being executed.
    cycles: u32,
    /// Latched by a JAM opcode; only reset() clears it.
    halted: bool,
}

impl Mos6502 {
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            flags: Flags::default(),
            opcode: 0,
            effective_addr: 0,
            penalty_address: false,
            penalty_opcode: false,
            decimal_extra: false,
            cycles: 0,
            halted: false,
        }
    }

    // =========================================================================
    // Public register accessors
    // =========================================================================

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Status byte with bit 5 set and bit 4 clear.
    pub fn status(&self) -> u8 {
        self.flags.to_byte(false)
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Load the status register from a byte, ignoring bits 4 and 5.
    pub fn set_status(&mut self, value: u8) {
        self.flags = Flags::from_byte(value);
    }

    // =========================================================================
    // Step driver
    // =========================================================================

    fn step_instruction(&mut self, bus: &mut impl Bus) -> u32 {
        if self.halted {
            return 0;
        }

        self.opcode = self.fetch(bus);
        self.penalty_address = false;
        self.penalty_opcode = false;
        self.decimal_extra = false;

        let Opcode { mode, op, cycles } = OPCODES[self.opcode as usize];
        self.cycles = u32::from(cycles);

        self.resolve(bus, mode);
        self.execute(bus, mode, op);

        if self.penalty_opcode && self.penalty_address {
            self.cycles += 1;
        }
        if self.decimal_extra {
            self.cycles += 1;
        }

        bus.tick(self.cycles);
        self.cycles
    }

    fn execute(&mut self, bus: &mut impl Bus, mode: Mode, op: Op) {
        match op {
            // Loads and stores
            Op::Lda => {
                self.penalty_opcode = true;
                self.a = self.operand(bus, mode);
                self.set_nz(self.a);
            }
            Op::Ldx => {
                self.penalty_opcode = true;
                self.x = self.operand(bus, mode);
                self.set_nz(self.x);
            }
            Op::Ldy => {
                self.penalty_opcode = true;
                self.y = self.operand(bus, mode);
                self.set_nz(self.y);
            }
            Op::Sta => self.put_operand(bus, mode, self.a),
            Op::Stx => self.put_operand(bus, mode, self.x),
            Op::Sty => self.put_operand(bus, mode, self.y),

            // Transfers
            Op::Tax => {
                self.x = self.a;
                self.set_nz(self.x);
            }
            Op::Tay => {
                self.y = self.a;
                self.set_nz(self.y);
            }
            Op::Txa => {
                self.a = self.x;
                self.set_nz(self.a);
            }
            Op::Tya => {
                self.a = self.y;
                self.set_nz(self.a);
            }
            Op::Tsx => {
                self.x = self.sp;
                self.set_nz(self.x);
            }
            // TXS is the one transfer that sets no flags.
            Op::Txs => self.sp = self.x,

            // Stack
            Op::Pha => self.push(bus, self.a),
            Op::Php => {
                // PHP pushes with B set, like BRK.
                let status = self.flags.to_byte(true);
                self.push(bus, status);
            }
            Op::Pla => {
                self.a = self.pull(bus);
                self.set_nz(self.a);
            }
            Op::Plp => {
                let status = self.pull(bus);
                self.flags = Flags::from_byte(status);
            }

            // Flag operations
            Op::Clc => self.flags.c = false,
            Op::Sec => self.flags.c = true,
            Op::Cli => self.flags.i = false,
            Op::Sei => self.flags.i = true,
            Op::Cld => self.flags.d = false,
            Op::Sed => self.flags.d = true,
            Op::Clv => self.flags.v = false,

            // Logic
            Op::And => {
                self.penalty_opcode = true;
                self.a &= self.operand(bus, mode);
                self.set_nz(self.a);
            }
            Op::Ora => {
                self.penalty_opcode = true;
                self.a |= self.operand(bus, mode);
                self.set_nz(self.a);
            }
            Op::Eor => {
                self.penalty_opcode = true;
                self.a ^= self.operand(bus, mode);
                self.set_nz(self.a);
            }
            Op::Bit => {
                let operand = self.operand(bus, mode);
                self.flags.z = self.a & operand == 0;
                self.flags.n = operand & 0x80 != 0;
                self.flags.v = operand & 0x40 != 0;
            }

            // Shifts and rotates
            Op::Asl => {
                let value = self.operand(bus, mode);
                let result = u16::from(value) << 1;
                self.set_czn(result);
                self.put_operand(bus, mode, result as u8);
            }
            Op::Lsr => {
                let value = self.operand(bus, mode);
                let result = value >> 1;
                self.flags.c = value & 0x01 != 0;
                self.set_nz(result);
                self.put_operand(bus, mode, result);
            }
            Op::Rol => {
                let value = self.operand(bus, mode);
                let result = u16::from(value) << 1 | u16::from(self.flags.c);
                self.set_czn(result);
                self.put_operand(bus, mode, result as u8);
            }
            Op::Ror => {
                let value = self.operand(bus, mode);
                let result = value >> 1 | if self.flags.c { 0x80 } else { 0 };
                self.flags.c = value & 0x01 != 0;
                self.set_nz(result);
                self.put_operand(bus, mode, result);
            }

            // Arithmetic
            Op::Adc => {
                self.penalty_opcode = true;
                let operand = self.operand(bus, mode);
                self.add_with_carry(operand);
            }
            Op::Sbc => {
                self.penalty_opcode = true;
                let operand = self.operand(bus, mode);
                self.sub_with_carry(operand);
            }

            // Compares
            Op::Cmp => {
                self.penalty_opcode = true;
                let operand = self.operand(bus, mode);
                self.compare(self.a, operand);
            }
            Op::Cpx => {
                let operand = self.operand(bus, mode);
                self.compare(self.x, operand);
            }
            Op::Cpy => {
                let operand = self.operand(bus, mode);
                self.compare(self.y, operand);
            }

            // Increment / decrement
            Op::Inc => {
                let result = self.operand(bus, mode).wrapping_add(1);
                self.set_nz(result);
                self.put_operand(bus, mode, result);
            }
            Op::Dec => {
                let result = self.operand(bus, mode).wrapping_sub(1);
                self.set_nz(result);
                self.put_operand(bus, mode, result);
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_nz(self.x);
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_nz(self.x);
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                self.set_nz(self.y);
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.set_nz(self.y);
            }

            // Branches
            Op::Bpl => self.branch_if(!self.flags.n),
            Op::Bmi => self.branch_if(self.flags.n),
            Op::Bvc => self.branch_if(!self.flags.v),
            Op::Bvs => self.branch_if(self.flags.v),
            Op::Bcc => self.branch_if(!self.flags.c),
            Op::Bcs => self.branch_if(self.flags.c),
            Op::Bne => self.branch_if(!self.flags.z),
            Op::Beq => self.branch_if(self.flags.z),

            // Jumps and subroutines
            Op::Jmp => self.pc = self.effective_addr,
            Op::Jsr => {
                // Push the address of the last operand byte.
                let return_addr = self.pc.wrapping_sub(1);
                self.push_word(bus, return_addr);
                self.pc = self.effective_addr;
            }
            Op::Rts => {
                self.pc = self.pull_word(bus).wrapping_add(1);
            }
            Op::Rti => {
                // Unlike RTS, the pulled PC is used as-is.
                let status = self.pull(bus);
                self.flags = Flags::from_byte(status);
                self.pc = self.pull_word(bus);
            }

            Op::Brk => {
                // The pushed PC points one byte past the padding byte.
                self.pc = self.pc.wrapping_add(1);
                self.push_word(bus, self.pc);
                let status = self.flags.to_byte(true);
                self.push(bus, status);
                self.flags.i = true;
                self.pc = self.read_word(bus, IRQ_VECTOR);
            }

            Op::Nop => {
                // The abs,X forms of the undocumented NOPs pay the
                // page-cross penalty; the rest do not.
                if matches!(self.opcode, 0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC) {
                    self.penalty_opcode = true;
                }
            }

            Op::Jam => self.halted = true,

            // Undocumented: RMW combos. Each is its RMW half followed by
            // the read half on the written value. They always take the
            // RMW cycle count, so the page-cross penalty is cleared.
            Op::Slo => {
                // ASL then ORA
                let value = self.operand(bus, mode);
                let result = u16::from(value) << 1;
                self.set_czn(result);
                let result = result as u8;
                self.put_operand(bus, mode, result);
                self.a |= result;
                self.set_nz(self.a);
                self.penalty_opcode = false;
            }
            Op::Rla => {
                // ROL then AND
                let value = self.operand(bus, mode);
                let result = u16::from(value) << 1 | u16::from(self.flags.c);
                self.set_czn(result);
                let result = result as u8;
                self.put_operand(bus, mode, result);
                self.a &= result;
                self.set_nz(self.a);
                self.penalty_opcode = false;
            }
            Op::Sre => {
                // LSR then EOR
                let value = self.operand(bus, mode);
                self.flags.c = value & 0x01 != 0;
                let result = value >> 1;
                self.put_operand(bus, mode, result);
                self.a ^= result;
                self.set_nz(self.a);
                self.penalty_opcode = false;
            }
            Op::Rra => {
                // ROR then ADC of the rotated value; the carry the ADC
                // consumes is the one ROR just produced. The decimal
                // extra cycle is already inside the RMW count.
                let value = self.operand(bus, mode);
                let result = value >> 1 | if self.flags.c { 0x80 } else { 0 };
                self.flags.c = value & 0x01 != 0;
                self.put_operand(bus, mode, result);
                self.add_with_carry(result);
                self.penalty_opcode = false;
                self.decimal_extra = false;
            }
            Op::Dcp => {
                // DEC then CMP
                let result = self.operand(bus, mode).wrapping_sub(1);
                self.put_operand(bus, mode, result);
                self.compare(self.a, result);
                self.penalty_opcode = false;
            }
            Op::Isc => {
                // INC then SBC
                let result = self.operand(bus, mode).wrapping_add(1);
                self.put_operand(bus, mode, result);
                self.sub_with_carry(result);
                self.penalty_opcode = false;
                self.decimal_extra = false;
            }

            // Undocumented: stable
            Op::Sax => {
                let value = self.a & self.x;
                self.put_operand(bus, mode, value);
            }
            Op::Lax => {
                // LDA and LDX of the same operand.
                self.penalty_opcode = true;
                let value = self.operand(bus, mode);
                self.a = value;
                self.x = value;
                self.set_nz(value);
            }
            Op::Anc => {
                // AND, then carry mirrors the sign bit.
                self.penalty_opcode = true;
                self.a &= self.operand(bus, mode);
                self.set_nz(self.a);
                self.flags.c = self.a & 0x80 != 0;
            }
            Op::Alr => {
                // AND, then LSR A.
                self.penalty_opcode = true;
                self.a &= self.operand(bus, mode);
                self.flags.c = self.a & 0x01 != 0;
                self.a >>= 1;
                self.set_nz(self.a);
            }
            Op::Arr => {
                let operand = self.operand(bus, mode);
                self.penalty_opcode = true;
                self.arr(operand);
            }
            Op::Sbx => {
                // X = (A & X) - operand, carry from the unsigned compare.
                let operand = self.operand(bus, mode);
                self.x &= self.a;
                self.compare(self.x, operand);
                self.x = self.x.wrapping_sub(operand);
            }
            Op::Las => {
                // A, X and SP all become operand & SP.
                self.penalty_opcode = true;
                let value = self.operand(bus, mode) & self.sp;
                self.a = value;
                self.x = value;
                self.sp = value;
                self.set_nz(value);
            }

            // Undocumented: unstable on silicon. These adopt the common
            // conventions; see the crate docs.
            Op::Ane => {
                let operand = self.operand(bus, mode);
                self.a = (self.a | ANE_MAGIC) & self.x & operand;
                self.set_nz(self.a);
            }
            Op::Lxa => {
                let operand = self.operand(bus, mode);
                let value = (self.a | LXA_MAGIC) & operand;
                self.a = value;
                self.x = value;
                self.set_nz(value);
            }
            Op::Sha => {
                // Store A & X & (high byte of the target + 1).
                let value = self.a & self.x & ((self.effective_addr >> 8) as u8).wrapping_add(1);
                self.put_operand(bus, mode, value);
            }
            Op::Shx => self.sh_store(bus, mode, self.x, self.y),
            Op::Shy => self.sh_store(bus, mode, self.y, self.x),
            Op::Tas => {
                // SP = A & X, then store SP & (high byte + 1).
                self.sp = self.a & self.x;
                let value = self.sp & ((self.effective_addr >> 8) as u8).wrapping_add(1);
                self.put_operand(bus, mode, value);
            }
        }
    }

    // =========================================================================
    // ALU helpers
    // =========================================================================

    /// ADC core, shared with RRA.
    ///
    /// In decimal mode the Z flag comes from the binary sum while N and
    /// V come from the partially adjusted intermediate — the NMOS chip
    /// computes them before the high-nibble fixup.
    fn add_with_carry(&mut self, operand: u8) {
        let carry = u16::from(self.flags.c);
        let binary = u16::from(self.a) + u16::from(operand) + carry;
        self.flags.z = binary as u8 == 0;

        if !self.flags.d {
            self.flags.c = binary > 0xFF;
            self.set_v_add(binary, self.a, operand);
            self.flags.n = binary as u8 & 0x80 != 0;
            self.a = binary as u8;
        } else {
            let mut result = u16::from(self.a & 0x0F) + u16::from(operand & 0x0F) + carry;
            if result >= 0x0A {
                result = ((result + 0x06) & 0x0F) + 0x10;
            }
            result += u16::from(self.a & 0xF0) + u16::from(operand & 0xF0);

            self.flags.n = result as u8 & 0x80 != 0;
            self.set_v_add(result, self.a, operand);

            if result >= 0xA0 {
                result += 0x60;
            }
            self.flags.c = result > 0xFF;
            self.a = result as u8;
            self.decimal_extra = true;
        }
    }

    /// SBC core, shared with ISC. C, Z, N and V always come from the
    /// binary result; only the stored accumulator gets the decimal
    /// adjustment.
    fn sub_with_carry(&mut self, operand: u8) {
        let borrow = i16::from(self.flags.c) - 1;
        let inverted = operand ^ 0xFF;
        let binary = u16::from(self.a) + u16::from(inverted) + u16::from(self.flags.c);

        self.set_czn(binary);
        self.set_v_add(binary, self.a, inverted);

        if self.flags.d {
            let mut low = i16::from(self.a & 0x0F) - i16::from(operand & 0x0F) + borrow;
            if low < 0 {
                low = ((low - 0x06) & 0x0F) - 0x10;
            }
            let mut result = i16::from(self.a & 0xF0) - i16::from(operand & 0xF0) + low;
            if result < 0 {
                result -= 0x60;
            }
            self.a = result as u8;
            self.decimal_extra = true;
        } else {
            self.a = binary as u8;
        }
    }

    /// ARR: AND, ROR A, then carry/overflow derived from bits 6 and 5
    /// of the rotated value — with its own decimal fixup path.
    fn arr(&mut self, operand: u8) {
        self.a &= operand;
        let old_a = self.a;
        self.a = self.a >> 1 | if self.flags.c { 0x80 } else { 0 };
        self.set_nz(self.a);

        if !self.flags.d {
            self.flags.c = self.a & 0x40 != 0;
            self.flags.v = self.flags.c != (self.a & 0x20 != 0);
        } else {
            self.flags.v = (self.a ^ old_a) & 0x40 != 0;

            if (old_a & 0x0F) + (old_a & 0x01) > 0x05 {
                self.a = (self.a & 0xF0) | (self.a.wrapping_add(0x06) & 0x0F);
            }
            if u16::from(old_a) + u16::from(old_a & 0x10) >= 0x60 {
                self.a = self.a.wrapping_add(0x60);
                self.flags.c = true;
            } else {
                self.flags.c = false;
            }
        }
    }

    /// SHX/SHY store: `reg & (high byte of the unindexed base + 1)`.
    ///
    /// On a page cross the stored value also replaces the high byte of
    /// the target address. One of several observed conventions; real
    /// silicon is unstable here.
    fn sh_store(&mut self, bus: &mut impl Bus, mode: Mode, reg: u8, index: u8) {
        let base = self.effective_addr.wrapping_sub(u16::from(index));
        let value = reg & ((base >> 8) as u8).wrapping_add(1);
        if (base & 0x00FF) + u16::from(index) > 0xFF {
            self.effective_addr = (self.effective_addr & 0x00FF) | (u16::from(value) << 8);
        }
        self.put_operand(bus, mode, value);
    }

    // =========================================================================
    // Interrupt entry
    // =========================================================================

    /// Common IRQ/NMI entry: push PC and status (B clear), set I, load
    /// the vector. The D flag is left alone — NMOS does not clear it.
    fn enter_interrupt(&mut self, bus: &mut impl Bus, vector: u16) {
        self.push_word(bus, self.pc);
        let status = self.flags.to_byte(false);
        self.push(bus, status);
        self.flags.i = true;
        self.pc = self.read_word(bus, vector);
    }
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bus> Cpu<B> for Mos6502 {
    fn step(&mut self, bus: &mut B) -> u32 {
        self.step_instruction(bus)
    }

    fn reset(&mut self, bus: &mut B) -> u32 {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.flags = Flags::default();
        self.halted = false;
        self.pc = self.read_word(bus, RESET_VECTOR);
        7
    }

    fn irq(&mut self, bus: &mut B) -> u32 {
        if self.flags.i {
            return 0;
        }
        self.enter_interrupt(bus, IRQ_VECTOR);
        7
    }

    fn nmi(&mut self, bus: &mut B) -> u32 {
        self.enter_interrupt(bus, NMI_VECTOR);
        7
    }

    fn pc(&self) -> u16 {
        self.pc
    }
}
