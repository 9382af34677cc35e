//! The 256-entry opcode dispatch table.
//!
//! Every byte value has an entry, including all undocumented encodings:
//! there is no "invalid instruction" path. Each entry names the
//! addressing mode, the operation, and the base cycle count from the
//! published NMOS tables. Dynamic cycle additions (branch taken, page
//! cross, decimal adjust) are applied by the step driver.

use crate::addressing::Mode;

/// Operation selector for the dispatch table.
///
/// The first group is the 56 documented operations; the second group is
/// the undocumented operations with stable, modeled behavior. `Jam`
/// covers the twelve encodings that freeze the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // Documented
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Undocumented
    Alr,
    Anc,
    Ane,
    Arr,
    Dcp,
    Isc,
    Jam,
    Las,
    Lax,
    Lxa,
    Rla,
    Rra,
    Sax,
    Sbx,
    Sha,
    Shx,
    Shy,
    Slo,
    Sre,
    Tas,
}

/// One opcode table entry: addressing mode, operation, base cycles.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    pub mode: Mode,
    pub op: Op,
    pub cycles: u8,
}

const fn entry(mode: Mode, op: Op, cycles: u8) -> Opcode {
    Opcode { mode, op, cycles }
}

use Mode::*;

/// The complete NMOS 6502 opcode map.
#[rustfmt::skip]
pub const OPCODES: [Opcode; 256] = [
    // 0x00 - 0x0F
    entry(Implied,         Op::Brk, 7),
    entry(IndexedIndirect, Op::Ora, 6),
    entry(Implied,         Op::Jam, 2),
    entry(IndexedIndirect, Op::Slo, 8),
    entry(ZeroPage,        Op::Nop, 3),
    entry(ZeroPage,        Op::Ora, 3),
    entry(ZeroPage,        Op::Asl, 5),
    entry(ZeroPage,        Op::Slo, 5),
    entry(Implied,         Op::Php, 3),
    entry(Immediate,       Op::Ora, 2),
    entry(Accumulator,     Op::Asl, 2),
    entry(Immediate,       Op::Anc, 2),
    entry(Absolute,        Op::Nop, 4),
    entry(Absolute,        Op::Ora, 4),
    entry(Absolute,        Op::Asl, 6),
    entry(Absolute,        Op::Slo, 6),
    // 0x10 - 0x1F
    entry(Relative,        Op::Bpl, 2),
    entry(IndirectIndexed, Op::Ora, 5),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Slo, 8),
    entry(ZeroPageX,       Op::Nop, 4),
    entry(ZeroPageX,       Op::Ora, 4),
    entry(ZeroPageX,       Op::Asl, 6),
    entry(ZeroPageX,       Op::Slo, 6),
    entry(Implied,         Op::Clc, 2),
    entry(AbsoluteY,       Op::Ora, 4),
    entry(Implied,         Op::Nop, 2),
    entry(AbsoluteY,       Op::Slo, 7),
    entry(AbsoluteX,       Op::Nop, 4),
    entry(AbsoluteX,       Op::Ora, 4),
    entry(AbsoluteX,       Op::Asl, 7),
    entry(AbsoluteX,       Op::Slo, 7),
    // 0x20 - 0x2F
    entry(Absolute,        Op::Jsr, 6),
    entry(IndexedIndirect, Op::And, 6),
    entry(Implied,         Op::Jam, 2),
    entry(IndexedIndirect, Op::Rla, 8),
    entry(ZeroPage,        Op::Bit, 3),
    entry(ZeroPage,        Op::And, 3),
    entry(ZeroPage,        Op::Rol, 5),
    entry(ZeroPage,        Op::Rla, 5),
    entry(Implied,         Op::Plp, 4),
    entry(Immediate,       Op::And, 2),
    entry(Accumulator,     Op::Rol, 2),
    entry(Immediate,       Op::Anc, 2),
    entry(Absolute,        Op::Bit, 4),
    entry(Absolute,        Op::And, 4),
    entry(Absolute,        Op::Rol, 6),
    entry(Absolute,        Op::Rla, 6),
    // 0x30 - 0x3F
    entry(Relative,        Op::Bmi, 2),
    entry(IndirectIndexed, Op::And, 5),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Rla, 8),
    entry(ZeroPageX,       Op::Nop, 4),
    entry(ZeroPageX,       Op::And, 4),
    entry(ZeroPageX,       Op::Rol, 6),
    entry(ZeroPageX,       Op::Rla, 6),
    entry(Implied,         Op::Sec, 2),
    entry(AbsoluteY,       Op::And, 4),
    entry(Implied,         Op::Nop, 2),
    entry(AbsoluteY,       Op::Rla, 7),
    entry(AbsoluteX,       Op::Nop, 4),
    entry(AbsoluteX,       Op::And, 4),
    entry(AbsoluteX,       Op::Rol, 7),
    entry(AbsoluteX,       Op::Rla, 7),
    // 0x40 - 0x4F
    entry(Implied,         Op::Rti, 6),
    entry(IndexedIndirect, Op::Eor, 6),
    entry(Implied,         Op::Jam, 2),
    entry(IndexedIndirect, Op::Sre, 8),
    entry(ZeroPage,        Op::Nop, 3),
    entry(ZeroPage,        Op::Eor, 3),
    entry(ZeroPage,        Op::Lsr, 5),
    entry(ZeroPage,        Op::Sre, 5),
    entry(Implied,         Op::Pha, 3),
    entry(Immediate,       Op::Eor, 2),
    entry(Accumulator,     Op::Lsr, 2),
    entry(Immediate,       Op::Alr, 2),
    entry(Absolute,        Op::Jmp, 3),
    entry(Absolute,        Op::Eor, 4),
    entry(Absolute,        Op::Lsr, 6),
    entry(Absolute,        Op::Sre, 6),
    // 0x50 - 0x5F
    entry(Relative,        Op::Bvc, 2),
    entry(IndirectIndexed, Op::Eor, 5),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Sre, 8),
    entry(ZeroPageX,       Op::Nop, 4),
    entry(ZeroPageX,       Op::Eor, 4),
    entry(ZeroPageX,       Op::Lsr, 6),
    entry(ZeroPageX,       Op::Sre, 6),
    entry(Implied,         Op::Cli, 2),
    entry(AbsoluteY,       Op::Eor, 4),
    entry(Implied,         Op::Nop, 2),
    entry(AbsoluteY,       Op::Sre, 7),
    entry(AbsoluteX,       Op::Nop, 4),
    entry(AbsoluteX,       Op::Eor, 4),
    entry(AbsoluteX,       Op::Lsr, 7),
    entry(AbsoluteX,       Op::Sre, 7),
    // 0x60 - 0x6F
    entry(Implied,         Op::Rts, 6),
    entry(IndexedIndirect, Op::Adc, 6),
    entry(Implied,         Op::Jam, 2),
    entry(IndexedIndirect, Op::Rra, 8),
    entry(ZeroPage,        Op::Nop, 3),
    entry(ZeroPage,        Op::Adc, 3),
    entry(ZeroPage,        Op::Ror, 5),
    entry(ZeroPage,        Op::Rra, 5),
    entry(Implied,         Op::Pla, 4),
    entry(Immediate,       Op::Adc, 2),
    entry(Accumulator,     Op::Ror, 2),
    entry(Immediate,       Op::Arr, 2),
    entry(Indirect,        Op::Jmp, 5),
    entry(Absolute,        Op::Adc, 4),
    entry(Absolute,        Op::Ror, 6),
    entry(Absolute,        Op::Rra, 6),
    // 0x70 - 0x7F
    entry(Relative,        Op::Bvs, 2),
    entry(IndirectIndexed, Op::Adc, 5),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Rra, 8),
    entry(ZeroPageX,       Op::Nop, 4),
    entry(ZeroPageX,       Op::Adc, 4),
    entry(ZeroPageX,       Op::Ror, 6),
    entry(ZeroPageX,       Op::Rra, 6),
    entry(Implied,         Op::Sei, 2),
    entry(AbsoluteY,       Op::Adc, 4),
    entry(Implied,         Op::Nop, 2),
    entry(AbsoluteY,       Op::Rra, 7),
    entry(AbsoluteX,       Op::Nop, 4),
    entry(AbsoluteX,       Op::Adc, 4),
    entry(AbsoluteX,       Op::Ror, 7),
    entry(AbsoluteX,       Op::Rra, 7),
    // 0x80 - 0x8F
    entry(Immediate,       Op::Nop, 2),
    entry(IndexedIndirect, Op::Sta, 6),
    entry(Immediate,       Op::Nop, 2),
    entry(IndexedIndirect, Op::Sax, 6),
    entry(ZeroPage,        Op::Sty, 3),
    entry(ZeroPage,        Op::Sta, 3),
    entry(ZeroPage,        Op::Stx, 3),
    entry(ZeroPage,        Op::Sax, 3),
    entry(Implied,         Op::Dey, 2),
    entry(Immediate,       Op::Nop, 2),
    entry(Implied,         Op::Txa, 2),
    entry(Immediate,       Op::Ane, 2),
    entry(Absolute,        Op::Sty, 4),
    entry(Absolute,        Op::Sta, 4),
    entry(Absolute,        Op::Stx, 4),
    entry(Absolute,        Op::Sax, 4),
    // 0x90 - 0x9F
    entry(Relative,        Op::Bcc, 2),
    entry(IndirectIndexed, Op::Sta, 6),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Sha, 6),
    entry(ZeroPageX,       Op::Sty, 4),
    entry(ZeroPageX,       Op::Sta, 4),
    entry(ZeroPageY,       Op::Stx, 4),
    entry(ZeroPageY,       Op::Sax, 4),
    entry(Implied,         Op::Tya, 2),
    entry(AbsoluteY,       Op::Sta, 5),
    entry(Implied,         Op::Txs, 2),
    entry(AbsoluteY,       Op::Tas, 5),
    entry(AbsoluteX,       Op::Shy, 5),
    entry(AbsoluteX,       Op::Sta, 5),
    entry(AbsoluteY,       Op::Shx, 5),
    entry(AbsoluteY,       Op::Sha, 5),
    // 0xA0 - 0xAF
    entry(Immediate,       Op::Ldy, 2),
    entry(IndexedIndirect, Op::Lda, 6),
    entry(Immediate,       Op::Ldx, 2),
    entry(IndexedIndirect, Op::Lax, 6),
    entry(ZeroPage,        Op::Ldy, 3),
    entry(ZeroPage,        Op::Lda, 3),
    entry(ZeroPage,        Op::Ldx, 3),
    entry(ZeroPage,        Op::Lax, 3),
    entry(Implied,         Op::Tay, 2),
    entry(Immediate,       Op::Lda, 2),
    entry(Implied,         Op::Tax, 2),
    entry(Immediate,       Op::Lxa, 2),
    entry(Absolute,        Op::Ldy, 4),
    entry(Absolute,        Op::Lda, 4),
    entry(Absolute,        Op::Ldx, 4),
    entry(Absolute,        Op::Lax, 4),
    // 0xB0 - 0xBF
    entry(Relative,        Op::Bcs, 2),
    entry(IndirectIndexed, Op::Lda, 5),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Lax, 5),
    entry(ZeroPageX,       Op::Ldy, 4),
    entry(ZeroPageX,       Op::Lda, 4),
    entry(ZeroPageY,       Op::Ldx, 4),
    entry(ZeroPageY,       Op::Lax, 4),
    entry(Implied,         Op::Clv, 2),
    entry(AbsoluteY,       Op::Lda, 4),
    entry(Implied,         Op::Tsx, 2),
    entry(AbsoluteY,       Op::Las, 4),
    entry(AbsoluteX,       Op::Ldy, 4),
    entry(AbsoluteX,       Op::Lda, 4),
    entry(AbsoluteY,       Op::Ldx, 4),
    entry(AbsoluteY,       Op::Lax, 4),
    // 0xC0 - 0xCF
    entry(Immediate,       Op::Cpy, 2),
    entry(IndexedIndirect, Op::Cmp, 6),
    entry(Immediate,       Op::Nop, 2),
    entry(IndexedIndirect, Op::Dcp, 8),
    entry(ZeroPage,        Op::Cpy, 3),
    entry(ZeroPage,        Op::Cmp, 3),
    entry(ZeroPage,        Op::Dec, 5),
    entry(ZeroPage,        Op::Dcp, 5),
    entry(Implied,         Op::Iny, 2),
    entry(Immediate,       Op::Cmp, 2),
    entry(Implied,         Op::Dex, 2),
    entry(Immediate,       Op::Sbx, 2),
    entry(Absolute,        Op::Cpy, 4),
    entry(Absolute,        Op::Cmp, 4),
    entry(Absolute,        Op::Dec, 6),
    entry(Absolute,        Op::Dcp, 6),
    // 0xD0 - 0xDF
    entry(Relative,        Op::Bne, 2),
    entry(IndirectIndexed, Op::Cmp, 5),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Dcp, 8),
    entry(ZeroPageX,       Op::Nop, 4),
    entry(ZeroPageX,       Op::Cmp, 4),
    entry(ZeroPageX,       Op::Dec, 6),
    entry(ZeroPageX,       Op::Dcp, 6),
    entry(Implied,         Op::Cld, 2),
    entry(AbsoluteY,       Op::Cmp, 4),
    entry(Implied,         Op::Nop, 2),
    entry(AbsoluteY,       Op::Dcp, 7),
    entry(AbsoluteX,       Op::Nop, 4),
    entry(AbsoluteX,       Op::Cmp, 4),
    entry(AbsoluteX,       Op::Dec, 7),
    entry(AbsoluteX,       Op::Dcp, 7),
    // 0xE0 - 0xEF
    entry(Immediate,       Op::Cpx, 2),
    entry(IndexedIndirect, Op::Sbc, 6),
    entry(Immediate,       Op::Nop, 2),
    entry(IndexedIndirect, Op::Isc, 8),
    entry(ZeroPage,        Op::Cpx, 3),
    entry(ZeroPage,        Op::Sbc, 3),
    entry(ZeroPage,        Op::Inc, 5),
    entry(ZeroPage,        Op::Isc, 5),
    entry(Implied,         Op::Inx, 2),
    entry(Immediate,       Op::Sbc, 2),
    entry(Implied,         Op::Nop, 2),
    entry(Immediate,       Op::Sbc, 2),
    entry(Absolute,        Op::Cpx, 4),
    entry(Absolute,        Op::Sbc, 4),
    entry(Absolute,        Op::Inc, 6),
    entry(Absolute,        Op::Isc, 6),
    // 0xF0 - 0xFF
    entry(Relative,        Op::Beq, 2),
    entry(IndirectIndexed, Op::Sbc, 5),
    entry(Implied,         Op::Jam, 2),
    entry(IndirectIndexed, Op::Isc, 8),
    entry(ZeroPageX,       Op::Nop, 4),
    entry(ZeroPageX,       Op::Sbc, 4),
    entry(ZeroPageX,       Op::Inc, 6),
    entry(ZeroPageX,       Op::Isc, 6),
    entry(Implied,         Op::Sed, 2),
    entry(AbsoluteY,       Op::Sbc, 4),
    entry(Implied,         Op::Nop, 2),
    entry(AbsoluteY,       Op::Isc, 7),
    entry(AbsoluteX,       Op::Nop, 4),
    entry(AbsoluteX,       Op::Sbc, 4),
    entry(AbsoluteX,       Op::Inc, 7),
    entry(AbsoluteX,       Op::Isc, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jam_encodings() {
        for opcode in [
            0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
        ] {
            let entry = &OPCODES[opcode as usize];
            assert_eq!(entry.op, Op::Jam, "opcode {opcode:#04X}");
            assert_eq!(entry.cycles, 2, "opcode {opcode:#04X}");
        }
    }

    #[test]
    fn base_cycles_in_range() {
        // Every NMOS instruction takes between 2 and 8 base cycles.
        for (i, entry) in OPCODES.iter().enumerate() {
            assert!(
                (2..=8).contains(&entry.cycles),
                "opcode {i:#04X} has {} cycles",
                entry.cycles
            );
        }
    }

    #[test]
    fn branches_are_relative() {
        for opcode in [0x10, 0x30, 0x50, 0x70, 0x90, 0xB0, 0xD0, 0xF0] {
            assert_eq!(OPCODES[opcode as usize].mode, Mode::Relative);
            assert_eq!(OPCODES[opcode as usize].cycles, 2);
        }
    }

    #[test]
    fn rmw_combos_use_rmw_cycle_counts() {
        // The RMW combos mirror their documented counterparts' timing:
        // e.g. SLO zp = ASL zp = 5 cycles, SLO abs,X = ASL abs,X = 7.
        assert_eq!(OPCODES[0x07].cycles, OPCODES[0x06].cycles);
        assert_eq!(OPCODES[0x1F].cycles, OPCODES[0x1E].cycles);
        assert_eq!(OPCODES[0x27].cycles, OPCODES[0x26].cycles);
        assert_eq!(OPCODES[0xC7].cycles, OPCODES[0xC6].cycles);
        assert_eq!(OPCODES[0xE7].cycles, OPCODES[0xE6].cycles);
    }
}
