//! Behavioral tests for the 6502 core: stack discipline, boundary
//! wrapping rules, cycle penalties, decimal mode and interrupt entry.

use cpu_6502::Mos6502;
use emu65_core::{Bus, Cpu};

struct TestBus {
    memory: [u8; 65536],
}

impl TestBus {
    fn new() -> Self {
        Self { memory: [0; 65536] }
    }

    fn load(&mut self, addr: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.memory[addr as usize + i] = byte;
        }
    }
}

impl Bus for TestBus {
    fn read(&mut self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }
}

/// CPU with PC at `origin` and the program loaded there.
fn setup(program: &[u8], origin: u16) -> (Mos6502, TestBus) {
    let mut bus = TestBus::new();
    bus.load(origin, program);
    let mut cpu = Mos6502::new();
    cpu.set_pc(origin);
    (cpu, bus)
}

// =========================================================================
// Loads, flags, compares
// =========================================================================

#[test]
fn lda_immediate_sets_nz() {
    let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xA9, 0x80], 0x0200);

    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.a(), 0x00);
    assert_ne!(cpu.status() & 0x02, 0, "Z set for zero");

    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x80);
    assert_ne!(cpu.status() & 0x80, 0, "N set for bit 7");
    assert_eq!(cpu.status() & 0x02, 0);
}

#[test]
fn cmp_carry_and_zero_track_comparison() {
    // For a sample of (A, M): after CMP #M, C <=> A >= M and Z <=> A == M.
    for a in [0x00u8, 0x01, 0x42, 0x7F, 0x80, 0xFF] {
        for m in [0x00u8, 0x01, 0x42, 0x80, 0xFE, 0xFF] {
            let (mut cpu, mut bus) = setup(&[0xC9, m], 0x0200);
            cpu.set_a(a);
            cpu.step(&mut bus);
            assert_eq!(cpu.status() & 0x01 != 0, a >= m, "C for A={a:#04X} M={m:#04X}");
            assert_eq!(cpu.status() & 0x02 != 0, a == m, "Z for A={a:#04X} M={m:#04X}");
        }
    }
}

#[test]
fn adc_binary_matches_arithmetic() {
    // Binary ADC: A' = (A + M + C) mod 256, C' = (A + M + C) >= 256.
    for a in (0..=255u16).step_by(17) {
        for m in (0..=255u16).step_by(13) {
            for carry in [false, true] {
                let (mut cpu, mut bus) = setup(&[0x69, m as u8], 0x0200);
                cpu.set_a(a as u8);
                cpu.set_status(if carry { 0x01 } else { 0x00 });
                cpu.step(&mut bus);
                let sum = a + m + u16::from(carry);
                assert_eq!(cpu.a(), sum as u8);
                assert_eq!(cpu.status() & 0x01 != 0, sum > 0xFF);
            }
        }
    }
}

#[test]
fn adc_overflow_flag() {
    // 0x50 + 0x50 = 0xA0: positive + positive -> negative, V set.
    let (mut cpu, mut bus) = setup(&[0x69, 0x50], 0x0200);
    cpu.set_a(0x50);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0xA0);
    assert_ne!(cpu.status() & 0x40, 0, "V set");

    // 0x50 + 0x10 = 0x60: no overflow.
    let (mut cpu, mut bus) = setup(&[0x69, 0x10], 0x0200);
    cpu.set_a(0x50);
    cpu.step(&mut bus);
    assert_eq!(cpu.status() & 0x40, 0, "V clear");
}

#[test]
fn sbc_binary_borrow() {
    // SEC; A=0x40; SBC #0x10 -> 0x30 with carry still set.
    let (mut cpu, mut bus) = setup(&[0xE9, 0x10], 0x0200);
    cpu.set_a(0x40);
    cpu.set_status(0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x30);
    assert_ne!(cpu.status() & 0x01, 0, "no borrow");

    // A=0x10; SBC #0x20 -> 0xF0 with carry clear (borrow).
    let (mut cpu, mut bus) = setup(&[0xE9, 0x20], 0x0200);
    cpu.set_a(0x10);
    cpu.set_status(0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0xF0);
    assert_eq!(cpu.status() & 0x01, 0, "borrow");
}

// =========================================================================
// Decimal mode
// =========================================================================

#[test]
fn adc_decimal_simple() {
    // SED; CLC; A=0x15; ADC #0x27 -> A=0x42, C clear.
    let (mut cpu, mut bus) = setup(&[0x69, 0x27], 0x0200);
    cpu.set_a(0x15);
    cpu.set_status(0x08); // D set, C clear
    let cycles = cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x42);
    assert_eq!(cpu.status() & 0x01, 0);
    assert_eq!(cycles, 3, "BCD ADC pays one extra cycle");
}

#[test]
fn adc_decimal_carry_out() {
    // SED; CLC; A=0x81; ADC #0x92 -> A=0x73, C set.
    let (mut cpu, mut bus) = setup(&[0x69, 0x92], 0x0200);
    cpu.set_a(0x81);
    cpu.set_status(0x08);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x73);
    assert_ne!(cpu.status() & 0x01, 0);
}

#[test]
fn sbc_decimal_simple() {
    // SED; SEC; A=0x42; SBC #0x27 -> A=0x15, C set.
    let (mut cpu, mut bus) = setup(&[0xE9, 0x27], 0x0200);
    cpu.set_a(0x42);
    cpu.set_status(0x09); // D and C
    let cycles = cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x15);
    assert_ne!(cpu.status() & 0x01, 0);
    assert_eq!(cycles, 3, "BCD SBC pays one extra cycle");
}

#[test]
fn sbc_decimal_borrow() {
    // SED; SEC; A=0x21; SBC #0x34 -> A=0x87, C clear.
    let (mut cpu, mut bus) = setup(&[0xE9, 0x34], 0x0200);
    cpu.set_a(0x21);
    cpu.set_status(0x09);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x87);
    assert_eq!(cpu.status() & 0x01, 0);
}

// =========================================================================
// Stack and status byte
// =========================================================================

#[test]
fn php_plp_roundtrip() {
    // SEC; SED; PHP; CLC; CLD; PLP restores C and D.
    let (mut cpu, mut bus) = setup(&[0x38, 0xF8, 0x08, 0x18, 0xD8, 0x28], 0x0200);
    for _ in 0..6 {
        cpu.step(&mut bus);
    }
    assert_ne!(cpu.status() & 0x01, 0, "C restored");
    assert_ne!(cpu.status() & 0x08, 0, "D restored");
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn php_pushes_break_and_unused_bits() {
    let (mut cpu, mut bus) = setup(&[0x08], 0x0200);
    cpu.set_sp(0xFD);
    cpu.step(&mut bus);
    assert_eq!(bus.memory[0x01FD] & 0x30, 0x30, "PHP pushes B and U set");
}

#[test]
fn status_bit5_always_reads_one() {
    let mut cpu = Mos6502::new();
    for value in 0..=255u8 {
        cpu.set_status(value);
        assert_ne!(cpu.status() & 0x20, 0);
        // Architectural bits round-trip; B is not stored.
        assert_eq!(cpu.status() & 0b1100_1111, value & 0b1100_1111);
    }
}

#[test]
fn push_word_wraps_within_page_one() {
    // JSR with SP=0x00 writes $0100 then wraps to $01FF.
    let (mut cpu, mut bus) = setup(&[0x20, 0x00, 0x90], 0x0200);
    cpu.set_sp(0x00);
    cpu.step(&mut bus);
    assert_eq!(bus.memory[0x0100], 0x02, "high byte at $0100");
    assert_eq!(bus.memory[0x01FF], 0x02, "low byte wraps to $01FF");
    assert_eq!(cpu.sp(), 0xFE);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x9000);
}

#[test]
fn jsr_rts_roundtrip() {
    let mut bus = TestBus::new();
    bus.load(0x8000, &[0x20, 0x10, 0x80]); // JSR $8010
    bus.load(0x8010, &[0x60]); // RTS
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x8000);
    cpu.set_sp(0xFD);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 6);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x8010);
    assert_eq!(cpu.sp(), 0xFB);
    assert_eq!(bus.memory[0x01FD], 0x80, "return address high");
    assert_eq!(bus.memory[0x01FC], 0x02, "return address low");

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 6);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x8003, "RTS lands after the JSR");
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn rts_adds_one_rti_does_not() {
    // RTS: pushed $8002 resumes at $8003.
    let mut bus = TestBus::new();
    bus.memory[0x01FE] = 0x02;
    bus.memory[0x01FF] = 0x80;
    bus.load(0x0200, &[0x60]);
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_sp(0xFD);
    cpu.step(&mut bus);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x8003);

    // RTI: status then PC, used as-is.
    let mut bus = TestBus::new();
    bus.memory[0x01FD] = 0x01; // status: C
    bus.memory[0x01FE] = 0x02;
    bus.memory[0x01FF] = 0x80;
    bus.load(0x0200, &[0x40]);
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_sp(0xFC);
    cpu.step(&mut bus);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x8002, "RTI does not adjust the pulled PC");
    assert_ne!(cpu.status() & 0x01, 0);
}

// =========================================================================
// Addressing boundaries and cycle penalties
// =========================================================================

#[test]
fn indirect_jmp_page_bug() {
    let mut bus = TestBus::new();
    bus.memory[0x30FF] = 0x40;
    bus.memory[0x3000] = 0x80;
    bus.memory[0x3100] = 0xFF; // would be the high byte without the bug
    bus.load(0x0200, &[0x6C, 0xFF, 0x30]); // JMP ($30FF)
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 5);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x8040, "high byte fetched from $3000, not $3100");
}

#[test]
fn indirect_indexed_pointer_wraps_zero_page() {
    // LDA ($FF),Y: pointer low from $00FF, pointer high from $0000.
    let mut bus = TestBus::new();
    bus.memory[0x00FF] = 0x00;
    bus.memory[0x0000] = 0x40;
    bus.memory[0x4005] = 0x77;
    bus.load(0x0200, &[0xB1, 0xFF]);
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_y(0x05);

    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x77);
}

#[test]
fn indexed_indirect_wraps_zero_page() {
    // LDA ($FE,X) with X=3: pointer at $01/$02.
    let mut bus = TestBus::new();
    bus.memory[0x0001] = 0x34;
    bus.memory[0x0002] = 0x12;
    bus.memory[0x1234] = 0x5A;
    bus.load(0x0200, &[0xA1, 0xFE]);
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_x(0x03);

    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x5A);
}

#[test]
fn zero_page_x_wraps() {
    // LDA $F0,X with X=0x20 reads $0010, not $0110.
    let mut bus = TestBus::new();
    bus.memory[0x0010] = 0x99;
    bus.memory[0x0110] = 0x11;
    bus.load(0x0200, &[0xB5, 0xF0]);
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_x(0x20);

    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x99);
}

#[test]
fn absolute_x_page_cross_penalty() {
    // LDA $12F0,X with X=0x20: crosses into $13xx, 5 cycles.
    let (mut cpu, mut bus) = setup(&[0xBD, 0xF0, 0x12], 0x0200);
    cpu.set_x(0x20);
    assert_eq!(cpu.step(&mut bus), 5);

    // X=0x01: same page, 4 cycles.
    let (mut cpu, mut bus) = setup(&[0xBD, 0xF0, 0x12], 0x0200);
    cpu.set_x(0x01);
    assert_eq!(cpu.step(&mut bus), 4);
}

#[test]
fn store_never_pays_page_cross() {
    // STA $12F0,X with X=0x20 stays at its base 5 cycles.
    let (mut cpu, mut bus) = setup(&[0x9D, 0xF0, 0x12], 0x0200);
    cpu.set_x(0x20);
    assert_eq!(cpu.step(&mut bus), 5);
}

#[test]
fn rmw_combo_never_pays_page_cross() {
    // DCP $12F0,X with X=0x20 crosses a page but stays at 7 cycles.
    let (mut cpu, mut bus) = setup(&[0xDF, 0xF0, 0x12], 0x0200);
    cpu.set_x(0x20);
    assert_eq!(cpu.step(&mut bus), 7);
}

#[test]
fn branch_cycles() {
    // Not taken: 2 cycles.
    let (mut cpu, mut bus) = setup(&[0xD0, 0x10], 0x0200);
    cpu.set_status(0x02); // Z set, BNE not taken
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0202);

    // Taken within page: 3 cycles.
    let (mut cpu, mut bus) = setup(&[0xD0, 0x10], 0x0200);
    assert_eq!(cpu.step(&mut bus), 3);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0212);
}

#[test]
fn branch_page_cross_cycles() {
    // BNE at $80FE, offset +$10: target $8110, 4 cycles.
    let mut bus = TestBus::new();
    bus.load(0x80FE, &[0xD0, 0x10]);
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x80FE);

    let cycles = cpu.step(&mut bus);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x8110);
    assert_eq!(cycles, 4, "2 base + 1 taken + 1 cross");
}

#[test]
fn branch_backward() {
    // BEQ -2 from $0202 loops onto the branch itself.
    let (mut cpu, mut bus) = setup(&[0xF0, 0xFE], 0x0200);
    cpu.set_status(0x02);
    cpu.step(&mut bus);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0200);
}

// =========================================================================
// BRK, interrupts, reset
// =========================================================================

#[test]
fn brk_pushes_and_vectors() {
    let mut bus = TestBus::new();
    bus.memory[0xFFFE] = 0x00;
    bus.memory[0xFFFF] = 0x90;
    bus.load(0x0200, &[0x00, 0xEA]); // BRK + padding
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_sp(0xFD);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 7);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x9000);
    assert_ne!(cpu.status() & 0x04, 0, "I set");
    assert_eq!(cpu.sp(), 0xFA);
    // Pushed PC points one past the padding byte.
    assert_eq!(bus.memory[0x01FD], 0x02);
    assert_eq!(bus.memory[0x01FC], 0x02);
    assert_eq!(bus.memory[0x01FB] & 0x30, 0x30, "B and U set in pushed status");
}

#[test]
fn irq_respects_interrupt_disable() {
    let mut bus = TestBus::new();
    bus.memory[0xFFFE] = 0x00;
    bus.memory[0xFFFF] = 0x90;
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_sp(0xFD);

    cpu.set_status(0x04); // I set
    assert_eq!(cpu.irq(&mut bus), 0, "masked IRQ is ignored");
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0200);

    cpu.set_status(0x00);
    assert_eq!(cpu.irq(&mut bus), 7);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x9000);
    assert_eq!(bus.memory[0x01FB] & 0x30, 0x20, "B clear, U set in pushed status");
}

#[test]
fn nmi_always_fires() {
    let mut bus = TestBus::new();
    bus.memory[0xFFFA] = 0x34;
    bus.memory[0xFFFB] = 0x12;
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_sp(0xFD);
    cpu.set_status(0x04); // I set does not mask NMI

    assert_eq!(cpu.nmi(&mut bus), 7);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x1234);
}

#[test]
fn interrupt_entry_preserves_decimal_flag() {
    // NMOS does not clear D on interrupt entry.
    let mut bus = TestBus::new();
    bus.memory[0xFFFE] = 0x00;
    bus.memory[0xFFFF] = 0x90;
    let mut cpu = Mos6502::new();
    cpu.set_sp(0xFD);
    cpu.set_status(0x08); // D set, I clear

    cpu.irq(&mut bus);
    assert_ne!(cpu.status() & 0x08, 0, "D survives IRQ entry");
}

#[test]
fn reset_loads_vector_and_clears_state() {
    let mut bus = TestBus::new();
    bus.memory[0xFFFC] = 0x00;
    bus.memory[0xFFFD] = 0x04;
    let mut cpu = Mos6502::new();
    cpu.set_a(0xAA);
    cpu.set_status(0xFF);

    let cycles = cpu.reset(&mut bus);
    assert_eq!(cycles, 7);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0400);
    assert_eq!(cpu.a(), 0);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(cpu.status(), 0x20, "only the fixed bit 5 remains");
}

#[test]
fn jam_halts_until_reset() {
    let mut bus = TestBus::new();
    bus.memory[0xFFFC] = 0x00;
    bus.memory[0xFFFD] = 0x02;
    bus.load(0x0200, &[0x02, 0xA9, 0x42]); // JAM, then LDA #$42
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);

    cpu.step(&mut bus);
    assert!(cpu.halted());

    for _ in 0..100 {
        assert_eq!(cpu.step(&mut bus), 0, "halted CPU consumes no cycles");
    }

    cpu.reset(&mut bus);
    assert!(!cpu.halted());
    cpu.step(&mut bus); // JAM again at $0200
    assert!(cpu.halted());
}

// =========================================================================
// Undocumented opcodes
// =========================================================================

#[test]
fn lax_loads_a_and_x() {
    let mut bus = TestBus::new();
    bus.memory[0x0042] = 0x5F;
    bus.load(0x0200, &[0xA7, 0x42]); // LAX $42
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);

    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x5F);
    assert_eq!(cpu.x(), 0x5F);
}

#[test]
fn sax_stores_a_and_x() {
    let (mut cpu, mut bus) = setup(&[0x87, 0x42], 0x0200); // SAX $42
    cpu.set_a(0xF0);
    cpu.set_x(0x3C);
    cpu.step(&mut bus);
    assert_eq!(bus.memory[0x0042], 0x30);
}

#[test]
fn dcp_decrements_then_compares() {
    let mut bus = TestBus::new();
    bus.memory[0x0042] = 0x11;
    bus.load(0x0200, &[0xC7, 0x42]); // DCP $42
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_a(0x10);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 5);
    assert_eq!(bus.memory[0x0042], 0x10);
    assert_ne!(cpu.status() & 0x02, 0, "A equals decremented operand");
    assert_ne!(cpu.status() & 0x01, 0);
}

#[test]
fn isc_increments_then_subtracts() {
    let mut bus = TestBus::new();
    bus.memory[0x0042] = 0x0F;
    bus.load(0x0200, &[0xE7, 0x42]); // ISC $42
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_a(0x30);
    cpu.set_status(0x01); // no borrow

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0x0042], 0x10);
    assert_eq!(cpu.a(), 0x20);
}

#[test]
fn slo_shifts_then_ors() {
    let mut bus = TestBus::new();
    bus.memory[0x0042] = 0x81;
    bus.load(0x0200, &[0x07, 0x42]); // SLO $42
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_a(0x01);

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0x0042], 0x02);
    assert_eq!(cpu.a(), 0x03);
    assert_ne!(cpu.status() & 0x01, 0, "carry from the shifted-out bit");
}

#[test]
fn rra_rotates_then_adds_with_new_carry() {
    let mut bus = TestBus::new();
    bus.memory[0x0042] = 0x03; // rotates to 0x01, carry out 1
    bus.load(0x0200, &[0x67, 0x42]); // RRA $42
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_a(0x10);

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0x0042], 0x01);
    // A = 0x10 + 0x01 + carry(1) = 0x12
    assert_eq!(cpu.a(), 0x12);
}

#[test]
fn sbx_masks_then_subtracts() {
    let (mut cpu, mut bus) = setup(&[0xCB, 0x05], 0x0200); // SBX #$05
    cpu.set_a(0x3F);
    cpu.set_x(0x35);
    cpu.step(&mut bus);
    // X = (0x3F & 0x35) - 5 = 0x35 - 5 = 0x30
    assert_eq!(cpu.x(), 0x30);
    assert_ne!(cpu.status() & 0x01, 0);
}

#[test]
fn anc_sets_carry_from_sign() {
    let (mut cpu, mut bus) = setup(&[0x0B, 0xFF], 0x0200); // ANC #$FF
    cpu.set_a(0x80);
    cpu.step(&mut bus);
    assert_eq!(cpu.a(), 0x80);
    assert_ne!(cpu.status() & 0x01, 0);
    assert_ne!(cpu.status() & 0x80, 0);
}

#[test]
fn alr_ands_then_shifts() {
    let (mut cpu, mut bus) = setup(&[0x4B, 0x0F], 0x0200); // ALR #$0F
    cpu.set_a(0x0B);
    cpu.step(&mut bus);
    // 0x0B & 0x0F = 0x0B; shifted right = 0x05, C from bit 0.
    assert_eq!(cpu.a(), 0x05);
    assert_ne!(cpu.status() & 0x01, 0);
}

#[test]
fn las_masks_sp_into_three_registers() {
    let mut bus = TestBus::new();
    bus.memory[0x1234] = 0x6F;
    bus.load(0x0200, &[0xBB, 0x34, 0x12]); // LAS $1234,Y with Y=0
    let mut cpu = Mos6502::new();
    cpu.set_pc(0x0200);
    cpu.set_sp(0xF3);

    cpu.step(&mut bus);
    let expected = 0x6F & 0xF3;
    assert_eq!(cpu.a(), expected);
    assert_eq!(cpu.x(), expected);
    assert_eq!(cpu.sp(), expected);
}

#[test]
fn illegal_nop_absolute_x_pays_page_cross() {
    // $1C with a crossing index: 5 cycles.
    let (mut cpu, mut bus) = setup(&[0x1C, 0xF0, 0x12], 0x0200);
    cpu.set_x(0x20);
    assert_eq!(cpu.step(&mut bus), 5);

    // Without a cross: 4.
    let (mut cpu, mut bus) = setup(&[0x1C, 0xF0, 0x12], 0x0200);
    cpu.set_x(0x01);
    assert_eq!(cpu.step(&mut bus), 4);
}

// =========================================================================
// PC advance invariant
// =========================================================================

#[test]
fn pc_advances_by_operand_length() {
    // 1-byte NOP, 2-byte LDA #, 3-byte LDA abs.
    let (mut cpu, mut bus) = setup(&[0xEA, 0xA9, 0x01, 0xAD, 0x00, 0x30], 0x0200);
    cpu.step(&mut bus);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0201);
    cpu.step(&mut bus);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0203);
    cpu.step(&mut bus);
    assert_eq!(Cpu::<TestBus>::pc(&cpu), 0x0206);
}
