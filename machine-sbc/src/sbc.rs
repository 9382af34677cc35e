//! Top-level single-board computer.
//!
//! Owns the CPU and the system bus and advances the peripherals in
//! lockstep with the cycles each instruction consumes: the VIA ticks
//! once per CPU cycle and the TIA three times (three color clocks per
//! CPU cycle). The VIA's interrupt line is wired to the CPU's IRQ
//! input.

use cpu_6502::Mos6502;
use emu65_core::Cpu;

use crate::acia::Acia6551;
use crate::bus::{LoadError, SystemBus};
use crate::clock::ClockPacer;
use crate::tia::{Tia, TvSystem};

/// TIA color clocks per CPU cycle.
const TIA_CLOCKS_PER_CPU_CYCLE: u32 = 3;

/// Machine configuration.
pub struct SbcConfig {
    /// RAM size in bytes (up to 64 KiB).
    pub memory_size: usize,
    /// Emulated clock rate in Hz; 0 disables real-time pacing.
    pub clock_hz: f64,
    /// Attach the ACIA at $D000.
    pub acia: bool,
    /// Attach the TIA at $0000 (shadows low RAM).
    pub tia: bool,
    /// TIA TV system.
    pub tv_system: TvSystem,
}

impl Default for SbcConfig {
    fn default() -> Self {
        Self {
            memory_size: 0x10000,
            clock_hz: 0.0,
            acia: true,
            tia: true,
            tv_system: TvSystem::Ntsc,
        }
    }
}

/// The single-board computer: CPU + decoded bus.
pub struct Sbc {
    cpu: Mos6502,
    bus: SystemBus,
}

impl Sbc {
    #[must_use]
    pub fn new(config: &SbcConfig) -> Self {
        let mut bus = SystemBus::new(config.memory_size);
        if config.acia {
            bus.acia = Some(Acia6551::new());
        }
        if config.tia {
            bus.tia = Some(Tia::new(config.tv_system));
        }
        bus.pacer = ClockPacer::new(config.clock_hz);

        Self {
            cpu: Mos6502::new(),
            bus,
        }
    }

    /// Reset the machine: devices first, then the CPU (which reads the
    /// reset vector through the bus). Returns the reset cycle count.
    pub fn reset(&mut self) -> u32 {
        self.bus.reset();
        self.cpu.reset(&mut self.bus)
    }

    /// Execute one instruction and advance the peripherals by the
    /// cycles it consumed. Returns the cycle count (0 when halted).
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);

        for _ in 0..cycles {
            self.bus.via.tick();
        }
        if let Some(tia) = &mut self.bus.tia {
            for _ in 0..cycles * TIA_CLOCKS_PER_CPU_CYCLE {
                tia.cycle();
            }
        }

        if self.bus.via.irq_active() {
            self.cpu.irq(&mut self.bus);
        }

        cycles
    }

    /// Raise an IRQ. Returns 7 if taken, 0 if masked.
    pub fn irq(&mut self) -> u32 {
        self.cpu.irq(&mut self.bus)
    }

    /// Raise an NMI. Returns 7.
    pub fn nmi(&mut self) -> u32 {
        self.cpu.nmi(&mut self.bus)
    }

    /// Copy a program image into RAM at `origin`.
    ///
    /// # Errors
    ///
    /// Rejects images that would run past the top of the address space.
    pub fn load_image(&mut self, data: &[u8], origin: u16) -> Result<(), LoadError> {
        self.bus.load_image(data, origin)
    }

    /// Point the reset vector at `origin`.
    pub fn set_reset_vector(&mut self, origin: u16) {
        self.bus.load_image(&origin.to_le_bytes(), cpu_6502::RESET_VECTOR)
            .expect("reset vector is inside the address space");
    }

    /// Feed host bytes into the serial input (ACIA when attached,
    /// otherwise the VIA's serial ring).
    pub fn feed_serial(&mut self, data: &[u8]) {
        match &mut self.bus.acia {
            Some(acia) => acia.feed(data),
            None => self.bus.via.feed_serial(data),
        }
    }

    /// Drain everything the machine has written towards the host:
    /// console-register bytes, ACIA transmit data and VIA shift-out.
    pub fn take_output(&mut self) -> Vec<u8> {
        let mut out = self.bus.take_console();
        if let Some(acia) = &mut self.bus.acia {
            out.extend(acia.pump_tx());
        }
        out.extend(self.bus.via.take_serial_out());
        out
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut SystemBus {
        &mut self.bus
    }
}
