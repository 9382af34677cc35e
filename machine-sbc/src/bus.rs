//! System bus: CPU address routing.
//!
//! Implements `emu65_core::Bus` for the single-board machine. Routes
//! CPU addresses to the TIA, VIA, ACIA and RAM, and realizes the
//! optional real-time pacing in `tick`.
//!
//! The machine is fully memory-mapped — there is no separate I/O
//! address space.

use std::fmt;

use emu65_core::Bus;

use crate::acia::Acia6551;
use crate::clock::ClockPacer;
use crate::tia::Tia;
use crate::via::Via6522;

/// TIA register window (when a TIA is attached, it shadows low RAM).
const TIA_START: u16 = 0x0000;
const TIA_END: u16 = 0x003F;
/// VIA register window.
const VIA_START: u16 = 0x6000;
const VIA_END: u16 = 0x600F;
/// ACIA register window.
const ACIA_START: u16 = 0xD000;
const ACIA_END: u16 = 0xD00F;
/// Writing a byte here prints it to the host console.
const CONSOLE_OUT: u16 = 0xD012;

/// Program image does not fit in the address space.
#[derive(Debug)]
pub enum LoadError {
    /// The image would run past $FFFF from the given origin.
    TooLarge { len: usize, origin: u16 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { len, origin } => write!(
                f,
                "image of {} bytes does not fit at origin ${:04X} (space for {})",
                len,
                origin,
                0x10000 - usize::from(*origin),
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// The system bus, implementing `emu65_core::Bus`.
pub struct SystemBus {
    /// System RAM. Addresses past its end read as $FF.
    ram: Vec<u8>,
    /// VIA 6522 at $6000.
    pub via: Via6522,
    /// ACIA 6551 at $D000, if attached.
    pub acia: Option<Acia6551>,
    /// TIA at $0000, if attached.
    pub tia: Option<Tia>,
    /// Real-time pacer, if pacing is enabled.
    pub pacer: Option<ClockPacer>,
    /// Bytes written to the console-out register, drained by the host.
    console: Vec<u8>,
}

impl SystemBus {
    /// Create a bus with the given amount of RAM (up to 64 KiB).
    #[must_use]
    pub fn new(memory_size: usize) -> Self {
        Self {
            ram: vec![0; memory_size.min(0x10000)],
            via: Via6522::new(),
            acia: None,
            tia: None,
            pacer: None,
            console: Vec::new(),
        }
    }

    /// Reset the bus-side devices. RAM contents are preserved.
    pub fn reset(&mut self) {
        if let Some(acia) = &mut self.acia {
            acia.reset();
        }
        if let Some(pacer) = &mut self.pacer {
            pacer.reset();
        }
    }

    /// Copy a program image into RAM at `origin`.
    ///
    /// # Errors
    ///
    /// Rejects images that would run past the top of the address space.
    pub fn load_image(&mut self, data: &[u8], origin: u16) -> Result<(), LoadError> {
        if data.len() > 0x10000 - usize::from(origin) {
            return Err(LoadError::TooLarge {
                len: data.len(),
                origin,
            });
        }
        let start = usize::from(origin);
        let end = (start + data.len()).min(self.ram.len());
        if end > start {
            self.ram[start..end].copy_from_slice(&data[..end - start]);
        }
        Ok(())
    }

    /// Peek RAM without device side effects (for monitor dumps).
    #[must_use]
    pub fn peek_ram(&self, addr: u16) -> u8 {
        self.ram.get(usize::from(addr)).copied().unwrap_or(0xFF)
    }

    /// Drain bytes written to the console-out register.
    pub fn take_console(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.console)
    }
}

impl Bus for SystemBus {
    fn read(&mut self, address: u16) -> u8 {
        if let Some(tia) = &self.tia {
            if (TIA_START..=TIA_END).contains(&address) {
                return tia.read(address);
            }
        }
        if (VIA_START..=VIA_END).contains(&address) {
            return self.via.read((address - VIA_START) as u8);
        }
        if let Some(acia) = &mut self.acia {
            if (ACIA_START..=ACIA_END).contains(&address) {
                return acia.read((address - ACIA_START) as u8);
            }
        }
        self.ram.get(usize::from(address)).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, address: u16, value: u8) {
        if let Some(tia) = &mut self.tia {
            if (TIA_START..=TIA_END).contains(&address) {
                tia.write(address, value);
                return;
            }
        }
        if (VIA_START..=VIA_END).contains(&address) {
            self.via.write((address - VIA_START) as u8, value);
            return;
        }
        if let Some(acia) = &mut self.acia {
            if (ACIA_START..=ACIA_END).contains(&address) {
                acia.write((address - ACIA_START) as u8, value);
                return;
            }
        }
        if address == CONSOLE_OUT {
            self.console.push(value);
            return;
        }
        if let Some(slot) = self.ram.get_mut(usize::from(address)) {
            *slot = value;
        }
    }

    fn tick(&mut self, cycles: u32) {
        if let Some(pacer) = &mut self.pacer {
            for _ in 0..cycles {
                pacer.wait_next_cycle();
            }
        }
    }
}
