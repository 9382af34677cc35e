//! 6502 single-board computer emulation.
//!
//! Ties the CPU to a decoded 64 KiB address space with three
//! memory-mapped peripherals:
//!
//! | Range           | Device |
//! |-----------------|--------|
//! | $0000-$003F     | TIA (when attached) |
//! | $6000-$600F     | VIA 6522 |
//! | $D000-$D00F     | ACIA 6551 (when attached) |
//! | everything else | RAM |
//!
//! An optional real-time pacer holds the emulated clock rate; without
//! it the machine runs as fast as the host allows.

mod acia;
mod bus;
mod clock;
mod sbc;
mod tia;
mod via;

pub use acia::{Acia6551, AciaControl, AciaStatus};
pub use bus::{LoadError, SystemBus};
pub use clock::ClockPacer;
pub use sbc::{Sbc, SbcConfig};
pub use tia::{Tia, TvSystem};
pub use via::Via6522;
