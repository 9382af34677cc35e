//! MOS 6551 ACIA (Asynchronous Communications Interface Adapter).
//!
//! Serial port model with ring-buffered transmit and receive paths.
//! The host feeds received bytes in with [`Acia6551::feed`] and drains
//! transmitted bytes with [`Acia6551::pump_tx`]; the emulated program
//! sees the usual status/data/control register file.
//!
//! # Registers (offsets from the base address)
//!
//! | Off | Name    | Description |
//! |-----|---------|-------------|
//! | $0  | STATUS  | TX ready, RX ready, error bits |
//! | $1  | DATA TX | Write queues a byte for transmit |
//! | $2  | DATA RX | Read consumes a received byte |
//! | $3  | CONTROL | TX/RX enables, interrupt enables |

use bitflags::bitflags;

/// TX and RX ring capacity.
const BUFFER_CAPACITY: usize = 1024;

bitflags! {
    /// Status register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AciaStatus: u8 {
        /// Transmitter can accept a byte.
        const TX_READY = 0x01;
        /// A received byte is waiting.
        const RX_READY = 0x02;
        /// A ring buffer overflowed.
        const OVERRUN = 0x04;
        /// Parity error (never raised by this model).
        const PARITY = 0x08;
        /// Framing error (never raised by this model).
        const FRAME = 0x10;
    }
}

bitflags! {
    /// Control register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AciaControl: u8 {
        /// Enable the transmitter.
        const ENABLE_TX = 0x01;
        /// Enable the receiver.
        const ENABLE_RX = 0x02;
        /// Raise an interrupt when the transmitter drains.
        const INTERRUPT_TX = 0x04;
        /// Raise an interrupt when a byte arrives.
        const INTERRUPT_RX = 0x08;
    }
}

/// Register offsets.
const REG_STATUS: u8 = 0x00;
const REG_DATA_TX: u8 = 0x01;
const REG_DATA_RX: u8 = 0x02;
const REG_CONTROL: u8 = 0x03;

/// MOS 6551 ACIA with ring-buffered TX and RX.
pub struct Acia6551 {
    tx: std::collections::VecDeque<u8>,
    rx: std::collections::VecDeque<u8>,
    control: AciaControl,
    status: AciaStatus,
}

impl Acia6551 {
    /// Create an ACIA in its reset state: transmitter ready, nothing
    /// received, everything disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tx: std::collections::VecDeque::new(),
            rx: std::collections::VecDeque::new(),
            control: AciaControl::empty(),
            status: AciaStatus::TX_READY,
        }
    }

    /// Reset to the power-on state, dropping buffered data.
    pub fn reset(&mut self) {
        self.tx.clear();
        self.rx.clear();
        self.control = AciaControl::empty();
        self.status = AciaStatus::TX_READY;
    }

    /// Read a register.
    pub fn read(&mut self, offset: u8) -> u8 {
        match offset & 0x03 {
            REG_STATUS => {
                let mut status = self.status & (AciaStatus::OVERRUN | AciaStatus::PARITY | AciaStatus::FRAME);
                if self.tx_ready() {
                    status |= AciaStatus::TX_READY;
                }
                if self.rx_ready() {
                    status |= AciaStatus::RX_READY;
                }
                status.bits()
            }
            REG_DATA_RX => {
                if !self.rx_ready() {
                    return 0;
                }
                let byte = self.rx.pop_front().unwrap_or(0);
                if self.rx.is_empty() {
                    self.status.remove(AciaStatus::RX_READY);
                }
                byte
            }
            REG_CONTROL => self.control.bits(),
            _ => 0,
        }
    }

    /// Write a register.
    pub fn write(&mut self, offset: u8, value: u8) {
        match offset & 0x03 {
            REG_DATA_TX => {
                if !self.control.contains(AciaControl::ENABLE_TX) {
                    return;
                }
                if self.tx.len() >= BUFFER_CAPACITY {
                    self.status.insert(AciaStatus::OVERRUN);
                    return;
                }
                self.tx.push_back(value);
            }
            REG_CONTROL => {
                self.control = AciaControl::from_bits_truncate(value);
            }
            _ => {}
        }
    }

    /// Drain the transmit buffer, returning the bytes in send order.
    ///
    /// Returns nothing while the transmitter is disabled.
    pub fn pump_tx(&mut self) -> Vec<u8> {
        if !self.control.contains(AciaControl::ENABLE_TX) {
            return Vec::new();
        }
        self.tx.drain(..).collect()
    }

    /// Queue received bytes. Raises OVERRUN and drops the remainder if
    /// the ring fills.
    pub fn feed(&mut self, data: &[u8]) {
        for &byte in data {
            if self.rx.len() >= BUFFER_CAPACITY {
                self.status.insert(AciaStatus::OVERRUN);
                break;
            }
            self.rx.push_back(byte);
        }
        if !self.rx.is_empty() {
            self.status.insert(AciaStatus::RX_READY);
        }
    }

    fn tx_ready(&self) -> bool {
        self.control.contains(AciaControl::ENABLE_TX) && self.tx.is_empty()
    }

    fn rx_ready(&self) -> bool {
        self.control.contains(AciaControl::ENABLE_RX) && !self.rx.is_empty()
    }
}

impl Default for Acia6551 {
    fn default() -> Self {
        Self::new()
    }
}
