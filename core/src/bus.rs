/// A bus that supports memory read/write operations.
///
/// This is the CPU's entire view of the outside world: a 16-bit address
/// space of bytes. Implementations decode addresses to RAM and
/// memory-mapped devices; the CPU performs no mirroring or aliasing of
/// its own.
///
/// Reads and writes may have device side effects (clearing interrupt
/// flags, starting timers, queuing serial data).
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Pacing hook, called once per completed instruction with the
    /// number of cycles it consumed.
    ///
    /// Implementations that model a real-time clock sleep here to hold
    /// the emulated clock rate. The default does nothing, which runs
    /// the CPU as fast as the host allows.
    fn tick(&mut self, cycles: u32) {
        let _ = cycles;
    }
}
