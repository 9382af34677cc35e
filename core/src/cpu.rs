use crate::Bus;

/// A CPU that can execute instructions.
///
/// The type parameter `B` is the bus type this CPU operates on. All
/// methods return the number of clock cycles consumed, which the host
/// uses to advance peripherals at their own rates.
pub trait Cpu<B: Bus> {
    /// Execute one instruction. Returns cycles consumed, or 0 if the
    /// CPU is halted.
    fn step(&mut self, bus: &mut B) -> u32;

    /// Perform the reset sequence: registers to their power-on state,
    /// PC loaded from the reset vector. Clears a halted CPU. Returns 7.
    fn reset(&mut self, bus: &mut B) -> u32;

    /// Signal a maskable interrupt. Returns 7 if taken, 0 if masked.
    fn irq(&mut self, bus: &mut B) -> u32;

    /// Signal a non-maskable interrupt. Returns 7.
    fn nmi(&mut self, bus: &mut B) -> u32;

    /// Get the current program counter.
    fn pc(&self) -> u16;
}
