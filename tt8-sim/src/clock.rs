use crate::error::SimulationResult;

/// A synchronous element driven by the single chip clock.
///
/// Only the rising edge does work in this design; the remaining phases exist so that components
/// can be composed with the same interface they would have on a two-phase clock.
pub trait Clock {
    fn clock_rise(&mut self) -> SimulationResult<()> { Ok(()) }
    fn clock_high(&mut self) -> SimulationResult<()> { Ok(()) }
    fn clock_fall(&mut self) -> SimulationResult<()> { Ok(()) }
    fn clock_low(&mut self) -> SimulationResult<()> { Ok(()) }

    /// Runs a complete clock period.
    fn cycle(&mut self) -> SimulationResult<()> {
        self.clock_rise()?;
        self.clock_high()?;
        self.clock_fall()?;
        self.clock_low()
    }
}
