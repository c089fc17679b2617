use crate::clock::Clock;
use crate::error::SimulationResult;
use crate::processor::decoder::Register;

pub const REGISTER_COUNT: usize = 16;

/// Sixteen 8-bit cells with two read ports and one write port.
///
/// Writes are buffered in a shadow slot and land on the next rising edge, so a read of the
/// destination in the same cycle still returns the previous contents.
pub struct RegisterFile {
    cells: [u8; REGISTER_COUNT],
    shadow: Option<(Register, u8)>
}
impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            cells: [0; REGISTER_COUNT],
            shadow: None
        }
    }

    pub fn read(&self, register: Register) -> u8 {
        self.cells[register.index()]
    }

    /// Requests `value` to be stored into `register` at the next clock edge.
    ///
    /// Only one write port exists: a second request in the same cycle replaces the first.
    pub fn write(&mut self, register: Register, value: u8) {
        self.shadow = Some((register, value));
    }

    pub fn reset(&mut self) {
        self.cells = [0; REGISTER_COUNT];
        self.shadow = None;
    }

    pub fn cells(&self) -> &[u8; REGISTER_COUNT] {
        &self.cells
    }
}
impl Default for RegisterFile {
    fn default() -> Self {
        RegisterFile::new()
    }
}
impl Clock for RegisterFile {
    fn clock_rise(&mut self) -> SimulationResult<()> {
        if let Some((register, value)) = self.shadow.take() {
            self.cells[register.index()] = value;
        }
        Ok(())
    }
}
