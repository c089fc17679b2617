use crate::Signal;
use crate::bus::{Bus, Bus8, BusSocket};
use crate::clock::Clock;
use crate::error::SimulationResult;
use crate::processor::Processor;

/// The packaged core: command, data and output ports plus the reset line.
///
/// The testbench drives `ui_in` (command) and `uio_in` (data) through sockets obtained from the
/// chip, then calls [`Chip::clock`]; the output port `uo_out` is refreshed after every edge and on
/// [`Chip::settle`].
pub struct Chip {
    processor: Processor,
    ui_in: Bus8,
    uio_in: Bus8,
    uo_out: Bus8,
    command: BusSocket<u8, u8>,
    data: BusSocket<u8, u8>,
    output: BusSocket<u8, u8>,
    rst_n: Signal
}
impl Chip {
    pub fn new() -> Self {
        let ui_in = Bus8::new();
        let uio_in = Bus8::new();
        let uo_out = Bus8::new();
        let command = ui_in.socket();
        let data = uio_in.socket();
        let output = uo_out.socket();

        Chip {
            processor: Processor::new(),
            ui_in,
            uio_in,
            uo_out,
            command,
            data,
            output,
            rst_n: Signal::High
        }
    }

    pub fn ui_in(&self) -> &Bus8 {
        &self.ui_in
    }

    pub fn uio_in(&self) -> &Bus8 {
        &self.uio_in
    }

    pub fn uo_out(&self) -> &Bus8 {
        &self.uo_out
    }

    pub fn set_reset(&mut self, rst_n: Signal) {
        self.rst_n = rst_n;
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Samples the input ports and propagates the combinational output without clocking.
    pub async fn settle(&mut self) {
        let command = self.command.read().await;
        let data = self.data.read().await;
        self.processor.set_inputs(command, data);
        self.processor.set_reset(self.rst_n);
        self.output.write(self.processor.output()).await;
    }

    /// Runs one clock period with the values currently on the input ports.
    ///
    /// The output port is refreshed even when the cycle reports an error.
    pub async fn clock(&mut self) -> SimulationResult<()> {
        self.settle().await;
        let result = self.processor.cycle();
        self.output.write(self.processor.output()).await;
        result
    }

    /// Holds `rst_n` low for `cycles` clock periods.
    pub async fn reset(&mut self, cycles: usize) -> SimulationResult<()> {
        let rst_n = self.rst_n;
        self.set_reset(Signal::Low);
        for _ in 0..cycles {
            self.clock().await?;
        }
        self.set_reset(rst_n);
        Ok(())
    }

    /// Reads `uo_out` without waiting for the bus.
    pub fn peek_output(&self) -> SimulationResult<u8> {
        self.output.try_read()
    }
}
impl Default for Chip {
    fn default() -> Self {
        Chip::new()
    }
}
