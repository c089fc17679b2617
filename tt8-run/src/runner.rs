use std::fmt::{Display, Formatter};

use tt8_asm::program::{Program, ProgramStep, Step};
use tt8_sim::bus::{Bus, BusSocket};
use tt8_sim::chip::Chip;
use tt8_sim::error::{SimulationError, SimulationErrorKind, SimulationResult};

/// Cycles spent in reset before the first step, as on the bench.
pub const POWER_ON_RESET_CYCLES: usize = 5;

/// What one clock cycle looked like from the outside.
#[derive(Debug)]
pub struct TraceRow {
    pub cycle: u64,
    pub step: Step,
    pub line: usize,
    pub output: u8,
    pub flag: bool,
    pub pending: bool,
    pub fault: Option<SimulationError>
}
impl Display for TraceRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:6}  {:4}  {:<20}  {:#04X}  {}  {}",
            self.cycle,
            self.line,
            self.step.to_string(),
            self.output,
            self.flag as u8,
            self.pending as u8
        )
    }
}

/// Drives a [`Chip`] through its ports, one program step per clock.
pub struct Runner {
    chip: Chip,
    command: BusSocket<u8, u8>,
    data: BusSocket<u8, u8>
}
impl Runner {
    pub fn new() -> Self {
        let chip = Chip::new();
        let command = chip.ui_in().socket();
        let data = chip.uio_in().socket();
        Runner { chip, command, data }
    }

    pub fn chip(&self) -> &Chip {
        &self.chip
    }

    pub async fn power_on(&mut self) -> SimulationResult<()> {
        self.chip.reset(POWER_ON_RESET_CYCLES).await
    }

    /// Presents `command`/`data` on the ports and clocks once.
    pub async fn drive(&mut self, command: u8, data: u8) -> SimulationResult<()> {
        self.command.write(command).await;
        self.data.write(data).await;
        self.chip.clock().await
    }

    /// Runs a single step. Unimplemented instructions are recorded in the row, not propagated.
    pub async fn execute(&mut self, step: &ProgramStep) -> SimulationResult<TraceRow> {
        let result = match step.step {
            Step::Execute { command, data } => self.drive(command, data).await,
            Step::Reset => self.chip.reset(1).await
        };
        let fault = match result {
            Ok(()) => None,
            Err(e) if e.kind() == SimulationErrorKind::UnimplementedInstruction => {
                log::warn!("line {}: {}", step.line, e);
                Some(e)
            },
            Err(e) => return Err(e)
        };

        let processor = self.chip.processor();
        Ok(TraceRow {
            cycle: processor.cycles(),
            step: step.step,
            line: step.line,
            output: self.chip.peek_output()?,
            flag: processor.flag(),
            pending: processor.pending_carry(),
            fault
        })
    }

    /// Runs the whole program, then `idle` more cycles repeating its last step.
    pub async fn run(&mut self, program: &Program, idle: usize) -> SimulationResult<Vec<TraceRow>> {
        let mut rows = Vec::with_capacity(program.len() + idle);
        for step in program {
            rows.push(self.execute(step).await?);
        }
        if let Some(last) = program.last() {
            for _ in 0..idle {
                rows.push(self.execute(last).await?);
            }
        }
        Ok(rows)
    }
}
impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}
