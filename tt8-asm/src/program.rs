use std::fmt::{Display, Formatter};

use tt8_sim::processor::decoder::Instruction;

/// Port stimulus for a single clock cycle.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Step {
    /// Drive `ui_in`/`uio_in` with the given bytes, reset released.
    Execute { command: u8, data: u8 },
    /// Hold `rst_n` low.
    Reset
}
impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Step::Execute { command, data } => f.write_str(&disassemble(command, data)),
            Step::Reset => f.write_str("RESET")
        }
    }
}

/// A step together with the source line it was assembled from.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct ProgramStep {
    pub step: Step,
    pub line: usize
}

/// An assembled program: one entry per clock cycle.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Program {
    steps: Vec<ProgramStep>
}
impl Program {
    pub fn new() -> Self {
        Program {
            steps: Vec::new()
        }
    }

    pub fn push(&mut self, step: Step, line: usize) {
        self.steps.push(ProgramStep { step, line });
    }

    pub fn last(&self) -> Option<&ProgramStep> {
        self.steps.last()
    }

    pub fn steps(&self) -> &[ProgramStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Renders a listing with the cycle index, raw port bytes and disassembly.
    pub fn listing(&self) -> String {
        let mut listing = String::new();
        for (cycle, step) in self.steps.iter().enumerate() {
            let line = match step.step {
                Step::Execute { command, data } => format!("{:5}  {:02X} {:02X}  {}\n", cycle, command, data, step.step),
                Step::Reset => format!("{:5}  -- --  {}\n", cycle, step.step)
            };
            listing.push_str(&line);
        }
        listing
    }
}
impl<'a> IntoIterator for &'a Program {
    type Item = &'a ProgramStep;
    type IntoIter = std::slice::Iter<'a, ProgramStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Disassembles a command/data pair; undefined opcodes come back as a `DB` line.
pub fn disassemble(command: u8, data: u8) -> String {
    match Instruction::decode(command, data) {
        Ok(instruction) => instruction.to_string(),
        Err(_) => format!("DB {:#04X}, {:#04X}", command, data)
    }
}

#[cfg(test)]
mod test {
    use crate::program::{disassemble, Program, Step};

    #[test]
    fn disassemble_defined_and_undefined() {
        assert_eq!(disassemble(0x13, 123), "LDB r3, 0x7B");
        assert_eq!(disassemble(0x23, 0x00), "STB r3");
        assert_eq!(disassemble(0x30, 0x00), "RDS");
        assert_eq!(disassemble(0xE3, 0x30), "INC r3, r3");
        assert_eq!(disassemble(0x00, 0x00), "DB 0x00, 0x00");
        assert_eq!(disassemble(0x4A, 0x12), "DB 0x4A, 0x12");
    }

    #[test]
    fn listing() {
        let mut program = Program::new();
        program.push(Step::Reset, 1);
        program.push(Step::Execute { command: 0x13, data: 0x7B }, 2);

        assert_eq!(program.len(), 2);
        assert_eq!(program.listing(), "    0  -- --  RESET\n    1  13 7B  LDB r3, 0x7B\n");
    }
}
