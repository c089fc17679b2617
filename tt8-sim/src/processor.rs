pub mod alu;
pub mod decoder;
pub mod register_file;
pub mod status;

use crate::Signal;
use crate::clock::Clock;
use crate::error::SimulationResult;

use self::alu::{AluOp, ArithmeticLogicUnit};
use self::decoder::{Instruction, Register};
use self::register_file::{RegisterFile, REGISTER_COUNT};
use self::status::{CarryStage, StatusFlag};

/// The registered write strobe towards the register file.
///
/// `w_reg` and `w_data` keep their last value while `write` is low.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct WriteBack {
    pub write: bool,
    pub w_reg: Register,
    pub w_data: u8
}
impl WriteBack {
    pub fn idle() -> Self {
        WriteBack {
            write: false,
            w_reg: Register::from_nibble(0),
            w_data: 0
        }
    }
}

/// What the decoder asks of the rest of the core for one instruction.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
struct Effects {
    write: Option<(Register, u8)>,
    output: Option<u8>,
    carry: Option<bool>
}

/// The decoder/sequencer together with the register file, ALU and status flag.
///
/// Inputs are presented with [`Processor::set_inputs`] and sampled on the rising edge. All
/// reads of a cycle happen against the state at the start of the cycle; the write-back and the
/// carry latch take effect on the edge.
pub struct Processor {
    register_file: RegisterFile,
    status: StatusFlag,
    write_back: WriteBack,
    command: u8,
    data: u8,
    rst_n: Signal,
    output: u8,
    cycles: u64
}
impl Processor {
    pub fn new() -> Self {
        Processor {
            register_file: RegisterFile::new(),
            status: StatusFlag::new(),
            write_back: WriteBack::idle(),
            command: 0,
            data: 0,
            rst_n: Signal::High,
            output: 0,
            cycles: 0
        }
    }

    /// Drives the command and data ports for the coming edge.
    pub fn set_inputs(&mut self, command: u8, data: u8) {
        self.command = command;
        self.data = data;
    }

    /// Drives the active-low reset line; it is sampled on the coming edge.
    pub fn set_reset(&mut self, rst_n: Signal) {
        self.rst_n = rst_n;
    }

    /// Presents one instruction and runs a full clock period.
    pub fn step(&mut self, command: u8, data: u8) -> SimulationResult<()> {
        self.set_inputs(command, data);
        self.cycle()
    }

    /// Holds reset low for one clock period.
    pub fn reset(&mut self) -> SimulationResult<()> {
        let rst_n = self.rst_n;
        self.set_reset(Signal::Low);
        let result = self.cycle();
        self.set_reset(rst_n);
        result
    }

    /// The instruction currently presented on the ports.
    pub fn instruction(&self) -> SimulationResult<Instruction> {
        Instruction::decode(self.command, self.data)
    }

    /// Value on the output port for the current inputs.
    ///
    /// `STB` and `RDS` drive the port combinationally from the state as of the start of the cycle;
    /// any other input leaves the last driven value on the port.
    pub fn output(&self) -> u8 {
        match self.instruction() {
            Ok(instruction) => self.evaluate(instruction).output.unwrap_or(self.output),
            Err(_) => self.output
        }
    }

    pub fn register(&self, register: Register) -> u8 {
        self.register_file.read(register)
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        self.register_file.cells()
    }

    /// The committed status flag.
    pub fn flag(&self) -> bool {
        self.status.flag()
    }

    pub fn pending_carry(&self) -> bool {
        self.status.pending_carry()
    }

    pub fn carry_stage(&self) -> CarryStage {
        self.status.stage()
    }

    pub fn write_back(&self) -> WriteBack {
        self.write_back
    }

    /// Rising edges seen since construction, including reset cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn evaluate(&self, instruction: Instruction) -> Effects {
        match instruction {
            Instruction::Ldb { dst, imm } => Effects { write: Some((dst, imm)), ..Effects::default() },
            Instruction::Stb { src } => Effects { output: Some(self.register_file.read(src)), ..Effects::default() },
            Instruction::Rds => Effects { output: Some(self.status.flag() as u8), ..Effects::default() },
            Instruction::Alu { op, dst, src1, src2 } => self.evaluate_alu(op, dst, src1, src2),
            Instruction::Inc { dst, src } => self.evaluate_alu(AluOp::Inc, dst, src, src)
        }
    }

    fn evaluate_alu(&self, op: AluOp, dst: Register, src1: Register, src2: Register) -> Effects {
        let in1 = self.register_file.read(src1);
        let in2 = self.register_file.read(src2);
        let out = ArithmeticLogicUnit::compute(op, in1, in2);

        Effects {
            write: Some((dst, out.result)),
            output: None,
            carry: if op.is_arithmetic() { Some(out.carry) } else { None }
        }
    }

    fn clock_reset(&mut self) {
        log::debug!("cycle {}: reset", self.cycles);
        self.register_file.reset();
        self.status.reset();
        self.write_back = WriteBack::idle();
        self.output = 0;
    }
}
impl Default for Processor {
    fn default() -> Self {
        Processor::new()
    }
}
impl Clock for Processor {
    fn clock_rise(&mut self) -> SimulationResult<()> {
        self.cycles += 1;

        if self.rst_n.is_low() {
            self.clock_reset();
            return Ok(());
        }

        let instruction = match self.instruction() {
            Ok(instruction) => instruction,
            Err(e) => {
                log::warn!("cycle {}: {}", self.cycles, e);
                self.status.clock(None);
                self.write_back.write = false;
                return Err(e);
            }
        };
        log::trace!("cycle {}: {}", self.cycles, instruction);

        let effects = self.evaluate(instruction);
        if let Some(output) = effects.output {
            self.output = output;
        }
        match effects.write {
            Some((register, value)) => {
                self.register_file.write(register, value);
                self.write_back = WriteBack { write: true, w_reg: register, w_data: value };
            },
            None => self.write_back.write = false
        }
        self.status.clock(effects.carry);
        self.register_file.clock_rise()
    }
}
