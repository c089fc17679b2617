use std::fmt::{Display, Formatter};

use crate::error::{SimulationError, SimulationResult};
use crate::processor::alu::AluOp;

macro_rules! bit_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident : $bitmask:literal >> $shift:literal {
        $($(#[$v_meta:meta])* $v_name:ident $(= $val:expr)?,)*
    }) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$v_meta])* $v_name $(= $val)?,)*
        }
        impl $name {
            pub fn decode(val: u8) -> Option<$name> {
                match (val & $bitmask) >> $shift {
                    $(x if x == $name::$v_name as u8 => Some($name::$v_name),)*
                    _ => None,
                }
            }

            pub fn encode(&self) -> u8 {
                (*self as u8) << $shift
            }
        }
    }
}

bit_enum! {
    /// The instruction set, selected by the high nibble of the command byte.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
    #[repr(u8)]
    pub enum Opcode : 0b1111_0000 >> 4 {
        /// Load the data byte into the register.
        Ldb = 0b0001,
        /// Drive the register onto the output port.
        Stb = 0b0010,
        /// Drive the status flag onto the output port.
        Rds = 0b0011,
        And = 0b1001,
        Ora = 0b1010,
        Add = 0b1011,
        Sub = 0b1100,
        Xor = 0b1101,
        Inc = 0b1110,
    }
}
impl Opcode {
    pub fn parse(mnemonic: &str) -> Option<Self> {
        let mnemonic_lc = mnemonic.to_lowercase();
        match &mnemonic_lc[..] {
            "ldb" => Some(Opcode::Ldb),
            "stb" => Some(Opcode::Stb),
            "rds" => Some(Opcode::Rds),
            "and" => Some(Opcode::And),
            "ora" => Some(Opcode::Ora),
            "add" => Some(Opcode::Add),
            "sub" => Some(Opcode::Sub),
            "xor" => Some(Opcode::Xor),
            "inc" => Some(Opcode::Inc),
            _ => None
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match *self {
            Opcode::Ldb => "LDB",
            Opcode::Stb => "STB",
            Opcode::Rds => "RDS",
            Opcode::And => "AND",
            Opcode::Ora => "ORA",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Xor => "XOR",
            Opcode::Inc => "INC"
        }
    }

    pub fn alu_op(&self) -> Option<AluOp> {
        match *self {
            Opcode::And => Some(AluOp::And),
            Opcode::Ora => Some(AluOp::Or),
            Opcode::Add => Some(AluOp::Add),
            Opcode::Sub => Some(AluOp::Sub),
            Opcode::Xor => Some(AluOp::Xor),
            Opcode::Inc => Some(AluOp::Inc),
            Opcode::Ldb | Opcode::Stb | Opcode::Rds => None
        }
    }
}
impl From<AluOp> for Opcode {
    fn from(op: AluOp) -> Self {
        match op {
            AluOp::And => Opcode::And,
            AluOp::Or => Opcode::Ora,
            AluOp::Add => Opcode::Add,
            AluOp::Sub => Opcode::Sub,
            AluOp::Xor => Opcode::Xor,
            AluOp::Inc => Opcode::Inc
        }
    }
}
impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A 4-bit register address.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct Register(u8);
impl Register {
    pub fn new(index: u8) -> Option<Self> {
        if index < 16 { Some(Register(index)) } else { None }
    }

    /// Takes the low four bits of `value`; every nibble names a valid register.
    pub fn from_nibble(value: u8) -> Self {
        Register(value & 0x0F)
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name_lc = name.to_lowercase();
        name_lc.strip_prefix('r')
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(Register::new)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn nibble(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Register> {
        (0..16).map(Register)
    }
}
impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A decoded command/data byte pair.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Instruction {
    Ldb { dst: Register, imm: u8 },
    Stb { src: Register },
    Rds,
    /// Two-operand ALU operation: `dst <- src1 op src2`.
    Alu { op: AluOp, dst: Register, src1: Register, src2: Register },
    Inc { dst: Register, src: Register }
}
impl Instruction {
    pub fn decode(command: u8, data: u8) -> SimulationResult<Self> {
        let opcode = Opcode::decode(command)
            .ok_or_else(|| SimulationError::unimplemented_instruction(command))?;
        let register = Register::from_nibble(command);
        let high = Register::from_nibble(data >> 4);
        let low = Register::from_nibble(data);
        let two_operand = |op| Instruction::Alu { op, dst: register, src1: high, src2: low };

        let instruction = match opcode {
            Opcode::Ldb => Instruction::Ldb { dst: register, imm: data },
            Opcode::Stb => Instruction::Stb { src: register },
            Opcode::Rds => Instruction::Rds,
            Opcode::Inc => Instruction::Inc { dst: register, src: high },
            Opcode::And => two_operand(AluOp::And),
            Opcode::Ora => two_operand(AluOp::Or),
            Opcode::Add => two_operand(AluOp::Add),
            Opcode::Sub => two_operand(AluOp::Sub),
            Opcode::Xor => two_operand(AluOp::Xor)
        };
        Ok(instruction)
    }

    /// Produces the `(command, data)` port values for this instruction; don't-care bits are zero.
    pub fn encode(&self) -> (u8, u8) {
        match *self {
            Instruction::Ldb { dst, imm } => (Opcode::Ldb.encode() | dst.nibble(), imm),
            Instruction::Stb { src } => (Opcode::Stb.encode() | src.nibble(), 0),
            Instruction::Rds => (Opcode::Rds.encode(), 0),
            Instruction::Alu { op, dst, src1, src2 } => (Opcode::from(op).encode() | dst.nibble(), (src1.nibble() << 4) | src2.nibble()),
            Instruction::Inc { dst, src } => (Opcode::Inc.encode() | dst.nibble(), src.nibble() << 4)
        }
    }
}
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Instruction::Ldb { dst, imm } => write!(f, "LDB {}, {:#04X}", dst, imm),
            Instruction::Stb { src } => write!(f, "STB {}", src),
            Instruction::Rds => write!(f, "RDS"),
            Instruction::Alu { op, dst, src1, src2 } => write!(f, "{} {}, {}, {}", op, dst, src1, src2),
            Instruction::Inc { dst, src } => write!(f, "INC {}, {}", dst, src)
        }
    }
}

#[cfg(test)]
mod test {
    use crate::error::SimulationErrorKind;
    use crate::processor::alu::AluOp;
    use crate::processor::decoder::{Instruction, Opcode, Register};

    fn r(n: u8) -> Register {
        Register::from_nibble(n)
    }

    #[test]
    fn decode_opcode_nibble() {
        assert_eq!(Opcode::decode(0x13), Some(Opcode::Ldb));
        assert_eq!(Opcode::decode(0x2F), Some(Opcode::Stb));
        assert_eq!(Opcode::decode(0x30), Some(Opcode::Rds));
        assert_eq!(Opcode::decode(0x93), Some(Opcode::And));
        assert_eq!(Opcode::decode(0xA0), Some(Opcode::Ora));
        assert_eq!(Opcode::decode(0xB0), Some(Opcode::Add));
        assert_eq!(Opcode::decode(0xC0), Some(Opcode::Sub));
        assert_eq!(Opcode::decode(0xD3), Some(Opcode::Xor));
        assert_eq!(Opcode::decode(0xE3), Some(Opcode::Inc));

        for undefined in [0x0u8, 0x4, 0x5, 0x6, 0x7, 0x8, 0xF].iter() {
            assert_eq!(Opcode::decode(undefined << 4), None);
        }
    }

    #[test]
    fn decode_operand_fields() {
        assert_eq!(Instruction::decode(0x13, 123).unwrap(), Instruction::Ldb { dst: r(3), imm: 123 });
        assert_eq!(Instruction::decode(0x23, 0xFF).unwrap(), Instruction::Stb { src: r(3) });
        assert_eq!(Instruction::decode(0x3A, 0x5C).unwrap(), Instruction::Rds);
        assert_eq!(Instruction::decode(0xD3, 0x21).unwrap(), Instruction::Alu { op: AluOp::Xor, dst: r(3), src1: r(2), src2: r(1) });
        assert_eq!(Instruction::decode(0xC7, 0x9E).unwrap(), Instruction::Alu { op: AluOp::Sub, dst: r(7), src1: r(9), src2: r(14) });
        assert_eq!(Instruction::decode(0xE3, 0x3F).unwrap(), Instruction::Inc { dst: r(3), src: r(3) });
    }

    #[test]
    fn undefined_opcode_is_unimplemented() {
        let error = Instruction::decode(0x0F, 0x00).unwrap_err();
        assert_eq!(error.kind(), SimulationErrorKind::UnimplementedInstruction);
        assert_eq!(error.code(), Some(0x0F));

        assert!(Instruction::decode(0x80, 0x00).is_err());
        assert!(Instruction::decode(0xF1, 0x00).is_err());
    }

    #[test]
    fn encode_clears_dont_care_bits() {
        assert_eq!(Instruction::Stb { src: r(3) }.encode(), (0x23, 0x00));
        assert_eq!(Instruction::Rds.encode(), (0x30, 0x00));
        assert_eq!(Instruction::Inc { dst: r(1), src: r(2) }.encode(), (0xE1, 0x20));
        assert_eq!(Instruction::Alu { op: AluOp::Add, dst: r(4), src1: r(5), src2: r(6) }.encode(), (0xB4, 0x56));
    }

    #[test]
    fn every_defined_command_survives_reencoding() {
        for command in 0..=255u8 {
            if let Ok(instruction) = Instruction::decode(command, 0xA5) {
                let (command, data) = instruction.encode();
                assert_eq!(Instruction::decode(command, data).unwrap(), instruction);
            }
        }
    }

    #[test]
    fn display_uses_assembler_syntax() {
        assert_eq!(Instruction::decode(0x13, 123).unwrap().to_string(), "LDB r3, 0x7B");
        assert_eq!(Instruction::decode(0xD3, 0x21).unwrap().to_string(), "XOR r3, r2, r1");
        assert_eq!(Instruction::decode(0xA0, 0x12).unwrap().to_string(), "ORA r0, r1, r2");
        assert_eq!(Instruction::decode(0xEF, 0xF0).unwrap().to_string(), "INC r15, r15");
    }

    #[test]
    fn register_names() {
        assert_eq!(Register::parse("r0"), Some(r(0)));
        assert_eq!(Register::parse("R15"), Some(r(15)));
        assert_eq!(Register::parse("r16"), None);
        assert_eq!(Register::parse("x1"), None);
        assert_eq!(Register::new(16), None);
        assert_eq!(Register::all().count(), 16);
    }
}
