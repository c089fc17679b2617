use std::fmt::{Display, Formatter};

/// Operation selected on the ALU for the current cycle.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum AluOp {
    And,
    Or,
    Add,
    Sub,
    Xor,
    Inc
}
impl AluOp {
    /// Whether the carry-out of this operation is latched into the status flag pipeline.
    pub fn is_arithmetic(&self) -> bool {
        match *self {
            AluOp::Add | AluOp::Sub | AluOp::Inc => true,
            AluOp::And | AluOp::Or | AluOp::Xor => false
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match *self {
            AluOp::And => "AND",
            AluOp::Or => "ORA",
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Xor => "XOR",
            AluOp::Inc => "INC"
        }
    }
}
impl Display for AluOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct AluOutput {
    pub result: u8,
    pub carry: bool
}

/// The combinational 8-bit arithmetic/logic unit.
///
/// The carry-out of the logic operations is a don't-care in hardware and is always reported as
/// `false`. `SUB` goes through the same 9-bit carry path as `ADD`: the carry is bit 8 of the
/// two's-complement difference, so it is set exactly when the subtraction borrows.
pub struct ArithmeticLogicUnit;
impl ArithmeticLogicUnit {
    pub fn compute(op: AluOp, in1: u8, in2: u8) -> AluOutput {
        let (result, carry) = match op {
            AluOp::And => (in1 & in2, false),
            AluOp::Or => (in1 | in2, false),
            AluOp::Xor => (in1 ^ in2, false),
            AluOp::Add => in1.overflowing_add(in2),
            AluOp::Sub => in1.overflowing_sub(in2),
            AluOp::Inc => in1.overflowing_add(1)
        };

        AluOutput { result, carry }
    }
}

#[cfg(test)]
mod test {
    use crate::processor::alu::{AluOp, ArithmeticLogicUnit as Alu, AluOutput};

    fn nine_bit(op: AluOp, in1: u8, in2: u8) -> AluOutput {
        let wide = match op {
            AluOp::Add => in1 as u16 + in2 as u16,
            AluOp::Sub => (in1 as u16).wrapping_sub(in2 as u16) & 0x1FF,
            AluOp::Inc => in1 as u16 + 1,
            _ => unreachable!()
        };
        AluOutput { result: (wide & 0xFF) as u8, carry: wide & 0x100 != 0 }
    }

    #[test]
    fn logic_operations() {
        assert_eq!(Alu::compute(AluOp::And, 0xAA, 0x0F).result, 0x0A);
        assert_eq!(Alu::compute(AluOp::Or, 0xA0, 0x05).result, 0xA5);
        assert_eq!(Alu::compute(AluOp::Xor, 0xAA, 0x55).result, 0xFF);
        assert_eq!(Alu::compute(AluOp::Xor, 0x3C, 0x3C).result, 0x00);
    }

    #[test]
    fn add_carry_on_overflow() {
        assert_eq!(Alu::compute(AluOp::Add, 100, 27), AluOutput { result: 127, carry: false });
        assert_eq!(Alu::compute(AluOp::Add, 200, 56), AluOutput { result: 0, carry: true });
        assert_eq!(Alu::compute(AluOp::Add, 255, 255), AluOutput { result: 254, carry: true });
    }

    #[test]
    fn sub_borrow() {
        assert_eq!(Alu::compute(AluOp::Sub, 50, 8), AluOutput { result: 42, carry: false });
        assert_eq!(Alu::compute(AluOp::Sub, 8, 8), AluOutput { result: 0, carry: false });
        assert_eq!(Alu::compute(AluOp::Sub, 8, 9), AluOutput { result: 255, carry: true });
    }

    #[test]
    fn inc_ignores_second_operand() {
        assert_eq!(Alu::compute(AluOp::Inc, 41, 0xFF), AluOutput { result: 42, carry: false });
        assert_eq!(Alu::compute(AluOp::Inc, 255, 0x00), AluOutput { result: 0, carry: true });
    }

    #[test]
    fn arithmetic_matches_nine_bit_datapath() {
        for op in [AluOp::Add, AluOp::Sub, AluOp::Inc].iter() {
            for in1 in 0..=255u8 {
                for in2 in (0..=255u8).step_by(17) {
                    assert_eq!(Alu::compute(*op, in1, in2), nine_bit(*op, in1, in2), "{} {} {}", op, in1, in2);
                }
            }
        }
    }

    #[test]
    fn only_arithmetic_feeds_the_flag() {
        assert!(AluOp::Add.is_arithmetic());
        assert!(AluOp::Sub.is_arithmetic());
        assert!(AluOp::Inc.is_arithmetic());
        assert!(!AluOp::And.is_arithmetic());
        assert!(!AluOp::Or.is_arithmetic());
        assert!(!AluOp::Xor.is_arithmetic());
    }
}
