use tt8_sim::processor::decoder::{Instruction, Opcode, Register};

use crate::lexer::prelude::*;
use crate::result::prelude::*;

/// Longest `RESET`/`WAIT` run accepted in a single statement.
pub const MAX_REPEAT: u64 = 65_536;

/// A single parsed source line.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Statement {
    Instruction(Instruction),
    /// `DB command, data`: raw port values, defined opcode or not.
    Raw { command: u8, data: u8 },
    /// `RESET [n]`: hold reset low for `n` cycles.
    Reset(usize),
    /// `WAIT n`: repeat the previous cycle `n` more times.
    Wait(usize)
}

fn expect_register(token: &Token, log: &mut AssemblerLog) -> Option<Register> {
    match token.class() {
        TokenClass::Register => Register::parse(token.as_str()),
        _ => {
            log.err(Notification::error_parser_expected_found(token, "register", token.as_str()));
            None
        }
    }
}

fn expect_integer(token: &Token, max: u64, log: &mut AssemblerLog) -> Option<u64> {
    if token.class() != TokenClass::IntegerLiteral {
        log.err(Notification::error_parser_expected_found(token, "integer", token.as_str()));
        return None;
    }
    match token.integer_value() {
        Some(value) if value <= max => Some(value),
        Some(value) => {
            log.err(Notification::error_value_out_of_range(token, value, max));
            None
        },
        None => {
            log.err(Notification::error_invalid_number_format(token, token.as_str()));
            None
        }
    }
}

fn expect_byte(token: &Token, log: &mut AssemblerLog) -> Option<u8> {
    expect_integer(token, u8::MAX as u64, log).map(|v| v as u8)
}

/// Splits the tokens after the mnemonic into comma-separated single-token operands.
fn operands<'a>(line: &'a TokenLine, log: &mut AssemblerLog) -> Option<Vec<&'a Token>> {
    let mut operands = Vec::new();
    let mut expect_operand = true;

    for token in line.tokens().iter().skip(1) {
        match (expect_operand, token.class()) {
            (true, TokenClass::Comma) => {
                log.err(Notification::error_parser_expected_found(token, "operand", token.as_str()));
                return None;
            },
            (true, _) => {
                operands.push(token);
                expect_operand = false;
            },
            (false, TokenClass::Comma) => expect_operand = true,
            (false, _) => {
                log.err(Notification::error_parser_expected_found(token, "`,`", token.as_str()));
                return None;
            }
        }
    }
    if expect_operand && !operands.is_empty() {
        log.err(Notification::error_parser_expected_found(line.end_of_line(), "operand", ""));
        return None;
    }
    Some(operands)
}

fn check_amount(mnemonic: &Token, operands: &[&Token], expected: &[usize], log: &mut AssemblerLog) -> Option<()> {
    if expected.contains(&operands.len()) {
        Some(())
    } else {
        let location = operands.last()
            .map(|op| mnemonic.locate() | op.locate())
            .unwrap_or_else(|| mnemonic.locate());
        log.err(Notification::error_operands_amount(location, expected, operands.len()));
        None
    }
}

fn parse_instruction(opcode: Opcode, mnemonic: &Token, operands: &[&Token], log: &mut AssemblerLog) -> Option<Instruction> {
    let instruction = match opcode {
        Opcode::Ldb => {
            check_amount(mnemonic, operands, &[2], log)?;
            let dst = expect_register(operands[0], log);
            let imm = expect_byte(operands[1], log);
            Instruction::Ldb { dst: dst?, imm: imm? }
        },
        Opcode::Stb => {
            check_amount(mnemonic, operands, &[1], log)?;
            Instruction::Stb { src: expect_register(operands[0], log)? }
        },
        Opcode::Rds => {
            check_amount(mnemonic, operands, &[0], log)?;
            Instruction::Rds
        },
        Opcode::Inc => {
            check_amount(mnemonic, operands, &[1, 2], log)?;
            let registers = operands.iter()
                .map(|op| expect_register(op, log))
                .collect::<Vec<_>>();
            let dst = registers[0]?;
            let src = match registers.get(1) {
                Some(src) => (*src)?,
                None => dst
            };
            Instruction::Inc { dst, src }
        },
        Opcode::And | Opcode::Ora | Opcode::Add | Opcode::Sub | Opcode::Xor => {
            check_amount(mnemonic, operands, &[3], log)?;
            let registers = operands.iter()
                .map(|op| expect_register(op, log))
                .collect::<Vec<_>>();
            Instruction::Alu {
                op: opcode.alu_op()?,
                dst: registers[0]?,
                src1: registers[1]?,
                src2: registers[2]?
            }
        }
    };
    Some(instruction)
}

fn parse_repeat(mnemonic: &Token, operands: &[&Token], default: Option<usize>, log: &mut AssemblerLog) -> Option<usize> {
    let amounts: &[usize] = if default.is_some() { &[0, 1] } else { &[1] };
    check_amount(mnemonic, operands, amounts, log)?;
    let count = match operands.first() {
        Some(op) => expect_integer(op, MAX_REPEAT, log)? as usize,
        None => default.unwrap_or(1)
    };
    if count == 0 {
        log.warn(Notification::warning_no_effect(mnemonic.locate() | operands[0].locate(), format!("{} 0", mnemonic.as_str())));
    }
    Some(count)
}

/// Parses one tokenized line; `None` for blank lines and for lines with errors.
pub fn parse_statement(line: &TokenLine, log: &mut AssemblerLog) -> Option<Statement> {
    let mnemonic = line.tokens().first()?;
    if mnemonic.class() != TokenClass::Ident {
        log.err(Notification::error_parser_expected_found(mnemonic, "instruction", mnemonic.as_str()));
        return None;
    }
    let operands = operands(line, log)?;

    if let Some(opcode) = Opcode::parse(mnemonic.as_str()) {
        return parse_instruction(opcode, mnemonic, &operands, log).map(Statement::Instruction);
    }

    match &mnemonic.as_str().to_lowercase()[..] {
        "reset" => parse_repeat(mnemonic, &operands, Some(1), log).map(Statement::Reset),
        "wait" => parse_repeat(mnemonic, &operands, None, log).map(Statement::Wait),
        "db" => {
            check_amount(mnemonic, &operands, &[2], log)?;
            let command = expect_byte(operands[0], log);
            let data = expect_byte(operands[1], log);
            let (command, data) = (command?, data?);
            if Opcode::decode(command).is_none() {
                log.warn(Notification::warning_unimplemented_opcode(operands[0], command));
            }
            Some(Statement::Raw { command, data })
        },
        _ => {
            log.err(Notification::error_unknown_mnemonic(mnemonic, mnemonic.as_str()));
            None
        }
    }
}
