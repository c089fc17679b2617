pub mod token;

pub mod prelude {
    pub use super::token::Token;
    pub use super::token::TokenClass;
    pub use super::token::TokenLine;
    pub use super::TokenStream;
}

use std::path::PathBuf;
use std::rc::Rc;

use crate::assembly::Assembly;
use crate::parser::{parse_statement, Statement};
use crate::program::{Program, Step};
use crate::result::prelude::*;
use token::TokenLine;

/// A tokenized assembly file, ready to be parsed.
pub struct TokenStream {
    filename: PathBuf,
    contents: Rc<String>,
    lines: Vec<TokenLine>,
    log: AssemblerLog
}
impl TokenStream {
    pub fn from_assembly(assembly: Assembly) -> Result<Self, AssemblerLog> {
        let (filename, contents, mut log) = assembly.into_parts();
        let lines = contents.lines()
            .enumerate()
            .map(|(n, line)| TokenLine::tokenize(n + 1, line, &mut log))
            .collect();

        if log.is_err() {
            log.update();
            Err(log)
        } else {
            Ok(TokenStream { filename, contents, lines, log })
        }
    }

    /// Parses every line and expands the directives into one step per clock cycle.
    pub fn parse(self) -> Result<AssembledProgram, AssemblerLog> {
        let TokenStream { filename, contents, lines, mut log } = self;
        let mut program = Program::new();

        for line in lines.iter() {
            let statement = match parse_statement(line, &mut log) {
                Some(statement) => statement,
                None => continue
            };
            match statement {
                Statement::Instruction(instruction) => {
                    let (command, data) = instruction.encode();
                    program.push(Step::Execute { command, data }, line.line());
                },
                Statement::Raw { command, data } => program.push(Step::Execute { command, data }, line.line()),
                Statement::Reset(cycles) => {
                    for _ in 0..cycles {
                        program.push(Step::Reset, line.line());
                    }
                },
                Statement::Wait(cycles) => {
                    let previous = match program.last() {
                        Some(previous) => previous.step,
                        None => {
                            let mnemonic = &line.tokens()[0];
                            log.err(Notification::error_wait_without_instruction(mnemonic));
                            continue;
                        }
                    };
                    for _ in 0..cycles {
                        program.push(previous, line.line());
                    }
                }
            }
        }

        log.update();
        if log.is_err() {
            Err(log)
        } else {
            log::debug!("{}: {} line(s) assembled into {} cycle(s)", filename.to_string_lossy(), contents.lines().count(), program.len());
            Ok(AssembledProgram { program, log })
        }
    }
}

/// The result of a successful assembly: the program and any warnings emitted on the way.
#[derive(Debug)]
pub struct AssembledProgram {
    program: Program,
    log: AssemblerLog
}
impl AssembledProgram {
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn warnings(&self) -> &AssemblerLog {
        &self.log
    }

    pub fn into_program(self) -> Program {
        self.program
    }
}
