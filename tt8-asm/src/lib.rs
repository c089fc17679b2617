//! Assembler for the tt8 core.
//!
//! Every source line turns into the port stimulus of one or more clock cycles:
//!
//! ```text
//! RESET 5              ; hold rst_n low for five cycles
//! LDB r1, 0xAA         ; r1 <- 0xAA
//! LDB r2, 0x55
//! XOR r3, r2, r1       ; r3 <- r2 ^ r1
//! STB r3               ; uo_out <- r3
//! WAIT 1               ; keep the ports as they are for one more cycle
//! ```

pub mod assembly;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod result;

pub use assembly::Assembly;
pub use lexer::AssembledProgram;
pub use program::{disassemble, Program, ProgramStep, Step};
