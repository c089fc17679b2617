use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::lexer::{AssembledProgram, TokenStream};
use crate::result::prelude::*;

/// A source file about to be assembled.
pub struct Assembly {
    pub(self) filename: PathBuf,
    pub(self) contents: Rc<String>,
    pub(self) log: AssemblerLog
}
impl Assembly {
    pub fn new<P, S>(filename: P, contents: S) -> Assembly where
        P: AsRef<Path>,
        S: AsRef<str> {
        let contents = Rc::new(String::from(contents.as_ref()));
        let mut log = AssemblerLog::new();
        log.set_filename(&filename);
        log.set_text(contents.clone());

        Assembly {
            filename: filename.as_ref().to_path_buf(),
            contents,
            log
        }
    }

    pub fn from_file<P>(filename: P) -> std::io::Result<Assembly> where
        P: AsRef<Path> {
        let contents = std::fs::read_to_string(&filename)?;
        Ok(Assembly::new(filename, contents))
    }

    pub fn tokenize(self) -> Result<TokenStream, AssemblerLog> {
        TokenStream::from_assembly(self)
    }

    /// Runs the whole pipeline: tokenize, then parse.
    pub fn assemble(self) -> Result<AssembledProgram, AssemblerLog> {
        self.tokenize()?
            .parse()
    }

    pub(crate) fn into_parts(self) -> (PathBuf, Rc<String>, AssemblerLog) {
        (self.filename, self.contents, self.log)
    }
}

#[cfg(test)]
mod test {
    use crate::assembly::Assembly;
    use crate::program::Step;

    #[test]
    fn assemble_load_store() {
        let source = "RESET 5\nLDB r3, 123\nWAIT 1\n\nSTB r3 ; show it\nWAIT 1\n";
        let assembled = Assembly::new("load_store.asm", source).assemble().unwrap();
        let program = assembled.program();

        assert!(!assembled.warnings().is_err());
        assert_eq!(program.len(), 9);
        assert!(program.steps()[..5].iter().all(|s| s.step == Step::Reset));
        assert_eq!(program.steps()[5].step, Step::Execute { command: 0x13, data: 123 });
        assert_eq!(program.steps()[6].step, Step::Execute { command: 0x13, data: 123 });
        assert_eq!(program.steps()[7].step, Step::Execute { command: 0x23, data: 0 });
        assert_eq!(program.steps()[7].line, 5);
        assert_eq!(program.steps()[8].line, 6);
    }

    #[test]
    fn collects_every_error() {
        let source = "LDB r3, 300\nXOR r1, r2\nFOO\n";
        let log = Assembly::new("bad.asm", source).assemble().unwrap_err();

        assert_eq!(log.errors().len(), 3);
        let lines: Vec<_> = log.errors().iter().map(|e| format!("{:?}", e)).collect();
        assert!(lines[0].starts_with("bad.asm:1:9: value 300 does not fit the operand"));
        assert!(lines[1].starts_with("bad.asm:2:1: this instruction takes 3 operands"));
        assert!(lines[2].starts_with("bad.asm:3:1: unknown instruction `FOO`"));
    }

    #[test]
    fn lexer_errors_stop_before_parsing() {
        let log = Assembly::new("lex.asm", "LDB r1, #3\nMOV\n").assemble().unwrap_err();
        assert_eq!(log.errors().len(), 1);
        assert_eq!(log.errors()[0].description(), "illegal symbol in token");
    }

    #[test]
    fn caret_lines_up_with_wide_characters() {
        console::set_colors_enabled(false);
        let log = Assembly::new("caret.asm", "LDB r1, ÄÖ\n").assemble().unwrap_err();
        let rendered = format!("{:#}", log.errors()[0]);

        assert!(rendered.contains("--> caret.asm:1:9"));
        assert!(rendered.contains("1 | LDB r1, ÄÖ\n"));
        assert!(rendered.contains(&format!("\n  |{}^^\n", " ".repeat(9))));
    }

    #[test]
    fn wait_needs_a_previous_step() {
        let log = Assembly::new("wait.asm", "WAIT 3\n").assemble().unwrap_err();
        assert_eq!(log.errors()[0].description(), "`WAIT` must follow an instruction");
    }

    #[test]
    fn warnings_survive_success() {
        let assembled = Assembly::new("warn.asm", "DB 0x00, 0x00\nRESET 0\n").assemble().unwrap();
        assert_eq!(assembled.warnings().warnings().len(), 2);
        assert_eq!(assembled.program().len(), 1);
    }
}
