pub mod utils;

pub use clap::Parser;
use clap::ErrorKind;
use std::ffi::OsString;
use std::path::PathBuf;

/// Self-test passes run when `--iterations` is not given.
pub const DEFAULT_ITERATIONS: u64 = 64;

pub enum Mode {
    Run {
        program: PathBuf,
        trace: bool,
        registers: bool,
        listing: bool,
        cycles: usize
    },
    Test {
        iterations: u64
    }
}

/// Assembles and runs programs on the simulated tt8 core.
#[derive(Parser)]
#[clap(version)]
pub struct Options {
    /// Assembly source to run.
    ///
    /// The chip is held in reset for five cycles before the first line executes.
    #[clap(required_unless_present("test"))]
    program: Option<PathBuf>,
    /// Prints one line per clock cycle: cycle, source line, instruction, output, flag and
    /// pending carry.
    #[clap(long)]
    trace: bool,
    /// Prints the register file once the program has finished.
    #[clap(long)]
    registers: bool,
    /// Prints the assembled program, one cycle per line, before running it.
    #[clap(long)]
    listing: bool,
    /// Runs this many extra cycles after the program, repeating its last step.
    #[clap(long)]
    cycles: Option<usize>,
    /// Runs the on-chip self-test instead of a program.
    ///
    /// Random values are loaded into every register and read back through the output port;
    /// then the carry timing of `INC` is checked.
    #[clap(long, conflicts_with_all(&["program", "trace", "registers", "listing", "cycles"]))]
    test: bool,
    /// Number of self-test passes. Only valid with `--test`.
    #[clap(long)]
    iterations: Option<u64>
}

impl Options {
    pub fn from_command_line() -> Self {
        match Self::try_from_args(std::env::args_os()) {
            Ok(options) => options,
            Err(e) => e.exit()
        }
    }

    /// Parses `args` and rejects the option combinations clap cannot express for flags.
    pub fn try_from_args<I, T>(args: I) -> clap::Result<Self>
        where
            I: IntoIterator<Item = T>,
            T: Into<OsString> + Clone
    {
        let options = Self::try_parse_from(args)?;
        if options.test {
            if options.cycles.is_some() {
                return Err(clap::Error::raw(ErrorKind::ArgumentConflict, "`--cycles` cannot be used with `--test`\n"));
            }
        } else {
            if options.iterations.is_some() {
                return Err(clap::Error::raw(ErrorKind::ArgumentConflict, "`--iterations` can only be used with `--test`\n"));
            }
            if options.program.is_none() {
                return Err(clap::Error::raw(ErrorKind::MissingRequiredArgument, "a program is required unless `--test` is given\n"));
            }
        }
        Ok(options)
    }

    pub fn into_mode(self) -> Mode {
        match self.program {
            Some(program) if !self.test => Mode::Run {
                program,
                trace: self.trace,
                registers: self.registers,
                listing: self.listing,
                cycles: self.cycles.unwrap_or(0)
            },
            _ => Mode::Test {
                iterations: self.iterations.unwrap_or(DEFAULT_ITERATIONS)
            }
        }
    }
}
