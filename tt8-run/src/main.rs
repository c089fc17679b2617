extern crate tt8_run;

use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use console::{style, Emoji};
use rand::Rng;

use tt8_asm::assembly::Assembly;
use tt8_run::cli::{Mode, Options};
use tt8_run::cli::utils::{Bar, Spinner};
use tt8_run::runner::{Runner, TraceRow};
use tt8_run::selftest::{Pattern, SelfTest};
use tt8_sim::processor::decoder::Register;

fn print_trace_header() {
    println!("{}", style(format!("{:>6}  {:>4}  {:<20}  {:4}  C  P", "cycle", "line", "instruction", "out")).bold());
}

fn print_trace_row(row: &TraceRow) {
    match row.fault {
        Some(ref fault) => println!("{}  {}", row, style(fault).yellow()),
        None => println!("{}", row)
    }
}

fn print_registers(registers: &[u8]) {
    for (i, chunk) in registers.chunks(4).enumerate() {
        let line: Vec<_> = chunk.iter()
            .enumerate()
            .map(|(j, value)| format!("{:>4} = {:#04X}", Register::from_nibble((i * 4 + j) as u8).to_string(), value))
            .collect();
        println!("   {}", line.join("   "));
    }
}

async fn run_program(program: PathBuf, trace: bool, registers: bool, listing: bool, cycles: usize) -> Result<bool, Box<dyn Error>> {
    println!("{} {} running `{}`", Emoji("ℹ️", "ℹ"), style("Mode:").bright().cyan(), program.to_string_lossy());

    let start = Instant::now();
    let assembly = Assembly::from_file(&program)?;
    let assembled = match assembly.assemble() {
        Ok(assembled) => assembled,
        Err(log) => {
            println!("{:#}", log);
            return Ok(false);
        }
    };
    if !assembled.warnings().warnings().is_empty() {
        println!("{:#}", assembled.warnings());
    }
    let program = assembled.into_program();
    let duration = Instant::now() - start;
    println!("    {} {} cycle(s) in {}.{:02}s", style("Assembled").green().bright(), program.len(), duration.as_secs(), (duration.as_millis() / 10) % 100);
    if listing {
        print!("{}", program.listing());
    }

    let spinner = Spinner::spawn("Resetting chip...");
    let mut runner = Runner::new();
    runner.power_on().await?;
    spinner.finish().await;

    let rows = runner.run(&program, cycles).await?;
    if trace {
        print_trace_header();
        rows.iter().for_each(print_trace_row);
    }
    let faults = rows.iter().filter(|row| row.fault.is_some()).count();
    if faults > 0 {
        println!("{} {} {} cycle(s) presented an unimplemented instruction", Emoji("⚠️", "⚠"), style("Warning:").bright().yellow(), faults);
    }

    let processor = runner.chip().processor();
    if registers {
        println!("{} {}", Emoji("ℹ️", "ℹ"), style("Registers:").bright().cyan());
        print_registers(processor.registers());
    }
    let output = runner.chip().peek_output()?;
    println!("{} {} {:#04X} ({})", Emoji("ℹ️", "ℹ"), style("Output:").bright().cyan(), output, output);
    println!("{} {} {} (pending {})", Emoji("ℹ️", "ℹ"), style("Flag:").bright().cyan(), processor.flag() as u8, processor.pending_carry() as u8);

    Ok(true)
}

async fn run_test(iterations: u64) -> Result<bool, Box<dyn Error>> {
    println!("{} {} {}", Emoji("ℹ️", "ℹ"), style("Mode:").bright().cyan(), "chip testing...");
    let mut rng = rand::thread_rng();

    let spinner = Spinner::spawn("Resetting chip...");
    let mut test = SelfTest::start().await?;
    spinner.finish().await;

    let mut bar = Bar::spawn("Checking registers...", iterations);
    for i in 0..iterations {
        let pattern: Pattern = rng.gen();
        let result = match test.load_pattern(&pattern).await {
            Ok(()) => test.verify_pattern(&pattern).await,
            Err(e) => Err(e)
        };
        if let Err(e) = result {
            bar.finish().await;
            println!("{} {} {}", Emoji("❌", "X"), style("Error:").bright().red(), e);
            return Ok(false);
        }
        bar.progress(i + 1);
    }
    bar.finish().await;
    println!("{} {} {}", Emoji("✔️", "✔"), style("Success:").bright().green(), "every register holds its value");

    let spinner = Spinner::spawn("Checking carry timing...");
    let mut result = Ok(());
    for register in Register::all() {
        result = test.check_carry_timing(register).await;
        if result.is_err() { break; }
    }
    spinner.finish().await;
    if let Err(e) = result {
        println!("{} {} {}", Emoji("❌", "X"), style("Error:").bright().red(), e);
        return Ok(false);
    }
    println!("{} {} {}", Emoji("✔️", "✔"), style("Success:").bright().green(), "carry commits two edges after INC");

    println!("{} {} {} cycles, all tests passed!", Emoji("ℹ️", "ℹ"), style("Success:").bright().green(), test.runner().chip().processor().cycles());
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mode = Options::from_command_line().into_mode();

    let passed = match mode {
        Mode::Run { program, trace, registers, listing, cycles } => run_program(program, trace, registers, listing, cycles).await?,
        Mode::Test { iterations } => run_test(iterations).await?
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
