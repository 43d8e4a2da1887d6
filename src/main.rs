//! Johnniac Emulator - CLI Entry Point
//!
//! Commands:
//! - `johnniac-emu` / `johnniac-emu debug [dump]` - Interactive debugger
//! - `johnniac-emu run <dump>` - Load a decimal dump and run it
//! - `johnniac-emu disasm <dump>` - Disassemble a decimal dump
//! - `johnniac-emu tui <dump>` - Full-screen debugger

use clap::{Parser, Subcommand};
use johnniac::cpu::console;
use johnniac::{Cpu, Memory, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "johnniac-emu")]
#[command(version)]
#[command(about = "An emulator and debugger for the Johnniac decimal teaching computer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive debugger (the default)
    Debug {
        /// Decimal dump to load before the first prompt
        program: Option<String>,
    },
    /// Run a program until it halts or faults
    Run {
        /// Path to the decimal dump to execute
        program: String,
        /// Address to start at
        #[arg(short, long, default_value = "0", value_parser = parse_start)]
        start: i64,
        /// Stop after this many instructions
        #[arg(short, long)]
        max_cycles: Option<u64>,
        /// Log every executed instruction to stderr
        #[arg(short, long)]
        trace: bool,
        /// Print the final machine state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Disassemble a decimal dump
    Disasm {
        /// Path to the decimal dump
        program: String,
    },
    /// Full-screen debugger
    #[cfg(feature = "tui")]
    Tui {
        /// Path to the decimal dump to debug
        program: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            init_logging(false);
            debug_program(None);
        }
        Some(Commands::Debug { program }) => {
            init_logging(false);
            debug_program(program.as_deref());
        }
        Some(Commands::Run { program, start, max_cycles, trace, json }) => {
            init_logging(trace);
            run_program(&program, start, max_cycles, json);
        }
        Some(Commands::Disasm { program }) => {
            init_logging(false);
            disassemble_file(&program);
        }
        #[cfg(feature = "tui")]
        Some(Commands::Tui { program }) => {
            // No subscriber: log lines would tear the alternate screen.
            tui_program(&program);
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the default filter
/// unless `--trace` was given.
fn init_logging(trace: bool) {
    let filter = if trace {
        EnvFilter::new("johnniac=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_start(text: &str) -> Result<i64, String> {
    johnniac::parse_word(text)
        .map(|word| word.value() as i64)
        .map_err(|e| e.to_string())
}

fn load_or_exit(path: &str) -> Memory {
    match johnniac::load_file(&Memory::new(), path) {
        Ok(mem) => mem,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn debug_program(path: Option<&str>) {
    let mut session = Session::new(console::stdio());
    if let Some(path) = path {
        session.load(path);
    }
    session.run();
}

fn run_program(path: &str, start: i64, max_cycles: Option<u64>, json: bool) {
    let mut cpu = Cpu::new();
    cpu.mem = load_or_exit(path);

    let mut console = console::stdio();
    let result = match max_cycles {
        Some(limit) => cpu.run_limited(start, &mut console, limit),
        None => cpu.run(start, &mut console),
    };

    if json {
        match serde_json::to_string_pretty(&cpu) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("failed to serialize machine state: {}", e),
        }
    }

    match result {
        Ok(cycles) if cpu.is_halted() => {
            eprintln!("halted at pc {:02} after {} instructions, acc {}", cpu.pc, cycles, cpu.acc);
        }
        Ok(cycles) => {
            eprintln!("stopped at pc {:02} after {} instructions (cycle limit)", cpu.pc, cycles);
        }
        Err(e) => {
            eprintln!("fault at pc {:02}: {}", cpu.pc, e);
            std::process::exit(1);
        }
    }
}

fn disassemble_file(path: &str) {
    let mem = load_or_exit(path);
    print!("{}", johnniac::disassemble(&mem));
}

#[cfg(feature = "tui")]
fn tui_program(path: &str) {
    let mut cpu = Cpu::new();
    cpu.mem = load_or_exit(path);

    if let Err(e) = johnniac::run_debugger(cpu) {
        eprintln!("debugger error: {}", e);
        std::process::exit(1);
    }
}
