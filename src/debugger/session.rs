//! Interactive debugger session.

use crate::cpu::console::Console;
use crate::cpu::execute::{Cpu, ExecError};
use crate::debugger::command::{Command, Target, HELP};
use crate::dump::{self, disassemble_word};
use crate::word::Word;
use std::path::Path;
use tracing::info;

/// Prompt shown while waiting for a debugger command.
pub const COMMAND_PROMPT: &str = "? ";

/// A debugger session: one machine, one console, one command loop.
///
/// Command output goes to the console's output stream; status and error
/// reports go to its error stream so they never mix with PUT data.
pub struct Session<C: Console> {
    /// The machine being debugged.
    pub cpu: Cpu,
    console: C,
    finished: bool,
}

impl<C: Console> Session<C> {
    /// Start a session on a fresh machine.
    pub fn new(console: C) -> Self {
        Self {
            cpu: Cpu::new(),
            console,
            finished: false,
        }
    }

    /// Read and execute commands until `exit` or end of input.
    pub fn run(&mut self) {
        while !self.finished {
            let Some(line) = self.console.read_line(COMMAND_PROMPT) else {
                self.console.write_line("");
                break;
            };
            self.handle_line(&line);
        }
        info!(cycles = self.cpu.cycles, "session ended");
    }

    /// Parse and execute one command line.
    pub fn handle_line(&mut self, line: &str) {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => {}
            Err(e) => self.console.write_error(&e.to_string()),
        }
    }

    /// Execute one command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Exit => self.finished = true,

            Command::Load(path) => self.load(&path),

            Command::Go(start) => {
                let start = start.unwrap_or(0) as i64;
                let result = self.cpu.run(start, &mut self.console);
                self.report(result);
            }

            Command::Continue => {
                let result = self.cpu.resume(&mut self.console);
                self.report(result);
            }

            Command::Step => {
                let result = self.cpu.step(&mut self.console).map(|_| 1);
                self.report(result);
            }

            Command::Print(None) => self.print_state(),
            Command::Print(Some(target)) => {
                let text = match target {
                    Target::Acc => self.cpu.acc.to_string(),
                    Target::Pc => format!("{:02}", self.cpu.pc),
                    Target::Cell(addr) => self.cell(addr).to_string(),
                };
                self.console.write_line(&text);
            }

            Command::Set(target, value) => match target {
                Target::Acc => self.cpu.acc = value,
                Target::Pc => self.cpu.pc = value.value() as i64,
                Target::Cell(addr) => {
                    if let Err(e) = self.cpu.mem.write(addr, value) {
                        self.console.write_error(&e.to_string());
                    }
                }
            },

            Command::Reset => self.cpu.reset(),

            Command::List => {
                for line in dump::disassemble(&self.cpu.mem).lines() {
                    self.console.write_line(line);
                }
            }

            Command::Save(path) => {
                if let Err(e) = dump::save_dump(&path, &self.cpu.mem) {
                    self.console.write_error(&format!("{}: save failed ({})", path, e));
                }
            }

            Command::Help => {
                for line in HELP {
                    self.console.write_line(line);
                }
            }
        }
    }

    /// Whether `exit` has been executed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The session's console.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Replace memory with a dump file. On any error memory is unchanged.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) {
        match dump::load_file(&self.cpu.mem, path) {
            Ok(mem) => self.cpu.mem = mem,
            Err(e) => self.console.write_error(&e.to_string()),
        }
    }

    fn cell(&self, addr: usize) -> Word {
        self.cpu.mem.cells()[addr]
    }

    fn print_state(&mut self) {
        let mut lines = vec![
            format!("pc:  {:02}", self.cpu.pc),
            format!("acc: {}", self.cpu.acc),
            format!("state: {:?}", self.cpu.state),
        ];
        for (addr, word) in self.cpu.mem.cells().iter().enumerate() {
            let marker = if addr as i64 == self.cpu.pc { ">" } else { " " };
            lines.push(format!("{}{:02}: {}  {}", marker, addr, word, disassemble_word(*word)));
        }
        for line in lines {
            self.console.write_line(&line);
        }
    }

    fn report(&mut self, result: Result<u64, ExecError>) {
        let message = match result {
            Ok(_) if self.cpu.is_halted() => format!("halted at pc {:02}", self.cpu.pc),
            Ok(_) => format!("pc {:02}  acc {}", self.cpu.pc, self.cpu.acc),
            Err(e) => format!("fault at pc {:02}: {}", self.cpu.pc, e),
        };
        self.console.write_error(&message);
    }
}
