//! # Johnniac Emulator
//!
//! An emulator and debugger for the Johnniac, a small decimal teaching
//! computer.
//!
//! The machine has 26 five-digit decimal words of memory, one
//! accumulator, a program counter and eleven instructions. Negative
//! numbers only exist as ten's-complement input notation; memory always
//! holds unsigned words.

pub mod word;
pub mod cpu;
pub mod dump;
pub mod debugger;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types
pub use word::{Word, parse_word, format_word, FormatError};
pub use cpu::{Cpu, CpuState, ExecError, Memory, Instruction, Console, IoConsole, BufferConsole};
pub use dump::{load_file, load_lines, save_dump, disassemble, LoadError};
pub use debugger::Session;

#[cfg(feature = "tui")]
pub use tui::run_debugger;
