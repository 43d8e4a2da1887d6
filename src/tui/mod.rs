//! TUI debugger for the Johnniac emulator.
//!
//! Provides an interactive terminal-based debugger with:
//! - Memory view with per-cell disassembly
//! - Accumulator, program counter and run state
//! - Step/run/breakpoint controls and an input line for GET
//! - A panel of words written by PUT

mod app;
mod ui;

pub use app::{DebuggerApp, run_debugger};
