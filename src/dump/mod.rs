//! Decimal dump files and memory listings.
//!
//! This module provides:
//! - An atomic loader for the decimal dump text format (and its inverse)
//! - A disassembler (memory image → readable listing)

pub mod loader;
pub mod disasm;

pub use loader::{load_lines, load_reader, load_file, format_dump, save_dump, LoadError};
pub use disasm::{disassemble, disassemble_word};
