//! CPU emulation for the Johnniac.
//!
//! This module implements the complete machine:
//! - 26 five-digit decimal memory cells
//! - an accumulator and a program counter
//! - an eleven-instruction, single-address instruction set
//! - a console seam for operator input and output

pub mod memory;
pub mod decode;
pub mod console;
pub mod execute;

pub use memory::{Memory, MemoryError, MEMORY_SIZE};
pub use decode::{Instruction, Opcode, DecodeError};
pub use console::{Console, IoConsole, BufferConsole};
pub use execute::{Cpu, CpuState, ExecError};
