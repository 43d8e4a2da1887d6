//! Instruction decoder for the Johnniac.
//!
//! An instruction is an ordinary word read as `opcode * 1000 + operand`.
//! Eleven opcodes (0-10) are defined; the operand names a memory cell
//! for every instruction except HALT and NOOP, which ignore it.

use std::fmt;
use crate::word::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Decoded Johnniac instruction.
///
/// Operands are carried as written (0-999); whether they name a real
/// cell is checked when the instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Stop the machine.
    Halt,

    /// Load accumulator: A := [addr]
    Load { addr: u32 },

    /// Store accumulator: [addr] := A
    Store { addr: u32 },

    /// Add: A := (A + [addr]) mod 100000
    Add { addr: u32 },

    /// Multiply: A := (A * [addr]) mod 100000
    Multiply { addr: u32 },

    /// Divide, dividend in memory: A := [addr] / A
    Divide { addr: u32 },

    /// Subtract with ten's-complement wraparound: A := A - [addr]
    Subtract { addr: u32 },

    /// Branch if zero: if A = 0 then PC := addr (the usual increment still follows)
    Test { addr: u32 },

    /// Read one word from the operator into [addr].
    Get { addr: u32 },

    /// Write [addr] to the operator.
    Put { addr: u32 },

    /// No operation.
    Noop,
}

/// Opcode values.
pub struct Opcode;

impl Opcode {
    pub const HALT: u32 = 0;
    pub const LOAD: u32 = 1;
    pub const STORE: u32 = 2;
    pub const ADD: u32 = 3;
    pub const MULTIPLY: u32 = 4;
    pub const DIVIDE: u32 = 5;
    pub const SUBTRACT: u32 = 6;
    pub const TEST: u32 = 7;
    pub const GET: u32 = 8;
    pub const PUT: u32 = 9;
    pub const NOOP: u32 = 10;
}

impl Instruction {
    /// The numeric opcode of this instruction.
    pub fn opcode(&self) -> u32 {
        match self {
            Instruction::Halt => Opcode::HALT,
            Instruction::Load { .. } => Opcode::LOAD,
            Instruction::Store { .. } => Opcode::STORE,
            Instruction::Add { .. } => Opcode::ADD,
            Instruction::Multiply { .. } => Opcode::MULTIPLY,
            Instruction::Divide { .. } => Opcode::DIVIDE,
            Instruction::Subtract { .. } => Opcode::SUBTRACT,
            Instruction::Test { .. } => Opcode::TEST,
            Instruction::Get { .. } => Opcode::GET,
            Instruction::Put { .. } => Opcode::PUT,
            Instruction::Noop => Opcode::NOOP,
        }
    }

    /// The operand, for instructions that take one.
    pub fn operand(&self) -> Option<u32> {
        match *self {
            Instruction::Halt | Instruction::Noop => None,
            Instruction::Load { addr }
            | Instruction::Store { addr }
            | Instruction::Add { addr }
            | Instruction::Multiply { addr }
            | Instruction::Divide { addr }
            | Instruction::Subtract { addr }
            | Instruction::Test { addr }
            | Instruction::Get { addr }
            | Instruction::Put { addr } => Some(addr),
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Halt => "HALT",
            Instruction::Load { .. } => "LOAD",
            Instruction::Store { .. } => "STORE",
            Instruction::Add { .. } => "ADD",
            Instruction::Multiply { .. } => "MULTIPLY",
            Instruction::Divide { .. } => "DIVIDE",
            Instruction::Subtract { .. } => "SUBTRACT",
            Instruction::Test { .. } => "TEST",
            Instruction::Get { .. } => "GET",
            Instruction::Put { .. } => "PUT",
            Instruction::Noop => "NOOP",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand() {
            Some(addr) => write!(f, "{} {:02}", self.mnemonic(), addr),
            None => write!(f, "{}", self.mnemonic()),
        }
    }
}

/// Decode a word as an instruction.
pub fn decode(word: Word) -> Result<Instruction, DecodeError> {
    let addr = word.operand();

    let instruction = match word.opcode() {
        Opcode::HALT => Instruction::Halt,
        Opcode::LOAD => Instruction::Load { addr },
        Opcode::STORE => Instruction::Store { addr },
        Opcode::ADD => Instruction::Add { addr },
        Opcode::MULTIPLY => Instruction::Multiply { addr },
        Opcode::DIVIDE => Instruction::Divide { addr },
        Opcode::SUBTRACT => Instruction::Subtract { addr },
        Opcode::TEST => Instruction::Test { addr },
        Opcode::GET => Instruction::Get { addr },
        Opcode::PUT => Instruction::Put { addr },
        Opcode::NOOP => Instruction::Noop,
        op => return Err(DecodeError::InvalidOpcode(op)),
    };

    Ok(instruction)
}

/// Encode an instruction back to a word.
///
/// Operands above 999 do not fit the instruction format and are reduced
/// to their low three digits.
pub fn encode(instr: &Instruction) -> Word {
    let operand = instr.operand().unwrap_or(0) % 1000;
    Word::wrapping_from((instr.opcode() * 1000 + operand) as i64)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u32),
}
