//! CPU execution engine for the Johnniac.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.
//!
//! The machine state stays fully visible between runs. When an
//! instruction faults, the program counter is left on it and nothing it
//! would have written is touched, so a debugger can inspect, patch and
//! [`resume`](Cpu::resume).

use crate::cpu::console::Console;
use crate::cpu::decode::{self, DecodeError, Instruction};
use crate::cpu::memory::{Memory, MemoryError};
use crate::word::{parse_word, Word};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Prompt shown when a GET instruction waits for the operator.
pub const INPUT_PROMPT: &str = "> ";

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has halted (executed HALT instruction).
    Halted,
    /// The last instruction faulted.
    Faulted,
}

/// The Johnniac CPU: program counter, accumulator and memory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    /// Program counter. Only 0-25 can be fetched from, but a debugger may
    /// set anything.
    pub pc: i64,
    /// Accumulator.
    pub acc: Word,
    /// Main memory.
    pub mem: Memory,
    /// Current execution state.
    pub state: CpuState,
    /// Instructions executed since reset.
    pub cycles: u64,
}

impl Cpu {
    /// Create a new CPU with zeroed state.
    pub fn new() -> Self {
        Self {
            pc: 0,
            acc: Word::ZERO,
            mem: Memory::new(),
            state: CpuState::Running,
            cycles: 0,
        }
    }

    /// Reset the CPU to initial state.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.acc = Word::ZERO;
        self.mem.clear();
        self.state = CpuState::Running;
        self.cycles = 0;
    }

    /// Decode the instruction at the program counter without executing it.
    pub fn peek(&self) -> Result<Instruction, ExecError> {
        let pc = self.fetch_address()?;
        let raw = self.mem.read(pc)?;
        decode::decode(raw).map_err(|DecodeError::InvalidOpcode(_)| ExecError::IllegalInstruction {
            word: raw,
            pc,
        })
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed, or the fault. On a fault
    /// the state becomes [`CpuState::Faulted`] and the program counter
    /// still points at the offending instruction.
    pub fn step<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<Instruction, ExecError> {
        self.state = CpuState::Running;

        match self.fetch_and_execute(console) {
            Ok(instr) => {
                self.cycles += 1;
                Ok(instr)
            }
            Err(e) => {
                self.state = CpuState::Faulted;
                warn!(pc = self.pc, error = %e, "fault");
                Err(e)
            }
        }
    }

    /// Start executing at `start` and run until halt or fault.
    ///
    /// Returns the number of instructions executed.
    pub fn run<C: Console + ?Sized>(&mut self, start: i64, console: &mut C) -> Result<u64, ExecError> {
        self.pc = start;
        self.resume(console)
    }

    /// Continue from the current program counter until halt or fault.
    pub fn resume<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<u64, ExecError> {
        let start_cycles = self.cycles;

        loop {
            self.step(console)?;
            if self.state == CpuState::Halted {
                break;
            }
        }

        Ok(self.cycles - start_cycles)
    }

    /// Like [`run`](Cpu::run), but stop after at most `max_cycles` instructions.
    pub fn run_limited<C: Console + ?Sized>(
        &mut self,
        start: i64,
        console: &mut C,
        max_cycles: u64,
    ) -> Result<u64, ExecError> {
        self.pc = start;
        self.resume_limited(console, max_cycles)
    }

    /// Like [`resume`](Cpu::resume), but stop after at most `max_cycles`
    /// instructions. The state is still `Running` if the limit was hit.
    pub fn resume_limited<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
        max_cycles: u64,
    ) -> Result<u64, ExecError> {
        let start_cycles = self.cycles;
        let limit = self.cycles + max_cycles;
        self.state = CpuState::Running;

        while self.state == CpuState::Running && self.cycles < limit {
            self.step(console)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Fetch, decode and execute the instruction at the program counter.
    fn fetch_and_execute<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<Instruction, ExecError> {
        let pc = self.fetch_address()?;
        let raw = self.mem.read(pc)?;
        let instr = decode::decode(raw).map_err(|DecodeError::InvalidOpcode(_)| {
            ExecError::IllegalInstruction { word: raw, pc }
        })?;

        trace!(pc, word = %raw, acc = %self.acc, "{}", instr);

        self.execute(instr, console)?;

        // HALT leaves the program counter on itself. Everything else,
        // including a taken TEST, advances by one afterwards.
        if instr != Instruction::Halt {
            self.pc += 1;
        }

        Ok(instr)
    }

    /// Execute a decoded instruction.
    fn execute<C: Console + ?Sized>(&mut self, instr: Instruction, console: &mut C) -> Result<(), ExecError> {
        match instr {
            Instruction::Halt => {
                self.state = CpuState::Halted;
                debug!(pc = self.pc, acc = %self.acc, cycles = self.cycles + 1, "halted");
            }

            Instruction::Load { addr } => {
                let addr = self.cell(&instr, addr)?;
                self.acc = self.mem.read(addr)?;
            }

            Instruction::Store { addr } => {
                let addr = self.cell(&instr, addr)?;
                self.mem.write(addr, self.acc)?;
            }

            Instruction::Add { addr } => {
                let addr = self.cell(&instr, addr)?;
                self.acc = self.acc.wrapping_add(self.mem.read(addr)?);
            }

            Instruction::Multiply { addr } => {
                let addr = self.cell(&instr, addr)?;
                self.acc = self.acc.wrapping_mul(self.mem.read(addr)?);
            }

            Instruction::Divide { addr } => {
                // The cell is the dividend, the accumulator the divisor.
                let addr = self.cell(&instr, addr)?;
                let dividend = self.mem.read(addr)?;
                self.acc = dividend
                    .checked_div(self.acc)
                    .ok_or(ExecError::DivideByZero)?;
            }

            Instruction::Subtract { addr } => {
                let addr = self.cell(&instr, addr)?;
                self.acc = self.acc.wrapping_sub(self.mem.read(addr)?);
            }

            Instruction::Test { addr } => {
                let addr = self.cell(&instr, addr)?;
                if self.acc.is_zero() {
                    self.pc = addr as i64;
                }
            }

            Instruction::Get { addr } => {
                let addr = self.cell(&instr, addr)?;
                let value = read_word(console)?;
                self.mem.write(addr, value)?;
            }

            Instruction::Put { addr } => {
                let addr = self.cell(&instr, addr)?;
                let value = self.mem.read(addr)?;
                console.write_line(&value.to_string());
            }

            Instruction::Noop => {}
        }

        Ok(())
    }

    /// The program counter as a memory index, if it names a cell.
    fn fetch_address(&self) -> Result<usize, ExecError> {
        if Memory::contains(self.pc) {
            Ok(self.pc as usize)
        } else {
            Err(ExecError::IllegalProgramCounter(self.pc))
        }
    }

    /// Check that an instruction's operand names a cell.
    fn cell(&self, instr: &Instruction, operand: u32) -> Result<usize, ExecError> {
        if Memory::contains(operand as i64) {
            Ok(operand as usize)
        } else {
            Err(ExecError::IllegalAddress {
                opcode: instr.opcode(),
                operand,
            })
        }
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// Check if the last instruction faulted.
    pub fn is_faulted(&self) -> bool {
        self.state == CpuState::Faulted
    }
}

/// Prompt until the operator types a valid word.
fn read_word<C: Console + ?Sized>(console: &mut C) -> Result<Word, ExecError> {
    loop {
        let line = console.read_line(INPUT_PROMPT).ok_or(ExecError::EndOfInput)?;
        match parse_word(&line) {
            Ok(word) => return Ok(word),
            Err(e) => console.write_error(&e.to_string()),
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("pc", &self.pc)
            .field("acc", &self.acc)
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("mem", &self.mem)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("illegal program counter {0}")]
    IllegalProgramCounter(i64),

    #[error("illegal address {operand} for opcode {opcode}")]
    IllegalAddress { opcode: u32, operand: u32 },

    #[error("illegal instruction {word} at address {pc}")]
    IllegalInstruction { word: Word, pc: usize },

    #[error("divide by zero")]
    DivideByZero,

    #[error("end of input while waiting for a word")]
    EndOfInput,

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
}
