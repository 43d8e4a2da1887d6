//! Disassembler for Johnniac memory images.
//!
//! Every cell is shown both as a raw word and as the instruction it
//! would decode to, since code and data share the same 26 cells.

use crate::cpu::decode::decode;
use crate::cpu::memory::Memory;
use crate::word::Word;

/// Disassemble a single word to text.
pub fn disassemble_word(word: Word) -> String {
    match decode(word) {
        Ok(instr) => instr.to_string(),
        Err(_) => "???".to_string(),
    }
}

/// Disassemble a whole memory image, one line per cell.
pub fn disassemble(mem: &Memory) -> String {
    let mut output = String::new();
    output.push_str("# Johnniac disassembly\n");
    output.push_str("# --------------------\n");

    for (addr, word) in mem.cells().iter().enumerate() {
        output.push_str(&format!("{:02}: {}  {}\n", addr, word, disassemble_word(*word)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::{encode, Instruction};

    #[test]
    fn test_disassemble_halt() {
        assert_eq!(disassemble_word(encode(&Instruction::Halt)), "HALT");
    }

    #[test]
    fn test_disassemble_add() {
        let add = encode(&Instruction::Add { addr: 10 });
        assert_eq!(disassemble_word(add), "ADD 10");
    }

    #[test]
    fn test_disassemble_invalid() {
        assert_eq!(disassemble_word(Word::new(42_000).unwrap()), "???");
    }

    #[test]
    fn test_disassemble_listing() {
        let mut mem = Memory::new();
        mem.write(0, Word::new(1004).unwrap()).unwrap();

        let listing = disassemble(&mem);

        assert!(listing.contains("00: 01004  LOAD 04\n"));
        assert!(listing.contains("25: 00000  HALT\n"));
    }
}
