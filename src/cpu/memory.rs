//! Johnniac memory subsystem.
//!
//! The machine has 26 word-sized cells, addressed 0 through 25.

use crate::word::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of memory cells in the Johnniac.
pub const MEMORY_SIZE: usize = 26;

/// Johnniac memory: 26 decimal words.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: [Word; MEMORY_SIZE],
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: [Word::ZERO; MEMORY_SIZE],
        }
    }

    /// Whether `addr` names a cell.
    #[inline]
    pub fn contains(addr: i64) -> bool {
        (0..MEMORY_SIZE as i64).contains(&addr)
    }

    /// Read a cell by address.
    #[inline]
    pub fn read(&self, addr: usize) -> Result<Word, MemoryError> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange(addr))
    }

    /// Write a cell by address.
    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) -> Result<(), MemoryError> {
        let cell = self
            .cells
            .get_mut(addr)
            .ok_or(MemoryError::AddressOutOfRange(addr))?;
        *cell = value;
        Ok(())
    }

    /// All cells, in address order.
    pub fn cells(&self) -> &[Word; MEMORY_SIZE] {
        &self.cells
    }

    /// Clear all memory to zeros.
    pub fn clear(&mut self) {
        self.cells = [Word::ZERO; MEMORY_SIZE];
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only show non-zero cells
        let non_zero: Vec<(usize, &Word)> = self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_zero())
            .collect();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside valid memory range.
    #[error("memory address {0} out of range (0-25)")]
    AddressOutOfRange(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(value: u32) -> Word {
        Word::new(value).unwrap()
    }

    #[test]
    fn test_memory_starts_zeroed() {
        let mem = Memory::new();
        assert!(mem.cells().iter().all(|cell| cell.is_zero()));
    }

    #[test]
    fn test_memory_read_write() {
        let mut mem = Memory::new();
        mem.write(10, w(42)).unwrap();
        assert_eq!(mem.read(10).unwrap(), w(42));
    }

    #[test]
    fn test_memory_bounds() {
        let mut mem = Memory::new();

        assert!(mem.read(0).is_ok());
        assert!(mem.read(25).is_ok());

        assert_eq!(mem.read(26), Err(MemoryError::AddressOutOfRange(26)));
        assert_eq!(mem.write(26, w(1)), Err(MemoryError::AddressOutOfRange(26)));
        assert_eq!(mem, Memory::new());

        assert!(Memory::contains(0));
        assert!(Memory::contains(25));
        assert!(!Memory::contains(26));
        assert!(!Memory::contains(-1));
    }

    #[test]
    fn test_clear() {
        let mut mem = Memory::new();
        mem.write(3, w(7)).unwrap();
        mem.clear();
        assert_eq!(mem, Memory::new());
    }
}
