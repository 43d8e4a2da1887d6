//! The five-digit decimal machine word.
//!
//! Every memory cell and the accumulator hold a `Word`: an unsigned
//! decimal quantity in `0..=99_999`. Arithmetic wraps modulo 100,000,
//! which is what gives negative numbers their ten's-complement meaning.

use std::fmt;
use serde::{Serialize, Deserialize};

/// An unsigned five-digit decimal word.
///
/// The inner value is always in `0..=Word::MAX`; every constructor
/// enforces this.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Word(u32);

impl Word {
    /// Number of decimal digits in a word.
    pub const DIGITS: usize = 5;

    /// Largest representable value: 99,999.
    pub const MAX: u32 = 99_999;

    /// Arithmetic modulus (10^5).
    pub const MODULUS: u32 = 100_000;

    /// The zero word.
    pub const ZERO: Word = Word(0);

    /// Create a word, or `None` if `value` does not fit in five digits.
    #[inline]
    pub const fn new(value: u32) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Reduce any integer into word range (ten's-complement wraparound).
    #[inline]
    pub fn wrapping_from(value: i64) -> Self {
        Self(value.rem_euclid(Self::MODULUS as i64) as u32)
    }

    /// The numeric value, `0..=99_999`.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Check if zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// High digits when read as an instruction: `word / 1000`.
    #[inline]
    pub const fn opcode(self) -> u32 {
        self.0 / 1000
    }

    /// Low three digits when read as an instruction: `word % 1000`.
    #[inline]
    pub const fn operand(self) -> u32 {
        self.0 % 1000
    }

    // ==================== Arithmetic ====================

    /// `(self + rhs) mod 100000`.
    #[inline]
    pub fn wrapping_add(self, rhs: Word) -> Word {
        Word((self.0 + rhs.0) % Self::MODULUS)
    }

    /// `(self * rhs) mod 100000`.
    #[inline]
    pub fn wrapping_mul(self, rhs: Word) -> Word {
        Word(((self.0 as u64 * rhs.0 as u64) % Self::MODULUS as u64) as u32)
    }

    /// `self - rhs`, raised by 100000 when the difference is negative.
    #[inline]
    pub fn wrapping_sub(self, rhs: Word) -> Word {
        if self.0 >= rhs.0 {
            Word(self.0 - rhs.0)
        } else {
            Word(self.0 + Self::MODULUS - rhs.0)
        }
    }

    /// Integer quotient `self / divisor`, or `None` for a zero divisor.
    #[inline]
    pub fn checked_div(self, divisor: Word) -> Option<Word> {
        if divisor.is_zero() {
            None
        } else {
            Some(Word(self.0 / divisor.0))
        }
    }
}

impl TryFrom<u32> for Word {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Word::new(value).ok_or_else(|| format!("{} does not fit in a five-digit word", value))
    }
}

impl From<Word> for u32 {
    fn from(word: Word) -> u32 {
        word.0
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:05})", self.0)
    }
}

/// Zero-padded, five digits, never signed.
impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(value: u32) -> Word {
        Word::new(value).unwrap()
    }

    #[test]
    fn test_new_rejects_six_digits() {
        assert_eq!(Word::new(99_999), Some(Word(99_999)));
        assert_eq!(Word::new(100_000), None);
    }

    #[test]
    fn test_instruction_split() {
        let word = w(3_002);
        assert_eq!(word.opcode(), 3);
        assert_eq!(word.operand(), 2);

        let word = w(99_999);
        assert_eq!(word.opcode(), 99);
        assert_eq!(word.operand(), 999);
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(w(99_999).wrapping_add(w(1)), w(0));
        assert_eq!(w(60_000).wrapping_add(w(50_000)), w(10_000));
        assert_eq!(w(4).wrapping_add(w(5)), w(9));
    }

    #[test]
    fn test_mul_wraps() {
        assert_eq!(w(99_999).wrapping_mul(w(99_999)), w(1));
        assert_eq!(w(1_000).wrapping_mul(w(1_000)), w(0));
        assert_eq!(w(12).wrapping_mul(w(12)), w(144));
    }

    #[test]
    fn test_sub_raises_negative_results() {
        assert_eq!(w(5).wrapping_sub(w(3)), w(2));
        assert_eq!(w(3).wrapping_sub(w(5)), w(99_998));
        assert_eq!(w(0).wrapping_sub(w(1)), w(99_999));
    }

    #[test]
    fn test_wrapping_from_negative() {
        assert_eq!(Word::wrapping_from(-1), w(99_999));
        assert_eq!(Word::wrapping_from(100_007), w(7));
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(format!("{}", w(9)), "00009");
        assert_eq!(format!("{}", w(99_877)), "99877");
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&w(42)).unwrap(), "42");
        assert_eq!(serde_json::from_str::<Word>("42").unwrap(), w(42));
        assert!(serde_json::from_str::<Word>("100000").is_err());
    }
}
