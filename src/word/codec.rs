//! Text encoding of decimal words.
//!
//! Words are written as plain digit strings. A leading `-` asks for the
//! ten's complement of the digits that follow, taken over as many digits
//! as were written: `-1` is `9`, `-01` is `99`, `-00123` is `99877`.

use crate::word::Word;
use thiserror::Error;

/// Parse a word from its textual form.
///
/// Surrounding whitespace is ignored. At most one leading `-` is
/// accepted; the rest must be one to five ASCII digits.
pub fn parse_word(text: &str) -> Result<Word, FormatError> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::NotANumber(text.to_string()));
    }
    if digits.len() > Word::DIGITS {
        return Err(FormatError::Overflow(text.to_string()));
    }

    let magnitude: u32 = digits
        .parse()
        .map_err(|_| FormatError::NotANumber(text.to_string()))?;
    let value = if negative {
        tens_complement(magnitude, digits.len())
    } else {
        magnitude
    };

    Word::new(value).ok_or_else(|| FormatError::Overflow(text.to_string()))
}

/// Ten's complement of `magnitude` over `width` digits: `10^width - magnitude`.
///
/// Reduced modulo `10^width`, so the complement of zero is zero.
pub fn tens_complement(magnitude: u32, width: usize) -> u32 {
    let modulus = 10u32.pow(width as u32);
    (modulus - magnitude % modulus) % modulus
}

/// Format a word for display: five zero-padded digits, no sign.
pub fn format_word(word: Word) -> String {
    word.to_string()
}

/// Errors produced while parsing a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("{0:?}: not a number")]
    NotANumber(String),

    #[error("{0:?}: more than five digits")]
    Overflow(String),
}
