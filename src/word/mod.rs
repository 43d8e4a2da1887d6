//! Decimal word primitives.
//!
//! This module provides the machine's only data unit and its text codec:
//! - [`Word`] - an unsigned five-digit decimal value with wrapping arithmetic
//! - [`parse_word`] / [`format_word`] - the signed ten's-complement notation

mod value;
mod codec;

pub use value::Word;
pub use codec::{parse_word, format_word, tens_complement, FormatError};
