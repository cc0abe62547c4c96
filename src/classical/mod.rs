//! Classical ciphers and their statistical attacks
//!
//! All ciphers act on ASCII letters only and keep case; every other character
//! passes through unchanged.

use core::fmt;

pub mod caesar;
pub mod mono;
pub mod vigenere;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Key is empty or contains no usable letters
    InvalidKey,
    /// Not enough letters to analyse
    TooShort,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKey => write!(f, "key must contain only letters and not be empty"),
            Error::TooShort => write!(f, "not enough letters to analyse"),
        }
    }
}

/// Shift an ASCII letter forward by `shift` positions within its case
///
/// Non-letters are returned unchanged
pub(crate) fn shift_letter(c: char, shift: u8) -> char {
    let base = if c.is_ascii_lowercase() {
        b'a'
    } else if c.is_ascii_uppercase() {
        b'A'
    } else {
        return c;
    };

    (((c as u8 - base + shift % 26) % 26) + base) as char
}
