use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Default line length for wrapped hex output
pub const HEX_LINE_LEN: usize = 64;

const HEX_ALPHABET: &[u8; 16] = b"0123456789abcdef";

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_PAD: u8 = b'=';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    OddLength,
    InvalidDigit(u8),
    InvalidLength { expected: usize, actual: usize },
    /// Base64 input is not a whole number of 4-character groups
    Base64Length,
    /// Byte outside the Base64 alphabet, or misplaced padding
    InvalidBase64(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OddLength => write!(f, "hex string has an odd number of digits"),
            Error::InvalidDigit(b) => write!(f, "invalid hex digit: 0x{:02x}", b),
            Error::InvalidLength { expected, actual } => write!(
                f,
                "expected {} bytes ({} hex chars), got {}",
                expected,
                expected * 2,
                actual
            ),
            Error::Base64Length => write!(f, "base64 length must be a multiple of 4"),
            Error::InvalidBase64(b) => write!(f, "invalid base64 character: 0x{:02x}", b),
        }
    }
}

/// Hex-encode a byte slice (lowercase)
pub fn to_hex(bytes: &[u8]) -> String {
    let mut res = String::with_capacity(bytes.len() * 2);
    for &b in bytes.iter() {
        res.push(HEX_ALPHABET[(b >> 4) as usize] as char);
        res.push(HEX_ALPHABET[(b & 0x0f) as usize] as char);
    }
    res
}

/// Hex-decode a string
///
/// ASCII whitespace (spaces, line breaks) is skipped, so wrapped output decodes as-is.
///
/// errors: returns Error on odd digit counts and non-hex characters
pub fn from_hex(hex: &str) -> Result<Vec<u8>, Error> {
    let digits: Vec<u8> = hex
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if digits.len() % 2 != 0 {
        return Err(Error::OddLength);
    }

    let mut res = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        res.push((from_hex_digit(pair[0])? << 4) | from_hex_digit(pair[1])?);
    }
    Ok(res)
}

fn from_hex_digit(digit: u8) -> Result<u8, Error> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(Error::InvalidDigit(digit)),
    }
}

/// Decode a hex key (or IV), checking it has exactly the expected byte length
pub fn key_from_hex(hex: &str, expected: usize) -> Result<Vec<u8>, Error> {
    let key = from_hex(hex)?;
    if key.len() != expected {
        return Err(Error::InvalidLength {
            expected,
            actual: key.len(),
        });
    }
    Ok(key)
}

/// Split a string into lines of at most `line_len` characters
///
/// A zero line length returns the input unwrapped
pub fn wrap(text: &str, line_len: usize) -> String {
    if line_len == 0 {
        return text.into();
    }

    let mut res = String::with_capacity(text.len() + text.len() / line_len);
    for (i, c) in text.chars().enumerate() {
        if i != 0 && i % line_len == 0 {
            res.push('\n');
        }
        res.push(c);
    }
    res
}

/// Base64-encode a byte slice (standard alphabet, `=` padded)
pub fn to_base64(bytes: &[u8]) -> String {
    let mut res = String::with_capacity((bytes.len() + 2) / 3 * 4);

    for chunk in bytes.chunks(3) {
        // up to 24 bits, first byte most significant
        let group = chunk
            .iter()
            .enumerate()
            .fold(0_u32, |acc, (i, &b)| acc | (b as u32) << (16 - 8 * i));

        // n input bytes fill n + 1 digits
        for i in 0..4 {
            if i <= chunk.len() {
                let idx = (group >> (18 - 6 * i)) & 0x3f;
                res.push(BASE64_ALPHABET[idx as usize] as char);
            } else {
                res.push(BASE64_PAD as char);
            }
        }
    }

    res
}

/// Base64-decode a string
///
/// ASCII whitespace is skipped. Padding may only end the final group.
///
/// errors: returns Error on bad lengths, characters or padding
pub fn from_base64(text: &str) -> Result<Vec<u8>, Error> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if digits.len() % 4 != 0 {
        return Err(Error::Base64Length);
    }

    let groups = digits.len() / 4;
    let mut res = Vec::with_capacity(groups * 3);

    for (i, group) in digits.chunks_exact(4).enumerate() {
        let pad = group.iter().rev().take_while(|&&b| b == BASE64_PAD).count();
        if pad > 2 || (pad > 0 && i + 1 != groups) {
            return Err(Error::InvalidBase64(BASE64_PAD));
        }

        let mut value = 0_u32;
        for &digit in group[..4 - pad].iter() {
            value = (value << 6) | from_base64_digit(digit)?;
        }
        value <<= 6 * pad as u32;

        // low three bytes hold the group, minus one per pad character
        res.extend_from_slice(&value.to_be_bytes()[1..4 - pad]);
    }

    Ok(res)
}

fn from_base64_digit(digit: u8) -> Result<u32, Error> {
    match digit {
        b'A'..=b'Z' => Ok((digit - b'A') as u32),
        b'a'..=b'z' => Ok((digit - b'a' + 26) as u32),
        b'0'..=b'9' => Ok((digit - b'0' + 52) as u32),
        b'+' => Ok(62),
        b'/' => Ok(63),
        _ => Err(Error::InvalidBase64(digit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex() {
        assert_eq!(to_hex(b"Hello World"), "48656c6c6f20576f726c64");
        assert_eq!(from_hex("48656c6c6f20576f726c64").unwrap(), b"Hello World");
        assert_eq!(from_hex("48 65 6C\n6C 6F").unwrap(), b"Hello");
        assert_eq!(from_hex("").unwrap(), b"");
    }

    #[test]
    fn check_hex_errors() {
        assert_eq!(from_hex("abc"), Err(Error::OddLength));
        assert_eq!(from_hex("zz"), Err(Error::InvalidDigit(b'z')));
    }

    #[test]
    fn check_key_from_hex() {
        assert_eq!(key_from_hex("0123456789abcdef", 8).unwrap().len(), 8);
        assert_eq!(
            key_from_hex("0123", 8),
            Err(Error::InvalidLength { expected: 8, actual: 2 })
        );
    }

    #[test]
    fn check_wrap() {
        assert_eq!(wrap("abcdefgh", 3), "abc\ndef\ngh");
        assert_eq!(wrap("abcdef", 3), "abc\ndef");
        assert_eq!(wrap("", 3), "");
        assert_eq!(wrap("abc", 0), "abc");
    }

    #[test]
    fn check_base64() {
        assert_eq!(to_base64(b""), "");
        assert_eq!(to_base64(b"M"), "TQ==");
        assert_eq!(to_base64(b"Ma"), "TWE=");
        assert_eq!(to_base64(b"Man"), "TWFu");

        assert_eq!(from_base64("").unwrap(), b"");
        assert_eq!(from_base64("TQ==").unwrap(), b"M");
        assert_eq!(from_base64("TWE=").unwrap(), b"Ma");
        assert_eq!(from_base64("TW\nFu").unwrap(), b"Man");

        let msg = b"I'm killing your brain like a poisonous mushroom";
        let b64 = "SSdtIGtpbGxpbmcgeW91ciBicmFpbiBsaWtlIGEgcG9pc29ub3VzIG11c2hyb29t";
        assert_eq!(to_base64(msg), b64);
        assert_eq!(from_base64(b64).unwrap(), &msg[..]);
    }

    #[test]
    fn check_base64_errors() {
        assert_eq!(from_base64("TWF"), Err(Error::Base64Length));
        assert_eq!(from_base64("T!=="), Err(Error::InvalidBase64(b'!')));
        // padding inside a group, before the last group, or three deep
        assert_eq!(from_base64("TW=u"), Err(Error::InvalidBase64(b'=')));
        assert_eq!(from_base64("TQ==TWFu"), Err(Error::InvalidBase64(b'=')));
        assert_eq!(from_base64("T==="), Err(Error::InvalidBase64(b'=')));
    }
}
