//! Text record for persisted ciphertext
//!
//! ```text
//! Mode: CBC
//! IV: 000102030405060708090a0b0c0d0e0f
//! Ciphertext:
//! <hex, 64 characters per line>
//! ```

use alloc::vec::Vec;
use core::fmt;

use crate::encoding::{self, from_hex, to_hex, wrap, HEX_LINE_LEN};
use crate::mode::{self, BlockCipher, Mode};

const MODE_TAG: &str = "Mode:";
const IV_TAG: &str = "IV:";
const CIPHERTEXT_TAG: &str = "Ciphertext:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    MissingCiphertext,
    Hex(encoding::Error),
    Mode(mode::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingCiphertext => write!(f, "record has no Ciphertext: section"),
            Error::Hex(e) => write!(f, "record hex: {}", e),
            Error::Mode(e) => write!(f, "record mode: {}", e),
        }
    }
}

/// Ciphertext with the mode and IV needed to decrypt it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub mode: Mode,
    pub iv: Option<Vec<u8>>,
    pub ciphertext: Vec<u8>,
}

impl Record {
    /// Encrypt a message and capture the result as a record
    pub fn encrypt<C: BlockCipher>(
        plaintext: &[u8],
        key: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
    ) -> Result<Self, Error> {
        let (ciphertext, iv) = mode::encrypt::<C>(plaintext, key, mode, iv).map_err(Error::Mode)?;
        Ok(Self { mode, iv, ciphertext })
    }

    /// Decrypt the recorded ciphertext
    pub fn decrypt<C: BlockCipher>(&self, key: &[u8]) -> Result<Vec<u8>, Error> {
        mode::decrypt::<C>(&self.ciphertext, key, self.mode, self.iv.as_deref())
            .map_err(Error::Mode)
    }

    /// Parse a record
    ///
    /// Mode defaults to ECB when the `Mode:` line is missing. Every line after the
    /// `Ciphertext:` marker is part of the hex body.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut mode = Mode::Ecb;
        let mut iv = None;
        let mut lines = text.trim().lines().map(str::trim);

        while let Some(line) = lines.next() {
            if let Some(value) = line.strip_prefix(MODE_TAG) {
                mode = value.parse().map_err(Error::Mode)?;
            } else if let Some(value) = line.strip_prefix(IV_TAG) {
                iv = Some(from_hex(value).map_err(Error::Hex)?);
            } else if line.starts_with(CIPHERTEXT_TAG) {
                let body: Vec<&str> = lines.by_ref().collect();
                let ciphertext = from_hex(&body.concat()).map_err(Error::Hex)?;
                return Ok(Self { mode, iv, ciphertext });
            }
        }

        Err(Error::MissingCiphertext)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", MODE_TAG, self.mode)?;
        if let Some(iv) = self.iv.as_ref() {
            writeln!(f, "{} {}", IV_TAG, to_hex(iv))?;
        }
        writeln!(f, "{}", CIPHERTEXT_TAG)?;
        write!(f, "{}", wrap(&to_hex(&self.ciphertext), HEX_LINE_LEN))
    }
}
