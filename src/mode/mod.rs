//! Block-mode wrapper, generic over a block engine
//!
//! Padding is PKCS#7. Only ECB and CBC are supported.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use log::{debug, trace};
use rand::{thread_rng, RngCore};

use crate::{aes, des};

pub mod cbc;
pub mod ecb;
pub mod pkcs7;

/// Input whose length the block engine rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Key,
    Iv,
    /// Ciphertext that is not a whole number of blocks
    Ciphertext,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Key => write!(f, "key"),
            Field::Iv => write!(f, "IV"),
            Field::Ciphertext => write!(f, "ciphertext"),
        }
    }
}

/// Errors for block-mode encryption and decryption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Key, IV or ciphertext length does not fit the block engine
    InvalidLength {
        cipher: &'static str,
        field: Field,
        expected: usize,
        actual: usize,
    },
    /// Padding is corrupt after decryption
    InvalidPadding,
    /// CBC decryption requested without an IV
    MissingIv,
    /// Mode selector is neither ECB nor CBC
    UnsupportedMode,
}

impl Error {
    /// Length error for `field` under block engine `C`
    pub fn invalid_length<C: BlockCipher>(field: Field, actual: usize) -> Self {
        let expected = match field {
            Field::Key => C::KEY_LEN,
            Field::Iv | Field::Ciphertext => C::BLOCK_LEN,
        };

        Error::InvalidLength { cipher: C::NAME, field, expected, actual }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLength { cipher, field: Field::Ciphertext, expected, actual } => write!(
                f,
                "{} ciphertext must be a multiple of {} bytes, got {}",
                cipher, expected, actual
            ),
            Error::InvalidLength { cipher, field, expected, actual } => {
                write!(f, "{} {} must be {} bytes, got {}", cipher, field, expected, actual)
            }
            Error::InvalidPadding => write!(f, "invalid padding"),
            Error::MissingIv => write!(f, "IV is required for CBC mode"),
            Error::UnsupportedMode => write!(f, "unsupported mode, expected ECB or CBC"),
        }
    }
}

/// A fixed-size block transformation the modes can drive
///
/// Implementors are stateless: the key schedule is produced per mode call and
/// dropped when the call returns.
pub trait BlockCipher: Sized {
    /// Human-readable algorithm name
    const NAME: &'static str;
    /// Block length in bytes
    const BLOCK_LEN: usize;
    /// Key length in bytes
    const KEY_LEN: usize;

    /// Expanded key material for one call
    type Schedule;

    /// Expand a raw key, failing with `InvalidLength` on the wrong key size
    fn expand_key(key: &[u8]) -> Result<Self::Schedule, Error>;

    /// Check a raw key has the engine's key length
    fn check_key(key: &[u8]) -> Result<(), Error> {
        if key.len() != Self::KEY_LEN {
            return Err(Error::invalid_length::<Self>(Field::Key, key.len()));
        }
        Ok(())
    }

    /// Encrypt one `BLOCK_LEN` block in place
    fn encrypt_in_place(schedule: &Self::Schedule, block: &mut [u8]);

    /// Decrypt one `BLOCK_LEN` block in place
    fn decrypt_in_place(schedule: &Self::Schedule, block: &mut [u8]);

    /// Check a caller-supplied IV has the block length
    fn check_iv(iv: &[u8]) -> Result<(), Error> {
        if iv.len() != Self::BLOCK_LEN {
            return Err(Error::invalid_length::<Self>(Field::Iv, iv.len()));
        }
        Ok(())
    }

    /// Check a ciphertext is a whole number of blocks
    fn check_ciphertext(ciphertext: &[u8]) -> Result<(), Error> {
        if ciphertext.len() % Self::BLOCK_LEN != 0 {
            return Err(Error::invalid_length::<Self>(Field::Ciphertext, ciphertext.len()));
        }
        Ok(())
    }
}

/// AES-128 block engine marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aes128;

impl BlockCipher for Aes128 {
    const NAME: &'static str = "AES-128";
    const BLOCK_LEN: usize = aes::BLOCK_LEN;
    const KEY_LEN: usize = aes::KEY_LEN_128;

    type Schedule = aes::KeySchedule;

    fn expand_key(key: &[u8]) -> Result<Self::Schedule, Error> {
        Self::check_key(key)?;
        aes::key_expansion(key).map_err(|_| Error::invalid_length::<Self>(Field::Key, key.len()))
    }

    fn encrypt_in_place(schedule: &Self::Schedule, block: &mut [u8]) {
        aes::encrypt_in_place(schedule, block)
    }

    fn decrypt_in_place(schedule: &Self::Schedule, block: &mut [u8]) {
        aes::decrypt_in_place(schedule, block)
    }
}

/// DES block engine marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Des;

impl BlockCipher for Des {
    const NAME: &'static str = "DES";
    const BLOCK_LEN: usize = des::BLOCK_LEN;
    const KEY_LEN: usize = des::KEY_LEN;

    type Schedule = des::Subkeys;

    fn expand_key(key: &[u8]) -> Result<Self::Schedule, Error> {
        Self::check_key(key)?;
        des::key_schedule(key).map_err(|_| Error::invalid_length::<Self>(Field::Key, key.len()))
    }

    fn encrypt_in_place(schedule: &Self::Schedule, block: &mut [u8]) {
        des::encrypt_in_place(schedule, block)
    }

    fn decrypt_in_place(schedule: &Self::Schedule, block: &mut [u8]) {
        des::decrypt_in_place(schedule, block)
    }
}

/// Block cipher mode of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ecb,
    Cbc,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ECB") {
            Ok(Mode::Ecb)
        } else if s.eq_ignore_ascii_case("CBC") {
            Ok(Mode::Cbc)
        } else {
            Err(Error::UnsupportedMode)
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Ecb => write!(f, "ECB"),
            Mode::Cbc => write!(f, "CBC"),
        }
    }
}

/// Generate a random block-sized IV from a cryptographically secure source
pub fn gen_iv<C: BlockCipher>() -> Vec<u8> {
    let mut iv = vec![0_u8; C::BLOCK_LEN];
    thread_rng().fill_bytes(&mut iv);
    trace!("generated {}-byte IV for {}", iv.len(), C::NAME);
    iv
}

/// Encrypt under the selected mode
///
/// Returns the ciphertext and the IV used (`None` for ECB). A caller-supplied IV
/// is ignored by ECB.
pub fn encrypt<C: BlockCipher>(
    plaintext: &[u8],
    key: &[u8],
    mode: Mode,
    iv: Option<&[u8]>,
) -> Result<(Vec<u8>, Option<Vec<u8>>), Error> {
    debug!("{}-{} encrypt, {} bytes", C::NAME, mode, plaintext.len());

    match mode {
        Mode::Ecb => Ok((ecb::encrypt::<C>(plaintext, key)?, None)),
        Mode::Cbc => {
            let (ciphertext, iv) = cbc::encrypt::<C>(plaintext, key, iv)?;
            Ok((ciphertext, Some(iv)))
        }
    }
}

/// Decrypt under the selected mode
///
/// CBC requires the IV used for encryption; ECB ignores it.
pub fn decrypt<C: BlockCipher>(
    ciphertext: &[u8],
    key: &[u8],
    mode: Mode,
    iv: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    debug!("{}-{} decrypt, {} bytes", C::NAME, mode, ciphertext.len());

    match mode {
        Mode::Ecb => ecb::decrypt::<C>(ciphertext, key),
        Mode::Cbc => cbc::decrypt::<C>(ciphertext, key, iv.ok_or(Error::MissingIv)?),
    }
}

/// Encrypt, parsing the mode from its name ("ECB" or "CBC", any case)
pub fn encrypt_named<C: BlockCipher>(
    plaintext: &[u8],
    key: &[u8],
    mode: &str,
    iv: Option<&[u8]>,
) -> Result<(Vec<u8>, Option<Vec<u8>>), Error> {
    encrypt::<C>(plaintext, key, mode.parse()?, iv)
}

/// Decrypt, parsing the mode from its name ("ECB" or "CBC", any case)
pub fn decrypt_named<C: BlockCipher>(
    ciphertext: &[u8],
    key: &[u8],
    mode: &str,
    iv: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    decrypt::<C>(ciphertext, key, mode.parse()?, iv)
}
