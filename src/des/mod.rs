//! DES block engine (FIPS 46-3)
//!
//! Blocks and keys are packed MSB-first into integers; permutation tables keep
//! their 1-indexed bit numbering, bit 1 being the most significant bit.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod tables;

use tables::{E, IP, IP_INV, P, PC1, PC2, SBOXES, SHIFTS};

/// DES block length in bytes
pub const BLOCK_LEN: usize = 8;
/// DES key length in bytes (56 effective bits, parity unchecked)
pub const KEY_LEN: usize = 8;
/// Number of Feistel rounds
pub const ROUNDS: usize = 16;

const HALF_KEY_MASK: u64 = (1 << 28) - 1;
const HALF_BLOCK_MASK: u64 = (1 << 32) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InvalidLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLength => write!(f, "DES key and block must be {} bytes", BLOCK_LEN),
        }
    }
}

/// The sixteen 48-bit round subkeys, each in the low bits of a `u64`
///
/// Wiped when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Subkeys {
    keys: [u64; ROUNDS],
}

impl Subkeys {
    /// Subkeys in encryption order (round 1 first)
    pub fn keys(&self) -> &[u64; ROUNDS] {
        &self.keys
    }
}

/// Apply a permutation table to the low `width` bits of `input`
///
/// Output bit `i` (MSB-first) is input bit `table[i]`
fn permute(input: u64, width: u32, table: &[u8]) -> u64 {
    table
        .iter()
        .fold(0_u64, |out, &bit| (out << 1) | ((input >> (width - bit as u32)) & 1))
}

fn rotate_half(half: u64, n: u32) -> u64 {
    ((half << n) | (half >> (28 - n))) & HALF_KEY_MASK
}

/// Derive all sixteen subkeys from an 8-byte key
pub fn key_schedule(key: &[u8]) -> Result<Subkeys, Error> {
    if key.len() != KEY_LEN {
        return Err(Error::InvalidLength);
    }

    let mut raw = [0_u8; KEY_LEN];
    raw.copy_from_slice(key);
    let mut key_bits = u64::from_be_bytes(raw);
    raw.zeroize();

    let permuted = permute(key_bits, 64, &PC1);
    key_bits.zeroize();

    let mut c = permuted >> 28;
    let mut d = permuted & HALF_KEY_MASK;
    let mut keys = [0_u64; ROUNDS];

    for (subkey, &shift) in keys.iter_mut().zip(SHIFTS.iter()) {
        c = rotate_half(c, shift);
        d = rotate_half(d, shift);
        *subkey = permute((c << 28) | d, 56, &PC2);
    }

    c.zeroize();
    d.zeroize();

    Ok(Subkeys { keys })
}

// f(R, K): expand, mix in the subkey, substitute through the S-boxes, permute
fn feistel(right: u64, subkey: u64) -> u64 {
    let mixed = permute(right, 32, &E) ^ subkey;

    let substituted = SBOXES.iter().enumerate().fold(0_u64, |out, (i, sbox)| {
        let chunk = (mixed >> (42 - 6 * i)) & 0x3f;
        // outer bits select the row, middle four the column
        let row = (((chunk >> 4) & 0x02) | (chunk & 0x01)) as usize;
        let col = ((chunk >> 1) & 0x0f) as usize;
        (out << 4) | sbox[row][col] as u64
    });

    permute(substituted, 32, &P)
}

// IP, sixteen rounds with the subkeys in the given order, swap, IP^-1
fn crypt<'a, I>(block: u64, subkeys: I) -> u64
where
    I: Iterator<Item = &'a u64>,
{
    let permuted = permute(block, 64, &IP);
    let mut left = permuted >> 32;
    let mut right = permuted & HALF_BLOCK_MASK;

    for &subkey in subkeys {
        let next = left ^ feistel(right, subkey);
        left = right;
        right = next;
    }

    permute((right << 32) | left, 64, &IP_INV)
}

/// Encrypt a single 8-byte block under an 8-byte key
pub fn encrypt_block(plaintext: &[u8], key: &[u8]) -> Result<[u8; BLOCK_LEN], Error> {
    if plaintext.len() != BLOCK_LEN {
        return Err(Error::InvalidLength);
    }

    let subkeys = key_schedule(key)?;
    let mut block = [0_u8; BLOCK_LEN];
    block.copy_from_slice(plaintext);

    encrypt_in_place(&subkeys, &mut block);

    Ok(block)
}

/// Decrypt a single 8-byte block under an 8-byte key
///
/// Same network as encryption, subkeys applied from round 16 down to round 1
pub fn decrypt_block(ciphertext: &[u8], key: &[u8]) -> Result<[u8; BLOCK_LEN], Error> {
    if ciphertext.len() != BLOCK_LEN {
        return Err(Error::InvalidLength);
    }

    let subkeys = key_schedule(key)?;
    let mut block = [0_u8; BLOCK_LEN];
    block.copy_from_slice(ciphertext);

    decrypt_in_place(&subkeys, &mut block);

    Ok(block)
}

/// Caller guarantees `block.len() == BLOCK_LEN`
pub(crate) fn encrypt_in_place(subkeys: &Subkeys, block: &mut [u8]) {
    let out = crypt(load_block(block), subkeys.keys.iter());
    block[..BLOCK_LEN].copy_from_slice(&out.to_be_bytes());
}

/// Caller guarantees `block.len() == BLOCK_LEN`
pub(crate) fn decrypt_in_place(subkeys: &Subkeys, block: &mut [u8]) {
    let out = crypt(load_block(block), subkeys.keys.iter().rev());
    block[..BLOCK_LEN].copy_from_slice(&out.to_be_bytes());
}

fn load_block(block: &[u8]) -> u64 {
    let mut raw = [0_u8; BLOCK_LEN];
    raw.copy_from_slice(&block[..BLOCK_LEN]);
    u64::from_be_bytes(raw)
}
