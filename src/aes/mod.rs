//! AES-128 block engine (FIPS-197)
//!
//! Stateless: every call expands the raw key, transforms one block, and drops
//! (and wipes) the schedule again.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod tables;

use tables::{GMUL_11, GMUL_13, GMUL_14, GMUL_2, GMUL_3, GMUL_9, INV_SBOX, RCON, SBOX};

/// AES block length in bytes
pub const BLOCK_LEN: usize = 16;
/// AES-128 key length in bytes
pub const KEY_LEN_128: usize = 16;
/// Number of rounds for AES-128
pub const ROUNDS: usize = 10;
/// Number of 32-bit words in the expanded AES-128 key
pub const SCHEDULE_WORDS: usize = 4 * (ROUNDS + 1);

// Number of 32-bit words in the raw key
const KEY_WORDS: usize = KEY_LEN_128 / 4;

/// 4x4 byte matrix, `state[row][col] = block[row + 4 * col]`
type State = [[u8; 4]; 4];

/// Four-byte key schedule word
pub type Word = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InvalidLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLength => write!(
                f,
                "AES-128 key and block must be {} bytes",
                BLOCK_LEN
            ),
        }
    }
}

/// Expanded AES-128 key: 11 round keys viewed as 44 words
///
/// Wiped when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeySchedule {
    words: [Word; SCHEDULE_WORDS],
}

impl KeySchedule {
    /// All 44 schedule words, round key `r` is `words()[4r..4r + 4]`
    pub fn words(&self) -> &[Word; SCHEDULE_WORDS] {
        &self.words
    }

    fn round_key(&self, round: usize) -> &[Word] {
        &self.words[round * 4..round * 4 + 4]
    }
}

/// Expand a 16-byte key into 44 four-byte words
pub fn key_expansion(key: &[u8]) -> Result<KeySchedule, Error> {
    if key.len() != KEY_LEN_128 {
        return Err(Error::InvalidLength);
    }

    let mut words = [[0_u8; 4]; SCHEDULE_WORDS];

    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        word.copy_from_slice(chunk);
    }

    for i in KEY_WORDS..SCHEDULE_WORDS {
        let mut temp = words[i - 1];

        if i % KEY_WORDS == 0 {
            // RotWord, SubWord, Rcon
            temp.rotate_left(1);
            for b in temp.iter_mut() {
                *b = SBOX[*b as usize];
            }
            temp[0] ^= RCON[i / KEY_WORDS];
        }

        for (t, p) in temp.iter_mut().zip(words[i - KEY_WORDS].iter()) {
            *t ^= p;
        }

        words[i] = temp;
    }

    Ok(KeySchedule { words })
}

/// Encrypt a single 16-byte block under a 16-byte key
pub fn encrypt_block(plaintext: &[u8], key: &[u8]) -> Result<[u8; BLOCK_LEN], Error> {
    if plaintext.len() != BLOCK_LEN {
        return Err(Error::InvalidLength);
    }

    let schedule = key_expansion(key)?;
    let mut block = [0_u8; BLOCK_LEN];
    block.copy_from_slice(plaintext);

    encrypt_in_place(&schedule, &mut block);

    Ok(block)
}

/// Decrypt a single 16-byte block under a 16-byte key
pub fn decrypt_block(ciphertext: &[u8], key: &[u8]) -> Result<[u8; BLOCK_LEN], Error> {
    if ciphertext.len() != BLOCK_LEN {
        return Err(Error::InvalidLength);
    }

    let schedule = key_expansion(key)?;
    let mut block = [0_u8; BLOCK_LEN];
    block.copy_from_slice(ciphertext);

    decrypt_in_place(&schedule, &mut block);

    Ok(block)
}

/// Run the forward cipher over one block with an already expanded key
///
/// Caller guarantees `block.len() == BLOCK_LEN`
pub(crate) fn encrypt_in_place(schedule: &KeySchedule, block: &mut [u8]) {
    let mut state = load_state(block);

    add_round_key(&mut state, schedule.round_key(0));

    for round in 1..ROUNDS {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, schedule.round_key(round));
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, schedule.round_key(ROUNDS));

    store_state(&state, block);
}

/// Run the inverse cipher over one block with an already expanded key
///
/// Caller guarantees `block.len() == BLOCK_LEN`
pub(crate) fn decrypt_in_place(schedule: &KeySchedule, block: &mut [u8]) {
    let mut state = load_state(block);

    add_round_key(&mut state, schedule.round_key(ROUNDS));

    for round in (1..ROUNDS).rev() {
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        add_round_key(&mut state, schedule.round_key(round));
        inv_mix_columns(&mut state);
    }

    inv_shift_rows(&mut state);
    inv_sub_bytes(&mut state);
    add_round_key(&mut state, schedule.round_key(0));

    store_state(&state, block);
}

fn load_state(block: &[u8]) -> State {
    let mut state = [[0_u8; 4]; 4];
    for (i, &b) in block[..BLOCK_LEN].iter().enumerate() {
        state[i % 4][i / 4] = b;
    }
    state
}

fn store_state(state: &State, block: &mut [u8]) {
    for (i, b) in block[..BLOCK_LEN].iter_mut().enumerate() {
        *b = state[i % 4][i / 4];
    }
}

// round key word `c` is state column `c`, same mapping as the block
fn add_round_key(state: &mut State, round_key: &[Word]) {
    for (c, word) in round_key.iter().enumerate() {
        for r in 0..4 {
            state[r][c] ^= word[r];
        }
    }
}

fn sub_bytes(state: &mut State) {
    for b in state.iter_mut().flat_map(|row| row.iter_mut()) {
        *b = SBOX[*b as usize];
    }
}

fn inv_sub_bytes(state: &mut State) {
    for b in state.iter_mut().flat_map(|row| row.iter_mut()) {
        *b = INV_SBOX[*b as usize];
    }
}

fn shift_rows(state: &mut State) {
    for (r, row) in state.iter_mut().enumerate() {
        row.rotate_left(r);
    }
}

fn inv_shift_rows(state: &mut State) {
    for (r, row) in state.iter_mut().enumerate() {
        row.rotate_right(r);
    }
}

fn mix_columns(state: &mut State) {
    for c in 0..4 {
        let a = [state[0][c], state[1][c], state[2][c], state[3][c]];

        state[0][c] = GMUL_2[a[0] as usize] ^ GMUL_3[a[1] as usize] ^ a[2] ^ a[3];
        state[1][c] = a[0] ^ GMUL_2[a[1] as usize] ^ GMUL_3[a[2] as usize] ^ a[3];
        state[2][c] = a[0] ^ a[1] ^ GMUL_2[a[2] as usize] ^ GMUL_3[a[3] as usize];
        state[3][c] = GMUL_3[a[0] as usize] ^ a[1] ^ a[2] ^ GMUL_2[a[3] as usize];
    }
}

fn inv_mix_columns(state: &mut State) {
    for c in 0..4 {
        let a = [state[0][c], state[1][c], state[2][c], state[3][c]];

        state[0][c] = GMUL_14[a[0] as usize]
            ^ GMUL_11[a[1] as usize]
            ^ GMUL_13[a[2] as usize]
            ^ GMUL_9[a[3] as usize];
        state[1][c] = GMUL_9[a[0] as usize]
            ^ GMUL_14[a[1] as usize]
            ^ GMUL_11[a[2] as usize]
            ^ GMUL_13[a[3] as usize];
        state[2][c] = GMUL_13[a[0] as usize]
            ^ GMUL_9[a[1] as usize]
            ^ GMUL_14[a[2] as usize]
            ^ GMUL_11[a[3] as usize];
        state[3][c] = GMUL_11[a[0] as usize]
            ^ GMUL_13[a[1] as usize]
            ^ GMUL_9[a[2] as usize]
            ^ GMUL_14[a[3] as usize];
    }
}
