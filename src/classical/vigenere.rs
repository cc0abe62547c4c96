//! Vigenère cipher and its attack
//!
//! Key length is estimated with Kasiski examination and the index of
//! coincidence, then each key letter is recovered as an independent Caesar shift.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use libm::fabs;
use log::debug;

use super::{shift_letter, Error};
use crate::language::{chi_squared, index_of_coincidence, ENGLISH_IC, LETTERS};

/// Tunables for the key-length search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackConfig {
    /// Longest key length tried by the IC search
    pub max_key_len: usize,
    /// Shortest repeated sequence used by Kasiski examination
    pub min_seq_len: usize,
    /// Longest repeated sequence used by Kasiski examination
    pub max_seq_len: usize,
    /// Number of most common spacing factors kept
    pub kasiski_factors: usize,
    /// Spacing factors must be below this bound
    pub max_factor: usize,
    /// Number of key lengths fully tested
    pub candidates: usize,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            max_key_len: 20,
            min_seq_len: 3,
            max_seq_len: 5,
            kasiski_factors: 10,
            max_factor: 30,
            candidates: 3,
        }
    }
}

/// Recovered key and plaintext
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub key: String,
    pub plaintext: String,
    /// Chi-squared of the plaintext against English (lower is better)
    pub score: f64,
}

// key letters as shifts 0..26
fn key_shifts(key: &str) -> Result<Vec<u8>, Error> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(Error::InvalidKey);
    }

    Ok(key.bytes().map(|b| b.to_ascii_lowercase() - b'a').collect())
}

// the key only advances on letters
fn apply(text: &str, shifts: &[u8]) -> String {
    let mut key_idx = 0;

    text.chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                let out = shift_letter(c, shifts[key_idx % shifts.len()]);
                key_idx += 1;
                out
            } else {
                c
            }
        })
        .collect()
}

/// Encrypt with a letter key (case-insensitive)
pub fn encrypt(plaintext: &str, key: &str) -> Result<String, Error> {
    Ok(apply(plaintext, &key_shifts(key)?))
}

/// Decrypt with a letter key (case-insensitive)
pub fn decrypt(ciphertext: &str, key: &str) -> Result<String, Error> {
    let inverse: Vec<u8> = key_shifts(key)?
        .into_iter()
        .map(|s| (LETTERS as u8 - s) % LETTERS as u8)
        .collect();

    Ok(apply(ciphertext, &inverse))
}

/// Lowercase letters of the text, everything else dropped
pub fn clean(text: &str) -> Vec<u8> {
    text.bytes()
        .filter(|b| b.is_ascii_alphabetic())
        .map(|b| b.to_ascii_lowercase())
        .collect()
}

/// Every letter sequence of `min_len..=max_len` that occurs more than once
///
/// Maps the sequence to its start positions in ascending order. Zero-length
/// sequences are never counted.
pub fn repeated_sequences(
    letters: &[u8],
    min_len: usize,
    max_len: usize,
) -> HashMap<&[u8], Vec<usize>> {
    let mut res: HashMap<&[u8], Vec<usize>> = HashMap::new();

    for len in min_len.max(1)..=max_len {
        for (pos, seq) in letters.windows(len).enumerate() {
            res.entry(seq).or_insert_with(Vec::new).push(pos);
        }
    }

    res.retain(|_, positions| positions.len() > 1);
    res
}

/// Kasiski examination
///
/// Counts the factors of the spacings between repeated sequences, returning the
/// most common factors (likely key lengths) first
pub fn kasiski(letters: &[u8], config: &CrackConfig) -> Vec<usize> {
    let sequences = repeated_sequences(letters, config.min_seq_len, config.max_seq_len);
    debug!("kasiski: {} repeated sequences", sequences.len());

    let mut factor_count: HashMap<usize, usize> = HashMap::new();

    for positions in sequences.values() {
        for spacing in positions.windows(2).map(|p| p[1] - p[0]) {
            for factor in (2..config.max_factor).filter(|&f| f <= spacing && spacing % f == 0) {
                *factor_count.entry(factor).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(usize, usize)> = factor_count.into_iter().collect();
    // most common first, smaller factor first among ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    for &(len, count) in ranked.iter().take(config.kasiski_factors) {
        debug!("kasiski: length {} appears {} times", len, count);
    }

    ranked
        .into_iter()
        .take(config.kasiski_factors)
        .map(|(len, _)| len)
        .collect()
}

/// Split letters into `key_len` columns, column `i` holding every letter at `i mod key_len`
///
/// A zero key length yields no columns
pub fn columns(letters: &[u8], key_len: usize) -> Vec<Vec<u8>> {
    if key_len == 0 {
        return Vec::new();
    }

    let mut res: Vec<Vec<u8>> = (0..key_len)
        .map(|_| Vec::with_capacity(letters.len() / key_len + 1))
        .collect();

    for (i, &b) in letters.iter().enumerate() {
        res[i % key_len].push(b);
    }
    res
}

/// Mean index of coincidence over the columns of an assumed key length
pub fn average_ic(letters: &[u8], key_len: usize) -> f64 {
    if key_len == 0 {
        return 0.0;
    }

    let cols = columns(letters, key_len);
    cols.iter().map(|c| index_of_coincidence(c)).sum::<f64>() / key_len as f64
}

/// Key lengths `1..=max_len`, closest average IC to English first
pub fn ic_key_lengths(letters: &[u8], max_len: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = (1..=max_len)
        .map(|len| (len, fabs(average_ic(letters, len) - ENGLISH_IC)))
        .collect();

    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal));

    for (rank, &(len, diff)) in scored.iter().take(10).enumerate() {
        debug!("ic: #{} length {} (diff {:.4})", rank + 1, len, diff);
    }

    scored.into_iter().map(|(len, _)| len).collect()
}

// Caesar shift that makes the column most English-like
fn best_shift(column: &[u8]) -> u8 {
    let mut best = (0_u8, f64::INFINITY);
    let mut buf = Vec::with_capacity(column.len());

    for shift in 0..LETTERS as u8 {
        buf.clear();
        buf.extend(
            column
                .iter()
                .map(|&b| (b - b'a' + LETTERS as u8 - shift) % LETTERS as u8 + b'a'),
        );

        let score = chi_squared(&buf);
        if score < best.1 {
            best = (shift, score);
        }
    }

    best.0
}

/// Recover a key of known length, one Caesar shift per column
///
/// A zero key length recovers the empty key
pub fn find_key(letters: &[u8], key_len: usize) -> String {
    columns(letters, key_len)
        .iter()
        .map(|column| (best_shift(column) + b'a') as char)
        .collect()
}

/// Shortest key that repeats to the given key ("abcabc" -> "abc")
pub fn shortest_period(key: &str) -> &str {
    let bytes = key.as_bytes();
    let len = bytes.len();

    (1..len)
        .find(|&p| len % p == 0 && bytes.chunks(p).all(|chunk| chunk == &bytes[..p]))
        .map(|p| &key[..p])
        .unwrap_or(key)
}

/// Recover key and plaintext from a ciphertext
///
/// Fails `TooShort` when the text has fewer than two letters or the config
/// leaves no key length to try
pub fn crack(ciphertext: &str, config: &CrackConfig) -> Result<Solution, Error> {
    let letters = clean(ciphertext);
    if letters.len() < 2 {
        return Err(Error::TooShort);
    }

    let kasiski_lengths = kasiski(&letters, config);
    let ic_lengths = ic_key_lengths(&letters, config.max_key_len.min(letters.len()));

    // prefer lengths both methods agree on
    let top_ic = &ic_lengths[..ic_lengths.len().min(5)];
    let mut lengths: Vec<usize> = kasiski_lengths
        .into_iter()
        .filter(|len| top_ic.contains(len))
        .collect();

    if lengths.is_empty() {
        lengths = ic_lengths.into_iter().take(3).collect();
    }

    debug!("vigenere: candidate key lengths {:?}", lengths);

    let mut best: Option<Solution> = None;

    for &len in lengths.iter().take(config.candidates) {
        let key = find_key(&letters, len);
        let plaintext = decrypt(ciphertext, &key)?;
        let score = chi_squared(plaintext.as_bytes());

        debug!("vigenere: length {} -> key {:?}, chi-squared {:.4}", len, key, score);

        if best.as_ref().map_or(true, |b| score < b.score) {
            best = Some(Solution { key: shortest_period(&key).into(), plaintext, score });
        }
    }

    best.ok_or(Error::TooShort)
}
