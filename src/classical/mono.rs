//! Monoalphabetic substitution and its attack
//!
//! Starts from a frequency-analysis guess and improves it by swapping pairs of
//! letters, scoring each candidate plaintext with the quadgram model.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use libm::{exp, pow};
use log::{debug, trace};
use rand::Rng;

use super::Error;
use crate::language::{letter_counts, letter_index, Quadgrams, ENGLISH_BY_FREQUENCY, LETTERS};

/// Substitution table, letter `i` maps to `table[i]` (lowercase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping([u8; LETTERS]);

impl Mapping {
    /// Maps every letter to itself
    pub fn identity() -> Self {
        let mut table = [0_u8; LETTERS];
        for (i, t) in table.iter_mut().enumerate() {
            *t = b'a' + i as u8;
        }
        Self(table)
    }

    /// Build from a 26-letter alphabet, `alphabet[i]` being the image of letter `i`
    ///
    /// Every letter must appear exactly once (case-insensitive)
    pub fn from_alphabet(alphabet: &str) -> Result<Self, Error> {
        let bytes = alphabet.as_bytes();
        if bytes.len() != LETTERS {
            return Err(Error::InvalidKey);
        }

        let mut table = [0_u8; LETTERS];
        let mut seen = [false; LETTERS];

        for (t, &b) in table.iter_mut().zip(bytes.iter()) {
            let idx = letter_index(b).ok_or(Error::InvalidKey)?;
            if seen[idx] {
                return Err(Error::InvalidKey);
            }
            seen[idx] = true;
            *t = b'a' + idx as u8;
        }

        Ok(Self(table))
    }

    /// Images of `a..=z`
    pub fn table(&self) -> &[u8; LETTERS] {
        &self.0
    }

    /// Whether every letter is the image of exactly one letter
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; LETTERS];
        for &b in self.0.iter() {
            match letter_index(b) {
                Some(idx) if !seen[idx] => seen[idx] = true,
                _ => return false,
            }
        }
        true
    }

    /// The mapping that undoes this one
    pub fn inverse(&self) -> Self {
        let mut table = [0_u8; LETTERS];
        for (i, &b) in self.0.iter().enumerate() {
            table[(b - b'a') as usize] = b'a' + i as u8;
        }
        Self(table)
    }

    /// Exchange the images of two letters
    pub fn swap(&mut self, a: usize, b: usize) {
        self.0.swap(a, b);
    }

    /// Substitute every ASCII letter, preserving case and leaving the rest alone
    pub fn apply(&self, text: &str) -> String {
        String::from_utf8_lossy(&self.apply_bytes(text.as_bytes())).into_owned()
    }

    fn apply_bytes(&self, text: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        self.apply_into(text, &mut out);
        out
    }

    fn apply_into(&self, text: &[u8], out: &mut Vec<u8>) {
        out.clear();
        out.extend(text.iter().map(|&b| match letter_index(b) {
            Some(idx) if b.is_ascii_uppercase() => self.0[idx].to_ascii_uppercase(),
            Some(idx) => self.0[idx],
            None => b,
        }));
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cipher: abcdefghijklmnopqrstuvwxyz")?;
        write!(f, "Plain:  ")?;
        for &b in self.0.iter() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// Encrypt with a substitution alphabet (`key[i]` replaces letter `i`)
pub fn encrypt(plaintext: &str, key: &str) -> Result<String, Error> {
    Ok(Mapping::from_alphabet(key)?.apply(plaintext))
}

/// Decrypt with a substitution alphabet
pub fn decrypt(ciphertext: &str, key: &str) -> Result<String, Error> {
    Ok(Mapping::from_alphabet(key)?.inverse().apply(ciphertext))
}

/// Decryption guess from letter frequencies
///
/// The i-th most common ciphertext letter maps to the i-th most common English
/// letter. Ties go to the earlier letter of the alphabet.
pub fn initial_mapping(ciphertext: &[u8]) -> Mapping {
    let (counts, _) = letter_counts(ciphertext);

    let mut by_count: Vec<usize> = (0..LETTERS).collect();
    by_count.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));

    let mut table = [0_u8; LETTERS];
    for (&cipher, &plain) in by_count.iter().zip(ENGLISH_BY_FREQUENCY.iter()) {
        table[cipher] = plain;
    }

    Mapping(table)
}

/// Hill-climbing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimbConfig {
    /// Maximum number of swaps tried
    pub iterations: usize,
    /// Stop after this many swaps in a row without improvement
    pub patience: usize,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self { iterations: 10_000, patience: 1_000 }
    }
}

/// Simulated annealing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealConfig {
    pub iterations: usize,
    pub start_temp: f64,
    pub end_temp: f64,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self { iterations: 50_000, start_temp: 20.0, end_temp: 0.001 }
    }
}

/// Search strategy for [`crack`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    HillClimb(ClimbConfig),
    Anneal(AnnealConfig),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Anneal(AnnealConfig::default())
    }
}

/// Best decryption mapping found
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub mapping: Mapping,
    pub plaintext: String,
    /// Quadgram score of the plaintext (higher is better)
    pub score: f64,
}

// two distinct letters
fn random_pair<R: Rng>(rng: &mut R) -> (usize, usize) {
    let a = rng.gen_range(0, LETTERS);
    let mut b = rng.gen_range(0, LETTERS - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

struct Scorer<'a> {
    ciphertext: &'a [u8],
    model: &'a Quadgrams,
    buf: Vec<u8>,
}

impl<'a> Scorer<'a> {
    fn new(ciphertext: &'a [u8], model: &'a Quadgrams) -> Self {
        Self { ciphertext, model, buf: Vec::with_capacity(ciphertext.len()) }
    }

    fn score(&mut self, mapping: &Mapping) -> f64 {
        mapping.apply_into(self.ciphertext, &mut self.buf);
        self.model.score(&self.buf)
    }
}

/// Greedy search: keep a random swap only when it raises the score
///
/// Returns the final mapping and its score, never worse than `start`
pub fn hill_climb<R: Rng>(
    ciphertext: &[u8],
    start: Mapping,
    config: &ClimbConfig,
    model: &Quadgrams,
    rng: &mut R,
) -> (Mapping, f64) {
    let mut scorer = Scorer::new(ciphertext, model);
    let mut best = start;
    let mut best_score = scorer.score(&best);
    let mut stale = 0;

    for iter in 0..config.iterations {
        let (a, b) = random_pair(rng);
        let mut candidate = best;
        candidate.swap(a, b);

        let score = scorer.score(&candidate);
        if score > best_score {
            best = candidate;
            best_score = score;
            stale = 0;
            trace!("climb: iteration {} score {:.2}", iter, best_score);
        } else {
            stale += 1;
            if stale >= config.patience {
                debug!("climb: no improvement for {} swaps, stopping at {}", stale, iter);
                break;
            }
        }
    }

    (best, best_score)
}

/// Simulated annealing with a geometric cooling schedule
///
/// Worse swaps are accepted with probability `exp(delta / T)`. Returns the best
/// mapping seen, never worse than `start`.
pub fn anneal<R: Rng>(
    ciphertext: &[u8],
    start: Mapping,
    config: &AnnealConfig,
    model: &Quadgrams,
    rng: &mut R,
) -> (Mapping, f64) {
    let mut scorer = Scorer::new(ciphertext, model);
    let mut current = start;
    let mut current_score = scorer.score(&current);
    let mut best = current;
    let mut best_score = current_score;

    let ratio = config.end_temp / config.start_temp;
    let iterations = config.iterations.max(1) as f64;

    for iter in 0..config.iterations {
        let temp = config.start_temp * pow(ratio, iter as f64 / iterations);

        let (a, b) = random_pair(rng);
        let mut candidate = current;
        candidate.swap(a, b);

        let score = scorer.score(&candidate);
        let delta = score - current_score;

        if delta > 0.0 || rng.gen::<f64>() < exp(delta / temp) {
            current = candidate;
            current_score = score;

            if current_score > best_score {
                best = current;
                best_score = current_score;
                trace!("anneal: iteration {} T {:.4} best {:.2}", iter, temp, best_score);
            }
        }
    }

    debug!("anneal: finished with best score {:.2}", best_score);
    (best, best_score)
}

/// Recover a decryption mapping for the ciphertext
pub fn crack<R: Rng>(
    ciphertext: &str,
    strategy: &Strategy,
    model: &Quadgrams,
    rng: &mut R,
) -> Result<Solution, Error> {
    let bytes = ciphertext.as_bytes();
    let (_, letters) = letter_counts(bytes);
    if letters < 4 {
        return Err(Error::TooShort);
    }

    let start = initial_mapping(bytes);
    debug!("mono: initial mapping\n{}", start);

    let (mapping, score) = match strategy {
        Strategy::HillClimb(config) => hill_climb(bytes, start, config, model, rng),
        Strategy::Anneal(config) => anneal(bytes, start, config, model, rng),
    };

    Ok(Solution { mapping, plaintext: mapping.apply(ciphertext), score })
}
