use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use super::shift_letter;
use crate::language::{chi_squared, word_score, LETTERS};

// word matches outweigh frequency fit when combining scores
const WORD_WEIGHT: f64 = 5.0;

/// Encrypt by shifting every letter forward `shift` places
pub fn encrypt(plaintext: &str, shift: u8) -> String {
    plaintext.chars().map(|c| shift_letter(c, shift % 26)).collect()
}

/// Decrypt by shifting every letter back `shift` places
pub fn decrypt(ciphertext: &str, shift: u8) -> String {
    encrypt(ciphertext, (26 - shift % 26) % 26)
}

/// One brute-force decryption attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub key: u8,
    pub plaintext: String,
    /// Chi-squared against English letter frequencies, in percent units (lower is better)
    pub freq_score: f64,
    /// Percentage of common English words (higher is better)
    pub word_score: f64,
    /// `freq_score - 5 * word_score` (lower is better)
    pub combined: f64,
}

impl Candidate {
    fn new(ciphertext: &str, key: u8) -> Self {
        let plaintext = decrypt(ciphertext, key);
        // percent-scale chi-squared is 100x the fractional one
        let freq_score = chi_squared(plaintext.as_bytes()) * 100.0;
        let word_score = word_score(&plaintext);

        Self {
            key,
            plaintext,
            freq_score,
            word_score,
            combined: freq_score - word_score * WORD_WEIGHT,
        }
    }
}

/// Try all 26 keys
///
/// Returns every candidate, best (lowest combined score) first
pub fn brute_force(ciphertext: &str) -> Vec<Candidate> {
    let mut res: Vec<Candidate> = (0..LETTERS as u8)
        .map(|key| Candidate::new(ciphertext, key))
        .collect();

    // stable sort keeps key order among ties
    res.sort_by(|a, b| {
        a.combined
            .partial_cmp(&b.combined)
            .unwrap_or(core::cmp::Ordering::Equal)
    });

    for (rank, c) in res.iter().take(3).enumerate() {
        debug!(
            "caesar candidate #{}: key {}, word score {:.2}%, frequency score {:.2}",
            rank + 1,
            c.key,
            c.word_score,
            c.freq_score
        );
    }

    res
}

/// Recover the most likely key and plaintext
pub fn crack(ciphertext: &str) -> Candidate {
    // brute_force always yields 26 candidates
    brute_force(ciphertext).swap_remove(0)
}
