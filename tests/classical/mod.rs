use cipherlab::classical::{caesar, mono, vigenere, Error};
use cipherlab::language::Quadgrams;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::DICKENS;

#[test]
fn caesar_crack() {
    for &shift in [3_u8, 11, 19].iter() {
        let ciphertext = caesar::encrypt(DICKENS, shift);
        let best = caesar::crack(&ciphertext);

        assert_eq!(best.key, shift);
        assert_eq!(best.plaintext, DICKENS);
    }

    // every key is tried
    let candidates = caesar::brute_force(&caesar::encrypt(DICKENS, 5));
    assert_eq!(candidates.len(), 26);
    assert_eq!(candidates[0].key, 5);
}

#[test]
fn vigenere_crack() {
    let ciphertext = vigenere::encrypt(DICKENS, "secret").unwrap();
    assert_ne!(ciphertext, DICKENS);

    let solution = vigenere::crack(&ciphertext, &vigenere::CrackConfig::default()).unwrap();
    assert_eq!(solution.key, "secret");
    assert_eq!(solution.plaintext, DICKENS);
}

#[test]
fn vigenere_key_length_estimates() {
    let ciphertext = vigenere::encrypt(DICKENS, "secret").unwrap();
    let letters = vigenere::clean(&ciphertext);

    let ic_lengths = vigenere::ic_key_lengths(&letters, 20);
    assert!(ic_lengths[..5].contains(&6));

    let kasiski = vigenere::kasiski(&letters, &vigenere::CrackConfig::default());
    assert!(kasiski[..3].contains(&6));

    assert_eq!(vigenere::find_key(&letters, 6), "secret");
}

#[test]
fn mono_round_trip() {
    let key = "zyxwvutsrqponmlkjihgfedcba";
    let ciphertext = mono::encrypt(DICKENS, key).unwrap();

    assert_eq!(mono::decrypt(&ciphertext, key).unwrap(), DICKENS);
    assert_eq!(mono::encrypt(DICKENS, "abc"), Err(Error::InvalidKey));
}

#[test]
fn mono_crack_improves_on_frequency_guess() {
    let ciphertext = mono::encrypt(DICKENS, "phqgiumeaylnofdxjkrcvstzwb").unwrap();
    let model = Quadgrams::english();

    let start = mono::initial_mapping(ciphertext.as_bytes());
    let start_score = model.score(start.apply(&ciphertext).as_bytes());

    let mut rng = StdRng::seed_from_u64(42);
    let strategy = mono::Strategy::Anneal(mono::AnnealConfig {
        iterations: 5_000,
        ..Default::default()
    });
    let solution = mono::crack(&ciphertext, &strategy, &model, &mut rng).unwrap();

    assert!(solution.mapping.is_permutation());
    assert!(solution.score >= start_score);
    assert_eq!(solution.plaintext, solution.mapping.apply(&ciphertext));
}
