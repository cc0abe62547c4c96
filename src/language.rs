use hashbrown::HashMap;
use libm::log10;

/// Number of letters in the English alphabet
pub const LETTERS: usize = 26;

/// Index of coincidence of English text
pub const ENGLISH_IC: f64 = 0.0686;
/// Index of coincidence of uniformly random letters
pub const RANDOM_IC: f64 = 0.0385;

/// Score for quadgrams missing from the table
pub const QUADGRAM_FLOOR: f64 = -12.0;

/// Unigram frequencies of English characters (case-insensitive)
///
/// Frequencies from: https://en.wikipedia.org/wiki/Letter_frequency
pub fn english_frequency(byte: u8) -> f64 {
    match byte {
        0x41 | 0x61 /* A | a */ => 0.08167,
        0x42 | 0x62 /* B | b */ => 0.01492,
        0x43 | 0x63 /* C | c */ => 0.02782,
        0x44 | 0x64 /* D | d */ => 0.04253,
        0x45 | 0x65 /* E | e */ => 0.12702,
        0x46 | 0x66 /* F | f */ => 0.02228,
        0x47 | 0x67 /* G | g */ => 0.02015,
        0x48 | 0x68 /* H | h */ => 0.06094,
        0x49 | 0x69 /* I | i */ => 0.06966,
        0x4a | 0x6a /* J | j */ => 0.00153,
        0x4b | 0x6b /* K | k */ => 0.00772,
        0x4c | 0x6c /* L | l */ => 0.04025,
        0x4d | 0x6d /* M | m */ => 0.02406,
        0x4e | 0x6e /* N | n */ => 0.06749,
        0x4f | 0x6f /* O | o */ => 0.07507,
        0x50 | 0x70 /* P | p */ => 0.01929,
        0x51 | 0x71 /* Q | q */ => 0.00095,
        0x52 | 0x72 /* R | r */ => 0.05987,
        0x53 | 0x73 /* S | s */ => 0.06327,
        0x54 | 0x74 /* T | t */ => 0.09056,
        0x55 | 0x75 /* U | u */ => 0.02758,
        0x56 | 0x76 /* V | v */ => 0.00978,
        0x57 | 0x77 /* W | w */ => 0.02360,
        0x58 | 0x78 /* X | x */ => 0.00150,
        0x59 | 0x79 /* Y | y */ => 0.01974,
        0x5a | 0x7a /* Z | z */ => 0.00074,
        _ => 0.0,  // not a letter
    }
}

/// English letters ordered from most to least frequent
pub const ENGLISH_BY_FREQUENCY: &[u8; LETTERS] = b"etaoinshrdlcumwfgypbvkjxqz";

/// Most common English words, used to judge candidate plaintexts
pub const COMMON_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when", "make",
    "can", "like", "time", "no", "just", "him", "know", "take", "people", "into", "year",
    "your", "good", "some", "could", "them", "see", "other", "than", "then", "now", "look",
    "only", "come", "its", "over", "think", "also", "back", "after", "use", "two", "how", "our",
    "work", "first", "well", "way", "even", "new", "want", "because", "any", "these", "give",
    "day", "most", "us", "is", "was", "are", "been", "has", "had", "were", "said", "did",
    "having", "may", "should", "am", "being", "does", "done", "doing",
];

/// Quadgram log10 likelihoods for English
const QUADGRAMS: &[(&[u8; 4], f64)] = &[
    (b"tion", -4.182), (b"nthe", -5.012), (b"ther", -5.142), (b"that", -5.234),
    (b"ofth", -5.456), (b"with", -5.523), (b"inth", -5.678), (b"atio", -5.789),
    (b"ethe", -5.834), (b"ment", -5.912), (b"tthe", -6.023), (b"fthe", -6.145),
    (b"dthe", -6.234), (b"ions", -6.345), (b"andt", -6.512), (b"edth", -6.723),
    (b"ande", -6.812), (b"onen", -6.901), (b"onth", -7.023), (b"ings", -7.245),
    (b"here", -7.334), (b"ould", -7.423), (b"ting", -7.512), (b"ness", -7.623),
    (b"this", -7.712), (b"ough", -7.834), (b"them", -7.923), (b"sthe", -8.012),
    (b"from", -8.123), (b"qual", -8.234), (b"some", -8.434), (b"were", -8.523),
    (b"have", -8.612), (b"what", -8.723), (b"whic", -8.812), (b"will", -8.901),
    (b"when", -9.123), (b"many", -9.234), (b"time", -9.345),
];

/// Index of an ASCII letter in the alphabet, case-insensitive
pub fn letter_index(byte: u8) -> Option<usize> {
    if byte.is_ascii_alphabetic() {
        Some((byte.to_ascii_lowercase() - b'a') as usize)
    } else {
        None
    }
}

/// Count ASCII letters (case-insensitive)
///
/// Returns the per-letter counts and the total number of letters
pub fn letter_counts(text: &[u8]) -> ([u64; LETTERS], u64) {
    let mut counts = [0_u64; LETTERS];
    let mut total = 0_u64;

    for idx in text.iter().filter_map(|&b| letter_index(b)) {
        counts[idx] += 1;
        total += 1;
    }

    (counts, total)
}

/// Chi-squared statistic of the text's letter distribution against English
///
/// Lower is more English-like. Text without letters scores infinity.
pub fn chi_squared(text: &[u8]) -> f64 {
    let (counts, total) = letter_counts(text);
    if total == 0 {
        return f64::INFINITY;
    }

    let total = total as f64;
    counts.iter().zip(b'a'..=b'z').fold(0.0_f64, |chi, (&count, letter)| {
        let observed = count as f64 / total;
        let expected = english_frequency(letter);
        chi + (observed - expected) * (observed - expected) / expected
    })
}

/// Index of coincidence: probability two letters drawn from the text match
///
/// Zero for fewer than two letters
pub fn index_of_coincidence(text: &[u8]) -> f64 {
    let (counts, total) = letter_counts(text);
    if total <= 1 {
        return 0.0;
    }

    let pairs: u64 = counts.iter().map(|&n| n * n.saturating_sub(1)).sum();
    pairs as f64 / (total * (total - 1)) as f64
}

/// Percentage of whitespace-separated words that are common English words
///
/// Punctuation is stripped from each word before lookup
pub fn word_score(text: &str) -> f64 {
    let mut words = 0_usize;
    let mut valid = 0_usize;
    let mut buf = alloc::string::String::new();

    for word in text.split_whitespace() {
        words += 1;

        buf.clear();
        buf.extend(
            word.chars()
                .filter(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_ascii_lowercase()),
        );

        if COMMON_WORDS.contains(&buf.as_str()) {
            valid += 1;
        }
    }

    if words == 0 {
        return 0.0;
    }

    valid as f64 / words as f64 * 100.0
}

/// Quadgram fitness model, higher scores are more English-like
pub struct Quadgrams {
    table: HashMap<[u8; 4], f64>,
    floor: f64,
}

impl Quadgrams {
    /// Build the English quadgram model
    pub fn english() -> Self {
        let mut table = HashMap::with_capacity(QUADGRAMS.len());
        for &(quad, score) in QUADGRAMS.iter() {
            table.insert(*quad, score);
        }
        Self { table, floor: QUADGRAM_FLOOR }
    }

    /// Build a model from raw quadgram counts, as log10 probabilities
    ///
    /// Unseen quadgrams score log10(0.01 / total)
    pub fn from_counts<'a, I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (&'a [u8; 4], u64)>,
    {
        let counts: HashMap<[u8; 4], u64> = counts.into_iter().map(|(q, n)| (*q, n)).collect();
        let total = counts.values().sum::<u64>().max(1) as f64;

        let table = counts
            .into_iter()
            .map(|(q, n)| (q, log10(n as f64 / total)))
            .collect();

        Self { table, floor: log10(0.01 / total) }
    }

    /// Sum of quadgram scores over every window of four letters
    ///
    /// Windows containing a non-letter are skipped
    pub fn score(&self, text: &[u8]) -> f64 {
        text.windows(4)
            .filter(|w| w.iter().all(|b| b.is_ascii_alphabetic()))
            .map(|w| {
                let quad = [
                    w[0].to_ascii_lowercase(),
                    w[1].to_ascii_lowercase(),
                    w[2].to_ascii_lowercase(),
                    w[3].to_ascii_lowercase(),
                ];
                *self.table.get(&quad).unwrap_or(&self.floor)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"\
        It was the best of times, it was the worst of times, it was the age of wisdom, it was the \
        age of foolishness, it was the epoch of belief, it was the epoch of incredulity";

    #[test]
    fn check_frequency_table() {
        let sum: f64 = (b'a'..=b'z').map(english_frequency).sum();
        assert!(libm::fabs(sum - 1.0) < 0.01);
        assert_eq!(english_frequency(b'E'), english_frequency(b'e'));
        assert_eq!(english_frequency(b' '), 0.0);

        // ordering table agrees with the frequencies
        for pair in ENGLISH_BY_FREQUENCY.windows(2) {
            assert!(english_frequency(pair[0]) >= english_frequency(pair[1]));
        }
    }

    #[test]
    fn check_letter_counts() {
        let (counts, total) = letter_counts(b"AaB, c!");
        assert_eq!(total, 4);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[2], 1);
    }

    #[test]
    fn check_chi_squared() {
        let garbled: alloc::vec::Vec<u8> = SAMPLE
            .iter()
            .map(|&b| match b {
                b'a'..=b'z' => b'z' - (b - b'a'),
                b'A'..=b'Z' => b'z' - (b - b'A'),
                _ => b,
            })
            .collect();

        assert!(chi_squared(SAMPLE) < chi_squared(&garbled));
        assert!(chi_squared(b"1234 !!").is_infinite());
    }

    #[test]
    fn check_index_of_coincidence() {
        assert_eq!(index_of_coincidence(b"a"), 0.0);
        assert_eq!(index_of_coincidence(b"aaaa"), 1.0);
        assert_eq!(index_of_coincidence(b"abcd"), 0.0);
        // 2 * 1 matching ordered pairs out of 4 * 3
        assert!(libm::fabs(index_of_coincidence(b"aabc") - 2.0 / 12.0) < 1e-12);
    }

    #[test]
    fn check_word_score() {
        assert_eq!(word_score(""), 0.0);
        assert_eq!(word_score("The cat, and the hat."), 60.0);
        assert_eq!(word_score("xq zzv"), 0.0);
    }

    #[test]
    fn check_quadgram_score() {
        let model = Quadgrams::english();
        assert_eq!(model.score(b"abc"), 0.0);
        assert_eq!(model.score(b"TION"), -4.182);
        assert_eq!(model.score(b"tion xqzj"), -4.182 + QUADGRAM_FLOOR);
        assert!(model.score(b"withthat") > model.score(b"qxzjvkwp"));
    }

    #[test]
    fn check_quadgrams_from_counts() {
        let counts = [(b"abcd", 90_u64), (b"efgh", 10)];
        let model = Quadgrams::from_counts(counts.iter().map(|&(q, n)| (q, n)));
        assert!(libm::fabs(model.score(b"abcd") - log10(0.9)) < 1e-12);
        assert!(model.score(b"zzzz") < model.score(b"efgh"));
    }
}
