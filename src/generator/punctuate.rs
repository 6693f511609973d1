use rand::Rng;
use rand::seq::SliceRandom;

use crate::generator::capitalize::percent;

const TRAILING_PUNCT: &[char] = &[',', '.', ';', ':', '!', '?'];
const SURROUND_PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}'), ('"', '"'), ('\'', '\'')];

/// Append one punctuation mark with probability `frequency` percent.
pub fn apply_punctuation<R: Rng>(word: &str, frequency: u32, rng: &mut R) -> String {
    if frequency == 0 || !rng.gen_bool(percent(frequency)) {
        return word.to_string();
    }
    let mark = TRAILING_PUNCT.choose(rng).copied().unwrap_or('.');
    format!("{word}{mark}")
}

/// Wrap the word in a bracket or quote pair with probability `frequency` percent.
pub fn apply_surround<R: Rng>(word: &str, frequency: u32, rng: &mut R) -> String {
    if frequency == 0 || !rng.gen_bool(percent(frequency)) {
        return word.to_string();
    }
    let (open, close) = SURROUND_PAIRS.choose(rng).copied().unwrap_or(('(', ')'));
    format!("{open}{word}{close}")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn punctuation_appends_one_mark() {
        let mut rng = SmallRng::seed_from_u64(1);
        let out = apply_punctuation("stop", 100, &mut rng);
        assert_eq!(out.len(), 5);
        assert!(TRAILING_PUNCT.contains(&out.chars().last().unwrap()));
    }

    #[test]
    fn surround_uses_matching_pair() {
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..20 {
            let out = apply_surround("x", 100, &mut rng);
            let chars: Vec<char> = out.chars().collect();
            assert_eq!(chars.len(), 3);
            assert!(SURROUND_PAIRS.contains(&(chars[0], chars[2])));
        }
    }

    #[test]
    fn zero_frequencies_leave_word_alone() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(apply_punctuation("calm", 0, &mut rng), "calm");
        assert_eq!(apply_surround("calm", 0, &mut rng), "calm");
    }
}
