use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::letter_stats::LetterStatsBook;
use crate::generator::dictionary::Dictionary;

const MISSED_WORDS_PER_BATCH: usize = 2;
const MISSED_WORD_REPEATS: usize = 2;
const ERROR_LETTER_WORDS: usize = 4;
const WORDS_PER_LETTER: usize = 2;

/// Pick `count` words aimed at the typist's weak spots: recently missed
/// words first, then error-prone letters, then the least practised letters.
pub fn select_words<R: Rng>(
    book: &mut LetterStatsBook,
    dictionary: &Dictionary,
    count: usize,
    max_len: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut words: Vec<String> = Vec::with_capacity(count);

    let missed = book.take_missed_words(MISSED_WORDS_PER_BATCH.min(count), max_len);
    for _ in 0..MISSED_WORD_REPEATS {
        words.extend(missed.iter().cloned());
    }

    let error_budget = ERROR_LETTER_WORDS.min(count.saturating_sub(words.len()));
    let error_letters: Vec<char> = book.error_prone_letters().into_iter().map(|(c, _)| c).collect();
    words.extend(words_for_letters(&error_letters, dictionary, error_budget, max_len, rng));

    let remaining = count.saturating_sub(words.len());
    let least_used: Vec<char> = book.least_used_letters().into_iter().map(|(c, _)| c).collect();
    words.extend(words_for_letters(&least_used, dictionary, remaining, max_len, rng));

    if words.len() < count {
        let pool = dictionary.words_within(max_len);
        while words.len() < count {
            let Some(word) = pool.choose(rng) else {
                break;
            };
            words.push((*word).to_string());
        }
    }

    words.shuffle(rng);
    words.truncate(count);
    words
}

fn words_for_letters<R: Rng>(
    letters: &[char],
    dictionary: &Dictionary,
    mut budget: usize,
    max_len: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut out = Vec::new();
    for &letter in letters {
        if budget == 0 {
            break;
        }
        let pool = dictionary.containing(letter, max_len);
        let take = WORDS_PER_LETTER.min(budget).min(pool.len());
        out.extend(pool.choose_multiple(rng, take).map(|w| (*w).to_string()));
        budget -= take;
    }
    out
}
