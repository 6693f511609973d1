use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::dictionary::fits_length;
use crate::session::result::CompletedWord;

/// Letters slower than a 20 WPM pace (5.1 chars per word) are treated as
/// pauses and left out of the averages.
pub const MAX_ALLOWED_LETTER_DURATION_MS: f64 = 60_000.0 / (20.0 * 5.1);
pub const DURATION_MOVING_AVERAGE_NUM: usize = 50;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LetterStats {
    pub durations: Vec<u64>,
    pub miss_count: usize,
    pub duration_moving_averages: Vec<f64>,
    /// Accepted samples per miss; 0 until the letter is first missed.
    pub error_freq: usize,
}

impl LetterStats {
    pub fn add_duration(&mut self, duration_ms: u64) -> bool {
        if duration_ms as f64 >= MAX_ALLOWED_LETTER_DURATION_MS {
            return false;
        }
        self.durations.push(duration_ms);
        if let Some(mean) = self.average_duration() {
            self.duration_moving_averages.push(mean);
            if self.duration_moving_averages.len() > DURATION_MOVING_AVERAGE_NUM {
                self.duration_moving_averages.remove(0);
            }
        }
        self.update_error_frequency();
        true
    }

    pub fn add_miss(&mut self) {
        self.miss_count += 1;
    }

    /// Mean of the most recent samples.
    pub fn average_duration(&self) -> Option<f64> {
        if self.durations.is_empty() {
            return None;
        }
        let start = self.durations.len().saturating_sub(DURATION_MOVING_AVERAGE_NUM);
        let recent = &self.durations[start..];
        Some(recent.iter().sum::<u64>() as f64 / recent.len() as f64)
    }

    pub fn occurrences(&self) -> usize {
        self.durations.len()
    }

    fn update_error_frequency(&mut self) {
        if self.miss_count == 0 {
            return;
        }
        self.error_freq = self.durations.len() / self.miss_count;
    }
}

/// Everything learned about the typist across sessions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LetterStatsBook {
    pub letters: BTreeMap<char, LetterStats>,
    /// Words finished with at least one miss, queued for repetition.
    #[serde(default)]
    pub missed_words: BTreeSet<String>,
    #[serde(default)]
    pub words_completed: usize,
    #[serde(default)]
    pub total_word_ms: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for LetterStatsBook {
    fn default() -> Self {
        Self {
            letters: ('a'..='z').map(|c| (c, LetterStats::default())).collect(),
            missed_words: BTreeSet::new(),
            words_completed: 0,
            total_word_ms: 0,
            updated_at: None,
        }
    }
}

impl LetterStatsBook {
    pub fn record(&mut self, word: &CompletedWord) {
        self.words_completed += 1;
        self.total_word_ms += word.total_duration_ms;
        for letter in &word.letters {
            let key = letter.ch.to_ascii_lowercase();
            // Only the tracked alphabet is scored; punctuation is not.
            let Some(stats) = self.letters.get_mut(&key) else {
                continue;
            };
            // The miss only counts towards error_freq from the next sample on.
            stats.add_duration(letter.duration_ms);
            if letter.ever_missed {
                stats.add_miss();
            }
        }
        if word.any_missed() {
            let bare: String = word
                .text
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .collect::<String>()
                .to_ascii_lowercase();
            if !bare.is_empty() {
                self.missed_words.insert(bare);
            }
        }
        self.updated_at = Some(word.completed_at);
    }

    pub fn wpm(&self) -> f64 {
        if self.total_word_ms == 0 {
            return 0.0;
        }
        self.words_completed as f64 / (self.total_word_ms as f64 / 60_000.0)
    }

    /// Letters ordered by how rarely they have been typed.
    pub fn least_used_letters(&self) -> Vec<(char, usize)> {
        let mut letters: Vec<(char, usize)> = self
            .letters
            .iter()
            .map(|(&c, s)| (c, s.occurrences()))
            .collect();
        letters.sort_by_key(|&(_, n)| n);
        letters
    }

    /// Letters that have been missed, most error-prone first.
    pub fn error_prone_letters(&self) -> Vec<(char, usize)> {
        let mut letters: Vec<(char, usize)> = self
            .letters
            .iter()
            .filter(|(_, s)| s.error_freq > 0)
            .map(|(&c, s)| (c, s.error_freq))
            .collect();
        letters.sort_by_key(|&(_, freq)| freq);
        letters
    }

    /// Removes and returns up to `limit` queued missed words that fit
    /// `max_len`, in order. Words that are too long stay queued.
    pub fn take_missed_words(&mut self, limit: usize, max_len: usize) -> Vec<String> {
        let taken: Vec<String> = self
            .missed_words
            .iter()
            .filter(|word| fits_length(word, max_len))
            .take(limit)
            .cloned()
            .collect();
        for word in &taken {
            self.missed_words.remove(word);
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::result::LetterRecord;

    fn completed(text: &str, durations: &[u64], missed: &[bool], total: u64) -> CompletedWord {
        CompletedWord {
            word_index: 0,
            text: text.to_string(),
            total_duration_ms: total,
            letters: text
                .chars()
                .zip(durations)
                .zip(missed)
                .map(|((ch, &duration_ms), &ever_missed)| LetterRecord {
                    ch,
                    duration_ms,
                    ever_missed,
                })
                .collect(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn slow_letters_are_ignored() {
        let mut stats = LetterStats::default();
        assert!(stats.add_duration(200));
        assert!(!stats.add_duration(5_000));
        assert_eq!(stats.occurrences(), 1);
        assert_eq!(stats.average_duration(), Some(200.0));
    }

    #[test]
    fn average_uses_recent_window() {
        let mut stats = LetterStats::default();
        for _ in 0..DURATION_MOVING_AVERAGE_NUM {
            stats.add_duration(500);
        }
        for _ in 0..DURATION_MOVING_AVERAGE_NUM {
            stats.add_duration(100);
        }
        assert_eq!(stats.average_duration(), Some(100.0));
        assert_eq!(
            stats.duration_moving_averages.len(),
            DURATION_MOVING_AVERAGE_NUM
        );
    }

    #[test]
    fn error_frequency_is_samples_per_miss() {
        let mut stats = LetterStats::default();
        stats.add_duration(100);
        assert_eq!(stats.error_freq, 0);
        stats.add_miss();
        for _ in 0..3 {
            stats.add_duration(100);
        }
        assert_eq!(stats.error_freq, 4);
    }

    #[test]
    fn record_updates_letters_and_missed_words() {
        let mut book = LetterStatsBook::default();
        book.record(&completed("Cab", &[100, 120, 140], &[false, true, false], 360));
        assert_eq!(book.letters[&'c'].occurrences(), 1);
        assert_eq!(book.letters[&'a'].miss_count, 1);
        assert!(book.missed_words.contains("cab"));
        assert_eq!(book.words_completed, 1);
        assert!(book.updated_at.is_some());
    }

    #[test]
    fn wpm_counts_words_per_minute_of_word_time() {
        let mut book = LetterStatsBook::default();
        assert_eq!(book.wpm(), 0.0);
        book.record(&completed("ab", &[100, 100], &[false, false], 1_000));
        book.record(&completed("cd", &[100, 100], &[false, false], 2_000));
        assert!((book.wpm() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn letter_orderings() {
        let mut book = LetterStatsBook::default();
        book.record(&completed("ee", &[100, 100], &[true, false], 200));
        book.record(&completed("tt", &[100, 100], &[false, false], 200));
        book.record(&completed("t", &[100], &[true], 100));
        book.record(&completed("t", &[100], &[false], 100));

        let least = book.least_used_letters();
        assert!(least.iter().position(|&(c, _)| c == 'a') < least.iter().position(|&(c, _)| c == 'e'));

        let prone = book.error_prone_letters();
        assert_eq!(prone.len(), 2);
        // 'e': 2 samples / 1 miss, 't': 4 samples / 1 miss
        assert_eq!(prone[0], ('e', 2));
        assert_eq!(prone[1], ('t', 4));
    }

    #[test]
    fn first_miss_leaves_error_frequency_at_zero() {
        let mut book = LetterStatsBook::default();
        book.record(&completed("a", &[100], &[true], 100));
        assert_eq!(book.letters[&'a'].miss_count, 1);
        assert_eq!(book.letters[&'a'].error_freq, 0);
        assert!(book.error_prone_letters().is_empty());

        book.record(&completed("a", &[100], &[false], 100));
        assert_eq!(book.letters[&'a'].error_freq, 2);
    }

    #[test]
    fn overlong_missed_words_stay_queued() {
        let mut book = LetterStatsBook::default();
        for word in ["a", "encyclopedia", "zoo"] {
            book.missed_words.insert(word.to_string());
        }
        assert_eq!(book.take_missed_words(2, 4), vec!["a", "zoo"]);
        assert!(book.missed_words.contains("encyclopedia"));
        assert_eq!(book.take_missed_words(2, 0), vec!["encyclopedia"]);
        assert!(book.missed_words.is_empty());
    }
}
