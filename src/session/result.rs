use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::buffer::Word;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterRecord {
    pub ch: char,
    pub duration_ms: u64,
    pub ever_missed: bool,
}

/// Timing and correctness for one word finished at the leading edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedWord {
    pub word_index: usize,
    pub text: String,
    pub total_duration_ms: u64,
    pub letters: Vec<LetterRecord>,
    pub completed_at: DateTime<Utc>,
}

impl CompletedWord {
    /// Build the report for `word`. The trailing spacer is not part of it.
    pub fn from_word(word_index: usize, word: &Word, total_duration_ms: u64) -> Self {
        let letters = word
            .letters
            .iter()
            .filter(|l| !l.is_spacer())
            .map(|l| LetterRecord {
                ch: l.expected,
                duration_ms: l.duration_ms,
                ever_missed: l.miss,
            })
            .collect();

        Self {
            word_index,
            text: word.text.clone(),
            total_duration_ms,
            letters,
            completed_at: Utc::now(),
        }
    }

    pub fn any_missed(&self) -> bool {
        self.letters.iter().any(|l| l.ever_missed)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub wpm: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::buffer::TypedState;

    #[test]
    fn report_excludes_spacer_and_carries_sticky_miss() {
        let mut word = Word::new("hi");
        word.letters[0].duration_ms = 120;
        word.letters[1].duration_ms = 90;
        word.letters[1].miss = true;
        word.letters[1].state = TypedState::Correct;
        word.letters[2].duration_ms = 300;

        let report = CompletedWord::from_word(4, &word, 510);
        assert_eq!(report.word_index, 4);
        assert_eq!(report.letters.len(), 2);
        assert_eq!(
            report.letters[1],
            LetterRecord {
                ch: 'i',
                duration_ms: 90,
                ever_missed: true
            }
        );
        assert!(report.any_missed());
    }

    #[test]
    fn report_keeps_nbsp_inside_the_text() {
        let word = Word::new("10\u{a0}km");
        let report = CompletedWord::from_word(0, &word, 400);
        assert_eq!(report.letters.len(), 5);
        assert_eq!(report.letters[2].ch, '\u{a0}');
    }
}
