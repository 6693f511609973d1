//! Projection of session state onto whatever draws it.
//!
//! Nothing here is stored: views are recomputed from letter and word state on
//! each transition, and the engine never reads anything back from a sink.

use crate::session::buffer::{Letter, TypedState, Word};
use crate::session::cursor::Position;
use crate::session::result::StatsSnapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LetterView {
    pub display: char,
    pub active: bool,
    pub typed: bool,
    pub correct: bool,
    pub incorrect: bool,
    pub backtrack: bool,
    pub miss: bool,
    pub fix: bool,
    /// Spacer of a word blocked by stop-on-word.
    pub stop: bool,
}

impl LetterView {
    pub fn of(word: &Word, letter: &Letter, active: bool) -> Self {
        let display = if letter.is_spacer() {
            word.spacer_display()
        } else {
            letter.expected
        };
        let typed = matches!(letter.state, TypedState::Correct | TypedState::Incorrect);
        Self {
            display,
            active,
            typed,
            correct: letter.state == TypedState::Correct,
            incorrect: letter.state == TypedState::Incorrect,
            backtrack: letter.state == TypedState::Backtracked,
            miss: letter.miss,
            fix: letter.fix,
            stop: letter.is_spacer() && word.incorrect_word,
        }
    }

    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["letter"];
        let flags = [
            (self.active, "active"),
            (self.typed, "typed"),
            (self.correct, "correct"),
            (self.incorrect, "incorrect"),
            (self.backtrack, "backtrack"),
            (self.miss, "miss"),
            (self.fix, "fix"),
            (self.stop, "stop-on-word"),
        ];
        classes.extend(flags.iter().filter(|(on, _)| *on).map(|(_, name)| *name));
        classes
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordView {
    pub active: bool,
    pub completed: bool,
    pub retype: bool,
    pub incorrect_word: bool,
}

impl WordView {
    pub fn of(word: &Word, active: bool) -> Self {
        Self {
            active,
            completed: word.completed,
            retype: word.retype_armed,
            incorrect_word: word.incorrect_word,
        }
    }

    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["word"];
        if self.active {
            classes.push("active");
        }
        if self.completed {
            classes.push("completed");
        }
        if self.retype {
            classes.push("miss");
        }
        if self.incorrect_word {
            classes.push("incorrect-word");
        }
        classes
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderEvent {
    /// Buffer cleared and cursor back at the origin.
    Reset,
    WordsAppended {
        first_index: usize,
        count: usize,
    },
    ActiveMoved {
        from: Position,
        to: Position,
    },
    LetterChanged {
        at: Position,
        view: LetterView,
    },
    WordChanged {
        word_index: usize,
        view: WordView,
    },
    /// The sink should bring this word to the middle of the view if it sits
    /// at the leading visual edge of its layout.
    CenterOn {
        word_index: usize,
    },
    StatsUpdated(StatsSnapshot),
}

pub trait RenderSink {
    fn apply(&mut self, event: RenderEvent);
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn apply(&mut self, event: RenderEvent) {
        (**self).apply(event);
    }
}

/// Discards every event. For headless sessions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn apply(&mut self, _event: RenderEvent) {}
}

impl RenderSink for Vec<RenderEvent> {
    fn apply(&mut self, event: RenderEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incorrect_letter_view_has_miss_class() {
        let mut word = Word::new("ab");
        word.letters[0].state = TypedState::Incorrect;
        word.letters[0].miss = true;
        let view = LetterView::of(&word, &word.letters[0], true);
        assert_eq!(
            view.classes(),
            vec!["letter", "active", "typed", "incorrect", "miss"]
        );
    }

    #[test]
    fn corrected_letter_still_shows_miss() {
        let mut word = Word::new("ab");
        word.letters[0].state = TypedState::Correct;
        word.letters[0].miss = true;
        let view = LetterView::of(&word, &word.letters[0], false);
        assert!(view.correct && view.miss && !view.incorrect);
    }

    #[test]
    fn blocked_word_marks_its_spacer() {
        let mut word = Word::new("ab");
        word.incorrect_word = true;
        let spacer = LetterView::of(&word, &word.letters[2], false);
        assert!(spacer.stop);
        let first = LetterView::of(&word, &word.letters[0], false);
        assert!(!first.stop);
        assert!(WordView::of(&word, true).classes().contains(&"incorrect-word"));
    }

    #[test]
    fn armed_spacer_displays_retype_marker() {
        let mut word = Word::new("ab");
        word.retype_armed = true;
        let spacer = LetterView::of(&word, &word.letters[2], false);
        assert_eq!(spacer.display, crate::session::buffer::RETYPE_CHAR);
    }
}
