use crate::session::buffer::SessionBuffer;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub word: usize,
    pub letter: usize,
}

/// Where the user is typing, plus the watermarks that separate first-time
/// progress from review of text already visited.
#[derive(Clone, Debug, Default)]
pub struct CursorModel {
    pub word_index: usize,
    pub letter_index: usize,
    /// Absolute letter counter for the current position.
    pub live: usize,
    /// Furthest absolute position ever reached. Never decreases.
    pub max_cursor: usize,
    /// Highest word index ever reached. Never decreases.
    pub max_word: usize,
}

impl CursorModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        Position {
            word: self.word_index,
            letter: self.letter_index,
        }
    }

    pub fn at_leading_edge(&self) -> bool {
        self.live == self.max_cursor
    }

    /// Step to the next letter, rolling into the next word. Returns `false`
    /// without moving when there is no next word yet.
    pub fn advance(&mut self, buffer: &SessionBuffer) -> bool {
        let Some(word) = buffer.word(self.word_index) else {
            return false;
        };
        if self.letter_index + 1 < word.len() {
            self.letter_index += 1;
            return true;
        }
        if self.word_index + 1 >= buffer.len() {
            return false;
        }
        self.word_index += 1;
        self.letter_index = 0;
        true
    }

    /// Step back one letter, rolling into the previous word's last slot.
    /// Clamped at the very first letter.
    pub fn retreat(&mut self, buffer: &SessionBuffer) -> bool {
        if self.letter_index > 0 {
            self.letter_index -= 1;
            return true;
        }
        if self.word_index == 0 {
            return false;
        }
        let Some(previous) = buffer.word(self.word_index - 1) else {
            return false;
        };
        self.word_index -= 1;
        self.letter_index = previous.last_index();
        true
    }

    pub fn record_visit(&mut self, cursor_absolute: usize) {
        if cursor_absolute == self.max_cursor {
            self.max_cursor += 1;
        }
        self.max_word = self.max_word.max(self.word_index);
    }

    pub fn is_last_letter(&self, buffer: &SessionBuffer) -> bool {
        buffer
            .word(self.word_index)
            .is_some_and(|w| self.letter_index == w.last_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(words: &[&str]) -> SessionBuffer {
        let mut buffer = SessionBuffer::new();
        buffer.push_words(words.iter().copied());
        buffer
    }

    #[test]
    fn advance_rolls_into_next_word() {
        let buf = buffer(&["ab", "c"]);
        let mut cursor = CursorModel::new();
        assert!(cursor.advance(&buf));
        assert!(cursor.advance(&buf)); // spacer of "ab"
        assert_eq!(cursor.position(), Position { word: 0, letter: 2 });
        assert!(cursor.advance(&buf));
        assert_eq!(cursor.position(), Position { word: 1, letter: 0 });
    }

    #[test]
    fn advance_past_tail_is_a_no_op() {
        let buf = buffer(&["a"]);
        let mut cursor = CursorModel::new();
        assert!(cursor.advance(&buf));
        assert!(!cursor.advance(&buf));
        assert_eq!(cursor.position(), Position { word: 0, letter: 1 });
    }

    #[test]
    fn retreat_rolls_into_previous_spacer() {
        let buf = buffer(&["ab", "c"]);
        let mut cursor = CursorModel {
            word_index: 1,
            ..CursorModel::default()
        };
        assert!(cursor.retreat(&buf));
        assert_eq!(cursor.position(), Position { word: 0, letter: 2 });
    }

    #[test]
    fn retreat_clamps_at_origin() {
        let buf = buffer(&["ab"]);
        let mut cursor = CursorModel::new();
        assert!(!cursor.retreat(&buf));
        assert_eq!(cursor.position(), Position::default());
    }

    #[test]
    fn record_visit_only_counts_leading_edge() {
        let mut cursor = CursorModel::new();
        cursor.record_visit(0);
        assert_eq!(cursor.max_cursor, 1);
        // Replaying an earlier position leaves the watermark alone.
        cursor.record_visit(0);
        assert_eq!(cursor.max_cursor, 1);
        cursor.word_index = 3;
        cursor.record_visit(0);
        assert_eq!(cursor.max_word, 3);
        cursor.word_index = 1;
        cursor.record_visit(1);
        assert_eq!(cursor.max_word, 3);
        assert_eq!(cursor.max_cursor, 2);
    }
}
