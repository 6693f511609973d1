pub const SPACER_CHAR: char = '\u{00a0}';
pub const RETYPE_CHAR: char = '\u{21b0}'; // ↰

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypedState {
    #[default]
    Untyped,
    Correct,
    Incorrect,
    Backtracked,
}

#[derive(Clone, Debug)]
pub struct Letter {
    pub expected: char,
    pub state: TypedState,
    pub duration_ms: u64,
    /// Set the first time this slot is mistyped and never cleared afterwards.
    pub miss: bool,
    pub fix: bool,
    spacer: bool,
}

impl Letter {
    fn new(expected: char) -> Self {
        Self {
            expected,
            state: TypedState::Untyped,
            duration_ms: 0,
            miss: false,
            fix: false,
            spacer: false,
        }
    }

    fn spacer() -> Self {
        Self {
            spacer: true,
            ..Self::new(SPACER_CHAR)
        }
    }

    /// True only for the slot `Word::new` appends after the text.
    pub fn is_spacer(&self) -> bool {
        self.spacer
    }

    pub fn is_incorrect(&self) -> bool {
        self.state == TypedState::Incorrect
    }

    pub fn clear_typed(&mut self) {
        self.state = TypedState::Untyped;
    }

    /// Whether `ch` satisfies this slot. Spacers take either a plain space or
    /// the literal non-breaking space.
    pub fn accepts(&self, ch: char) -> bool {
        if self.is_spacer() {
            ch == ' ' || ch == SPACER_CHAR
        } else {
            ch == self.expected
        }
    }
}

#[derive(Clone, Debug)]
pub struct Word {
    pub text: String,
    /// Typed letters followed by exactly one spacer.
    pub letters: Vec<Letter>,
    pub completed: bool,
    pub miss: bool,
    pub retype_armed: bool,
    pub incorrect_word: bool,
}

impl Word {
    pub fn new(text: &str) -> Self {
        let mut letters: Vec<Letter> = text.chars().map(Letter::new).collect();
        letters.push(Letter::spacer());
        Self {
            text: text.to_string(),
            letters,
            completed: false,
            miss: false,
            retype_armed: false,
            incorrect_word: false,
        }
    }

    /// Number of slots including the trailing spacer.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.letters.len() - 1
    }

    /// Character shown in the spacer slot.
    pub fn spacer_display(&self) -> char {
        if self.retype_armed {
            RETYPE_CHAR
        } else {
            SPACER_CHAR
        }
    }

    pub fn has_incorrect_letter(&self) -> bool {
        self.letters.iter().any(Letter::is_incorrect)
    }

    pub fn clear_fix_marks(&mut self) {
        for letter in &mut self.letters {
            letter.fix = false;
        }
    }

    pub fn mark_incorrect_for_fix(&mut self) -> usize {
        let mut marked = 0;
        for letter in self.letters.iter_mut().filter(|l| l.is_incorrect()) {
            letter.fix = true;
            marked += 1;
        }
        marked
    }

    /// Rewind for a full retype. Sticky miss flags survive.
    pub fn reset_for_retype(&mut self) {
        for letter in &mut self.letters {
            letter.clear_typed();
        }
        self.retype_armed = false;
    }
}

/// Append-only sequence of words typed against during one session.
#[derive(Clone, Debug, Default)]
pub struct SessionBuffer {
    words: Vec<Word>,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_words<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.words.len();
        self.words.extend(
            words
                .into_iter()
                .filter(|w| !w.as_ref().is_empty())
                .map(|w| Word::new(w.as_ref())),
        );
        self.words.len() - before
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn word_mut(&mut self, index: usize) -> Option<&mut Word> {
        self.words.get_mut(index)
    }

    pub fn letter(&self, word_index: usize, letter_index: usize) -> Option<&Letter> {
        self.words.get(word_index)?.letters.get(letter_index)
    }

    pub fn letter_mut(&mut self, word_index: usize, letter_index: usize) -> Option<&mut Letter> {
        self.words.get_mut(word_index)?.letters.get_mut(letter_index)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}
