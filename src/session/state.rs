use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::generator::dictionary::fits_length;
use crate::session::buffer::SessionBuffer;
use crate::session::cursor::CursorModel;

pub const INITIAL_WORD_COUNT: usize = 8;
pub const WORDS_PER_UPDATE: usize = 4;

/// Typing options. Changing any of them restarts the session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    #[serde(default)]
    pub force_retype: bool,
    #[serde(default)]
    pub stop_on_word: bool,
    /// Percent chance (0-100) that a fetched word is capitalized.
    #[serde(default)]
    pub capitalize_frequency: u32,
    /// Percent chance (0-100) that a fetched word is wrapped in a bracket or quote pair.
    #[serde(default)]
    pub surround_frequency: u32,
    /// Percent chance (0-100) that a fetched word gets trailing punctuation.
    #[serde(default)]
    pub punctuation_frequency: u32,
    /// Longest word a source should hand out. 0 means unlimited.
    #[serde(default)]
    pub max_word_length: usize,
}

impl EngineOptions {
    pub fn allows_word(&self, word: &str) -> bool {
        fits_length(word, self.max_word_length)
    }
}

/// How many words to load up front and per replenishment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferPolicy {
    pub initial_words: usize,
    /// Batch size and boundary: a batch is requested on reaching every word
    /// index that is a multiple of this.
    pub words_per_update: usize,
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self {
            initial_words: INITIAL_WORD_COUNT,
            words_per_update: WORDS_PER_UPDATE,
        }
    }
}

/// Everything one session mutates while handling keys.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub buffer: SessionBuffer,
    pub cursor: CursorModel,
    pub word_started_at: Option<Instant>,
    pub letter_started_at: Option<Instant>,
    /// Highest boundary word index that has already requested a batch.
    pub last_replenished: Option<usize>,
}

impl SessionState {
    pub fn new(now: Instant) -> Self {
        Self {
            buffer: SessionBuffer::new(),
            cursor: CursorModel::new(),
            word_started_at: Some(now),
            letter_started_at: Some(now),
            last_replenished: None,
        }
    }
}
