pub mod background;
pub mod capitalize;
pub mod dictionary;
pub mod local;
pub mod punctuate;
#[cfg(feature = "network")]
pub mod remote;

use rand::Rng;

use crate::error::FetchError;
use crate::session::state::EngineOptions;

/// Who is typing and with which options; passed along with every fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub options: EngineOptions,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            user_id: "default".to_string(),
            options: EngineOptions::default(),
        }
    }
}

pub trait WordSource {
    /// Produce up to `count` words in typing order. Sources that fetch in
    /// the background return nothing here and deliver via `poll_batches`.
    fn fetch_words(&mut self, count: usize, context: &SessionContext)
    -> Result<Vec<String>, FetchError>;

    /// Batches finished since the last call, oldest first.
    fn poll_batches(&mut self) -> Vec<Result<Vec<String>, FetchError>> {
        Vec::new()
    }

    /// Forget requests still in flight. Their batches are never delivered.
    fn discard_pending(&mut self) {}
}

impl<T: WordSource + ?Sized> WordSource for Box<T> {
    fn fetch_words(
        &mut self,
        count: usize,
        context: &SessionContext,
    ) -> Result<Vec<String>, FetchError> {
        (**self).fetch_words(count, context)
    }

    fn poll_batches(&mut self) -> Vec<Result<Vec<String>, FetchError>> {
        (**self).poll_batches()
    }

    fn discard_pending(&mut self) {
        (**self).discard_pending()
    }
}

/// Apply the option-driven post-processing to a plain word.
pub fn decorate_word<R: Rng>(word: &str, options: &EngineOptions, rng: &mut R) -> String {
    let word = capitalize::apply_capitalization(word, options.capitalize_frequency, rng);
    let word = punctuate::apply_surround(&word, options.surround_frequency, rng);
    punctuate::apply_punctuation(&word, options.punctuation_frequency, rng)
}
