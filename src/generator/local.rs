use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::engine::SharedStats;
use crate::engine::selection::select_words;
use crate::error::FetchError;
use crate::generator::dictionary::Dictionary;
use crate::generator::{SessionContext, WordSource, decorate_word};

/// Offline word source: adaptive selection over the embedded dictionary.
pub struct LocalWordSource {
    dictionary: Dictionary,
    stats: SharedStats,
    rng: SmallRng,
}

impl LocalWordSource {
    pub fn new(dictionary: Dictionary, stats: SharedStats) -> Self {
        Self {
            dictionary,
            stats,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(dictionary: Dictionary, stats: SharedStats, seed: u64) -> Self {
        Self {
            dictionary,
            stats,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl WordSource for LocalWordSource {
    fn fetch_words(
        &mut self,
        count: usize,
        context: &SessionContext,
    ) -> Result<Vec<String>, FetchError> {
        if self.dictionary.is_empty() {
            return Err(FetchError::Unavailable("dictionary is empty".to_string()));
        }
        let mut book = self
            .stats
            .try_borrow_mut()
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;
        let options = &context.options;
        let words = select_words(
            &mut book,
            &self.dictionary,
            count,
            options.max_word_length,
            &mut self.rng,
        );
        Ok(words
            .iter()
            .map(|w| decorate_word(w, options, &mut self.rng))
            .collect())
    }
}
