use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FetchError, ReportError};
use crate::generator::{SessionContext, WordSource, decorate_word};
use crate::session::report::ProgressReporter;
use crate::session::result::{CompletedWord, StatsSnapshot};
use crate::session::state::EngineOptions;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct LetterData {
    letter: String,
    duration: u64,
    miss: bool,
}

#[derive(Debug, Serialize)]
struct CompletedWordData {
    word_count: usize,
    duration: u64,
    word_letters_data: Vec<LetterData>,
}

impl From<&CompletedWord> for CompletedWordData {
    fn from(word: &CompletedWord) -> Self {
        Self {
            word_count: word.word_index,
            duration: word.total_duration_ms,
            word_letters_data: word
                .letters
                .iter()
                .map(|l| LetterData {
                    letter: l.ch.to_string(),
                    duration: l.duration_ms,
                    miss: l.ever_missed,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatsData {
    wpm: String,
}

impl StatsData {
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            wpm: self.wpm.trim().parse().unwrap_or(0.0),
        }
    }
}

/// Word service client. Serves as both word source and progress sink.
/// The service hands out plain words; length limits and decoration are
/// applied here.
pub struct HttpBackend {
    base_url: String,
    user_id: String,
    client: reqwest::blocking::Client,
    rng: SmallRng,
}

impl HttpBackend {
    pub fn new(base_url: &str, user_id: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            client,
            rng: SmallRng::from_entropy(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{route}", self.base_url)
    }

    fn shape(&mut self, words: Vec<String>, options: &EngineOptions) -> Vec<String> {
        let received = words.len();
        let shaped: Vec<String> = words
            .iter()
            .filter(|w| options.allows_word(w))
            .map(|w| decorate_word(w, options, &mut self.rng))
            .collect();
        if shaped.len() < received {
            debug!(
                received,
                kept = shaped.len(),
                max = options.max_word_length,
                "dropped words over the length limit"
            );
        }
        shaped
    }
}

impl WordSource for HttpBackend {
    fn fetch_words(
        &mut self,
        count: usize,
        context: &SessionContext,
    ) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(self.url("words"))
            .query(&[("n", count.to_string()), ("user_id", context.user_id.clone())])
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "words request returned {}",
                response.status()
            )));
        }
        let words = response
            .json::<Vec<String>>()
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(self.shape(words, &context.options))
    }
}

impl ProgressReporter for HttpBackend {
    fn report_word_completed(&mut self, word: &CompletedWord) -> Result<(), ReportError> {
        let response = self
            .client
            .post(self.url("word/completed"))
            .query(&[("user_id", self.user_id.as_str())])
            .json(&CompletedWordData::from(word))
            .send()
            .map_err(|e| ReportError::Transport(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReportError::Rejected(response.status().to_string()))
        }
    }

    fn refresh_stats(&mut self) -> Result<StatsSnapshot, ReportError> {
        let response = self
            .client
            .get(self.url("stats"))
            .send()
            .map_err(|e| ReportError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ReportError::Rejected(response.status().to_string()));
        }
        let stats: StatsData = response
            .json()
            .map_err(|e| ReportError::Transport(e.to_string()))?;
        Ok(stats.snapshot())
    }
}
