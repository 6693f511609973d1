pub mod buffer;
pub mod cursor;
pub mod input;
pub mod render;
pub mod replenish;
pub mod report;
pub mod result;
pub mod state;

use std::time::Instant;

use tracing::{info, warn};

use crate::error::{EngineError, FetchError};
use crate::generator::{SessionContext, WordSource};
use input::{Key, KeyOutcome};
use render::{RenderEvent, RenderSink};
use report::ProgressReporter;
use result::StatsSnapshot;
use state::{BufferPolicy, EngineOptions, SessionState};

/// One typing session: the state machine plus the collaborators it drives.
pub struct TypingSession<S, R, K> {
    state: SessionState,
    context: SessionContext,
    policy: BufferPolicy,
    source: S,
    reporter: R,
    sink: K,
    stats: StatsSnapshot,
}

impl<S, R, K> TypingSession<S, R, K>
where
    S: WordSource,
    R: ProgressReporter,
    K: RenderSink,
{
    /// Build a session and load its first batch of words.
    pub fn new(
        source: S,
        reporter: R,
        sink: K,
        context: SessionContext,
        policy: BufferPolicy,
    ) -> Self {
        let now = Instant::now();
        let mut session = Self {
            state: SessionState::new(now),
            context,
            policy,
            source,
            reporter,
            sink,
            stats: StatsSnapshot::default(),
        };
        session.reset_at(now);
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.context.options
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Apply new options. Any change starts the session over.
    pub fn set_options(&mut self, options: EngineOptions) {
        if options == self.context.options {
            return;
        }
        self.context.options = options;
        self.reset_at(Instant::now());
    }

    pub fn reset(&mut self) -> Vec<EngineError> {
        self.reset_at(Instant::now())
    }

    pub fn reset_at(&mut self, now: Instant) -> Vec<EngineError> {
        let mut diagnostics: Vec<EngineError> = Vec::new();
        self.state = SessionState::new(now);
        self.sink.apply(RenderEvent::Reset);
        info!(user = %self.context.user_id, "session reset");
        self.source.discard_pending();

        if let Err(e) = self.append_words(self.policy.initial_words) {
            diagnostics.push(e.into());
        }
        self.replenish_if_needed(None, &mut diagnostics);
        diagnostics
    }

    pub fn handle_key(&mut self, key: Key) -> Vec<EngineError> {
        self.handle_key_at(key, Instant::now())
    }

    /// Run one key event to completion. Returned diagnostics have already
    /// been logged; the session stays usable regardless.
    pub fn handle_key_at(&mut self, key: Key, now: Instant) -> Vec<EngineError> {
        let mut diagnostics = self.poll_source();
        let outcome = input::process_key(&mut self.state, &self.context.options, key, now);
        if outcome.reset_requested {
            diagnostics.extend(self.reset_at(now));
            return diagnostics;
        }

        self.apply_outcome(outcome, &mut diagnostics);
        self.replenish_if_needed(Some(key), &mut diagnostics);
        diagnostics
    }

    fn apply_outcome(&mut self, outcome: KeyOutcome, diagnostics: &mut Vec<EngineError>) {
        let KeyOutcome {
            completed,
            underrun,
            render,
            ..
        } = outcome;

        for event in render {
            self.sink.apply(event);
        }

        if let Some(word_index) = underrun {
            diagnostics.push(EngineError::StructuralUnderrun { word_index });
        }

        let Some(word) = completed else {
            return;
        };
        info!(
            word = word.word_index,
            text = %word.text,
            duration_ms = word.total_duration_ms,
            "word completed"
        );
        if let Err(e) = self.reporter.report_word_completed(&word) {
            warn!(word = word.word_index, error = %e, "failed to send word completed update");
            diagnostics.push(e.into());
            return;
        }
        match self.reporter.refresh_stats() {
            Ok(snapshot) => {
                self.stats = snapshot.clone();
                self.sink.apply(RenderEvent::StatsUpdated(snapshot));
            }
            Err(e) => {
                warn!(error = %e, "could not update stats");
                diagnostics.push(e.into());
            }
        }
    }

    fn replenish_if_needed(&mut self, key: Option<Key>, diagnostics: &mut Vec<EngineError>) {
        if !replenish::should_replenish(&self.state, &self.policy, key) {
            return;
        }
        replenish::mark_replenished(&mut self.state);
        if let Err(e) = self.append_words(self.policy.words_per_update) {
            diagnostics.push(e.into());
        }
    }

    /// Append batches a background source has finished since the last
    /// event. Called before every key and on idle ticks.
    pub fn poll_source(&mut self) -> Vec<EngineError> {
        let mut diagnostics: Vec<EngineError> = Vec::new();
        for batch in self.source.poll_batches() {
            match batch {
                Ok(words) => {
                    self.push_batch(&words);
                }
                Err(e) => {
                    warn!(error = %e, "error fetching words");
                    diagnostics.push(e.into());
                }
            }
        }
        diagnostics
    }

    fn append_words(&mut self, count: usize) -> Result<usize, FetchError> {
        let words = match self.source.fetch_words(count, &self.context) {
            Ok(words) => words,
            Err(e) => {
                warn!(error = %e, "error fetching words");
                return Err(e);
            }
        };
        Ok(self.push_batch(&words))
    }

    fn push_batch(&mut self, words: &[String]) -> usize {
        let first_index = self.state.buffer.len();
        let added = self.state.buffer.push_words(words);
        if added > 0 {
            info!(added, total = self.state.buffer.len(), "added new words");
            self.sink.apply(RenderEvent::WordsAppended {
                first_index,
                count: added,
            });
        }
        added
    }
}
