use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::warn;

use crate::engine::SharedStats;
use crate::error::ReportError;
use crate::session::result::{CompletedWord, StatsSnapshot};

/// Receives finished words. Calls are fire-and-forget from the session's
/// point of view: failures are logged and dropped.
pub trait ProgressReporter {
    fn report_word_completed(&mut self, word: &CompletedWord) -> Result<(), ReportError>;

    fn refresh_stats(&mut self) -> Result<StatsSnapshot, ReportError>;
}

impl<T: ProgressReporter + ?Sized> ProgressReporter for Box<T> {
    fn report_word_completed(&mut self, word: &CompletedWord) -> Result<(), ReportError> {
        (**self).report_word_completed(word)
    }

    fn refresh_stats(&mut self) -> Result<StatsSnapshot, ReportError> {
        (**self).refresh_stats()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report_word_completed(&mut self, _word: &CompletedWord) -> Result<(), ReportError> {
        Ok(())
    }

    fn refresh_stats(&mut self) -> Result<StatsSnapshot, ReportError> {
        Ok(StatsSnapshot::default())
    }
}

/// Feeds completed words into the in-process letter statistics.
pub struct LocalStatsReporter {
    stats: SharedStats,
}

impl LocalStatsReporter {
    pub fn new(stats: SharedStats) -> Self {
        Self { stats }
    }
}

impl ProgressReporter for LocalStatsReporter {
    fn report_word_completed(&mut self, word: &CompletedWord) -> Result<(), ReportError> {
        let mut book = self
            .stats
            .try_borrow_mut()
            .map_err(|e| ReportError::Rejected(e.to_string()))?;
        book.record(word);
        Ok(())
    }

    fn refresh_stats(&mut self) -> Result<StatsSnapshot, ReportError> {
        let book = self
            .stats
            .try_borrow()
            .map_err(|e| ReportError::Rejected(e.to_string()))?;
        Ok(StatsSnapshot { wpm: book.wpm() })
    }
}

enum Job {
    Report(CompletedWord),
    Refresh,
}

/// Runs a reporter on its own thread so slow sinks never stall typing.
/// Jobs are handled strictly in submission order.
pub struct BackgroundReporter {
    jobs: Sender<Job>,
    snapshots: Receiver<StatsSnapshot>,
    latest: StatsSnapshot,
}

impl BackgroundReporter {
    pub fn spawn<R>(mut inner: R) -> Self
    where
        R: ProgressReporter + Send + 'static,
    {
        let (jobs, job_rx) = mpsc::channel::<Job>();
        let (snapshot_tx, snapshots) = mpsc::channel();

        thread::spawn(move || {
            for job in job_rx {
                match job {
                    Job::Report(word) => {
                        if let Err(e) = inner.report_word_completed(&word) {
                            warn!(word = word.word_index, error = %e, "failed to send word completed update");
                        }
                    }
                    Job::Refresh => match inner.refresh_stats() {
                        Ok(snapshot) => {
                            if snapshot_tx.send(snapshot).is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!(error = %e, "could not update stats"),
                    },
                }
            }
        });

        Self {
            jobs,
            snapshots,
            latest: StatsSnapshot::default(),
        }
    }
}

impl ProgressReporter for BackgroundReporter {
    fn report_word_completed(&mut self, word: &CompletedWord) -> Result<(), ReportError> {
        self.jobs
            .send(Job::Report(word.clone()))
            .map_err(|_| ReportError::WorkerGone)
    }

    /// Queues a refresh and returns the newest snapshot received so far.
    fn refresh_stats(&mut self) -> Result<StatsSnapshot, ReportError> {
        self.jobs
            .send(Job::Refresh)
            .map_err(|_| ReportError::WorkerGone)?;
        while let Ok(snapshot) = self.snapshots.try_recv() {
            self.latest = snapshot;
        }
        Ok(self.latest.clone())
    }
}
