use thiserror::Error;

/// A word source could not produce a batch. The buffer is left untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("word source unavailable: {0}")]
    Unavailable(String),
    #[error("word request failed: {0}")]
    Transport(String),
    #[error("could not decode word batch: {0}")]
    Decode(String),
    #[error("word fetch worker has shut down")]
    WorkerGone,
}

/// A completed-word report or stats refresh was lost. Never retried.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("progress sink rejected report: {0}")]
    Rejected(String),
    #[error("report request failed: {0}")]
    Transport(String),
    #[error("report worker has shut down")]
    WorkerGone,
}

/// Diagnostics surfaced by a typing session. None of these abort the session.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("cannot advance past word {word_index}: buffer exhausted")]
    StructuralUnderrun { word_index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underrun_message_names_the_word() {
        let err = EngineError::StructuralUnderrun { word_index: 7 };
        assert!(err.to_string().contains("word 7"));
    }

    #[test]
    fn fetch_error_converts_transparently() {
        let err: EngineError = FetchError::Transport("timed out".into()).into();
        assert_eq!(err.to_string(), "word request failed: timed out");
    }
}
