use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::generator::{SessionContext, WordSource};

struct Request {
    generation: u64,
    count: usize,
    context: SessionContext,
}

struct Batch {
    generation: u64,
    result: Result<Vec<String>, FetchError>,
}

/// Runs a word source on its own thread so slow fetches never stall typing.
/// Requests are served in submission order and their batches come back in
/// the same order through `poll_batches`.
pub struct BackgroundSource {
    requests: Sender<Request>,
    batches: Receiver<Batch>,
    generation: u64,
}

impl BackgroundSource {
    pub fn spawn<S>(mut inner: S) -> Self
    where
        S: WordSource + Send + 'static,
    {
        let (requests, request_rx) = mpsc::channel::<Request>();
        let (batch_tx, batches) = mpsc::channel();

        thread::spawn(move || {
            for request in request_rx {
                let result = inner.fetch_words(request.count, &request.context);
                if let Err(e) = &result {
                    warn!(error = %e, "error fetching words");
                }
                let batch = Batch {
                    generation: request.generation,
                    result,
                };
                if batch_tx.send(batch).is_err() {
                    return;
                }
            }
        });

        Self {
            requests,
            batches,
            generation: 0,
        }
    }
}

impl WordSource for BackgroundSource {
    /// Queues the request. The words arrive later through `poll_batches`.
    fn fetch_words(
        &mut self,
        count: usize,
        context: &SessionContext,
    ) -> Result<Vec<String>, FetchError> {
        self.requests
            .send(Request {
                generation: self.generation,
                count,
                context: context.clone(),
            })
            .map_err(|_| FetchError::WorkerGone)?;
        Ok(Vec::new())
    }

    fn poll_batches(&mut self) -> Vec<Result<Vec<String>, FetchError>> {
        let mut ready = Vec::new();
        while let Ok(batch) = self.batches.try_recv() {
            if batch.generation == self.generation {
                ready.push(batch.result);
            } else {
                debug!(generation = batch.generation, "dropping batch from a previous session");
            }
        }
        ready
    }

    fn discard_pending(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::*;

    /// Numbers its words and waits on a gate before answering.
    struct GatedSource {
        gate: Arc<Mutex<()>>,
        served: usize,
    }

    impl WordSource for GatedSource {
        fn fetch_words(
            &mut self,
            count: usize,
            _context: &SessionContext,
        ) -> Result<Vec<String>, FetchError> {
            let _open = self.gate.lock().unwrap();
            let words = (self.served..self.served + count)
                .map(|i| format!("w{i}"))
                .collect();
            self.served += count;
            Ok(words)
        }
    }

    fn gated() -> (BackgroundSource, Arc<Mutex<()>>) {
        let gate = Arc::new(Mutex::new(()));
        let source = BackgroundSource::spawn(GatedSource {
            gate: gate.clone(),
            served: 0,
        });
        (source, gate)
    }

    fn wait_for(source: &mut BackgroundSource, batches: usize) -> Vec<Vec<String>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut ready = Vec::new();
        while ready.len() < batches && Instant::now() < deadline {
            ready.extend(source.poll_batches().into_iter().map(Result::unwrap));
            thread::sleep(Duration::from_millis(5));
        }
        ready
    }

    #[test]
    fn fetch_returns_immediately_while_the_worker_is_busy() {
        let (mut source, gate) = gated();
        let held = gate.lock().unwrap();
        let context = SessionContext::default();

        let words = source.fetch_words(3, &context).unwrap();
        assert!(words.is_empty());
        assert!(source.poll_batches().is_empty());

        drop(held);
        let ready = wait_for(&mut source, 1);
        assert_eq!(ready, vec![vec!["w0", "w1", "w2"]]);
    }

    #[test]
    fn batches_arrive_in_request_order() {
        let (mut source, _gate) = gated();
        let context = SessionContext::default();
        source.fetch_words(2, &context).unwrap();
        source.fetch_words(1, &context).unwrap();
        source.fetch_words(2, &context).unwrap();

        let ready = wait_for(&mut source, 3);
        assert_eq!(
            ready,
            vec![vec!["w0", "w1"], vec!["w2"], vec!["w3", "w4"]]
        );
    }

    #[test]
    fn discarded_requests_never_deliver() {
        let (mut source, gate) = gated();
        let held = gate.lock().unwrap();
        let context = SessionContext::default();
        source.fetch_words(2, &context).unwrap();
        source.discard_pending();
        source.fetch_words(1, &context).unwrap();

        drop(held);
        let ready = wait_for(&mut source, 1);
        assert_eq!(ready, vec![vec!["w2"]]);
        thread::sleep(Duration::from_millis(20));
        assert!(source.poll_batches().is_empty());
    }
}
