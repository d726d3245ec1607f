// src/scan/pool.rs
// =============================================================================
// This module runs the fixed-size pool of workers.
//
// How it works:
// - `threads` workers are spawned up front, no more and no fewer
// - They share one queue. Whoever is free takes the next target
// - A worker normalizes the target, probes each candidate URL in turn and
//   hands every result to the Reporter
// - A worker stops when the queue is closed and empty, or when the scan is
//   cancelled
//
// The worker count is the only limit on how many probes run at once:
// N workers = at most N requests in flight.
//
// Shutdown is best-effort. On cancel, workers stop taking new targets and
// the pool aborts whatever is still in flight. Those probes are never
// reported.
//
// Rust concepts:
// - Arc: shared ownership between tasks (queue, prober, reporter)
// - tokio::sync::Mutex: an async lock we can hold across `.await`
// - JoinHandle: a handle to wait for (or abort) a spawned task
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::probe::{self, Probe};
use crate::report::Reporter;

// How the pool stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolExit {
    /// The queue was closed and every worker finished
    Drained { dequeued: usize },
    /// The scan was cancelled, in-flight work was abandoned
    Interrupted { dequeued: usize },
}

impl PoolExit {
    pub fn dequeued(&self) -> usize {
        match self {
            PoolExit::Drained { dequeued } | PoolExit::Interrupted { dequeued } => *dequeued,
        }
    }
}

pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
    dequeued: Arc<AtomicUsize>,
}

// Everything one worker needs, cloned per worker
struct Worker<P> {
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<String>>>,
    prober: Arc<P>,
    reporter: Arc<Reporter>,
    cancel: CancellationToken,
    dequeued: Arc<AtomicUsize>,
}

impl WorkerPool {
    // Starts `threads` workers on the current tokio runtime
    //
    // `threads` has already been checked to be at least 1 (see ScanConfig)
    pub fn spawn<P: Probe>(
        threads: usize,
        queue: mpsc::Receiver<String>,
        prober: Arc<P>,
        reporter: Arc<Reporter>,
        cancel: CancellationToken,
    ) -> Self {
        let queue = Arc::new(Mutex::new(queue));
        let dequeued = Arc::new(AtomicUsize::new(0));

        let workers = (0..threads)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: Arc::clone(&queue),
                    prober: Arc::clone(&prober),
                    reporter: Arc::clone(&reporter),
                    cancel: cancel.clone(),
                    dequeued: Arc::clone(&dequeued),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Self { workers, dequeued }
    }

    // Waits for every worker, or for cancellation
    //
    // On cancellation the remaining workers are aborted right away, so a
    // probe stuck on a slow server doesn't hold up the exit.
    pub async fn join(mut self, cancel: &CancellationToken) -> PoolExit {
        let drained = tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            results = join_all(self.workers.iter_mut()) => {
                for result in results {
                    if let Err(e) = result {
                        warn!("worker task failed: {}", e);
                    }
                }
                true
            }
        };

        let dequeued = self.dequeued.load(Ordering::SeqCst);
        if drained {
            PoolExit::Drained { dequeued }
        } else {
            for worker in &self.workers {
                worker.abort();
            }
            PoolExit::Interrupted { dequeued }
        }
    }
}

impl<P: Probe> Worker<P> {
    async fn run(self) {
        while let Some(target) = self.next_target().await {
            self.dequeued.fetch_add(1, Ordering::SeqCst);
            check_target(self.prober.as_ref(), &self.reporter, &target).await;
        }
        debug!("worker {} stopped", self.id);
    }

    // Takes the next target, or None when there's nothing left / we're
    // cancelled. Cancellation is checked first so no new target is taken
    // once the scan is stopping.
    async fn next_target(&self) -> Option<String> {
        let mut queue = self.queue.lock().await;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            target = queue.recv() => target,
        }
    }
}

// Probes every candidate URL of one target and reports each result
//
// Returns: how many candidates were actually probed
//
// A malformed candidate ends the whole target: the sibling scheme is not
// tried. An unreachable candidate just moves on to the next one.
pub async fn check_target<P: Probe>(prober: &P, reporter: &Reporter, target: &str) -> usize {
    let mut probed = 0;

    for candidate in probe::candidates(target) {
        let result = prober.probe(&candidate).await;
        probed += 1;
        reporter.record(&candidate, result);

        // TODO: decide whether a malformed http:// candidate should still
        // let the https:// sibling be tried (`continue` instead of `break`)
        if result.is_malformed() {
            break;
        }
    }

    probed
}
