// src/scan/mod.rs
// =============================================================================
// This module runs a whole scan: input file -> queue -> workers -> reporter.
//
// Submodules:
// - queue: Reads target lines and pushes them into the work queue
// - pool: The fixed-size set of workers that probe targets
// - interrupt: Turns Ctrl-C / SIGTERM into a cancellation
//
// The pieces talk to each other through three shared things:
// - a bounded mpsc channel (the queue)
// - an Arc<Reporter> (the one place output goes)
// - a CancellationToken (the "stop now" flag)
// =============================================================================

mod interrupt;
mod pool;
mod queue;

pub use interrupt::InterruptController;

use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ScanError;
use crate::probe::Probe;
use crate::report::{Reporter, ScanSummary};
use pool::{PoolExit, WorkerPool};

// Upper bound for --threads. Every worker is a task plus a queue slot, and
// tokio's channel refuses capacities beyond Semaphore::MAX_PERMITS anyway.
pub const MAX_THREADS: i64 = 100_000;

// Validated scan settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub threads: usize,
}

impl ScanConfig {
    // Checks the raw values from the command line
    //
    // The thread count comes in signed so "-t 0" and "-t -5" are reported
    // as what they are instead of being clamped. Absurdly large counts are
    // rejected here too, before the output file is touched.
    pub fn new(input: PathBuf, output: PathBuf, threads: i64) -> Result<Self, ScanError> {
        if !(1..=MAX_THREADS).contains(&threads) {
            return Err(ScanError::InvalidThreads(threads));
        }
        let threads = usize::try_from(threads).map_err(|_| ScanError::InvalidThreads(threads))?;

        Ok(Self {
            input,
            output,
            threads,
        })
    }

    // Opens the URL list for line-by-line reading
    pub async fn open_input(&self) -> Result<BufReader<tokio::fs::File>, ScanError> {
        let file = tokio::fs::File::open(&self.input)
            .await
            .map_err(|source| ScanError::OpenInput {
                path: self.input.clone(),
                source,
            })?;
        Ok(BufReader::new(file))
    }

    // Creates (or truncates) the output file
    pub fn create_output(&self) -> Result<std::fs::File, ScanError> {
        std::fs::File::create(&self.output).map_err(|source| ScanError::CreateOutput {
            path: self.output.clone(),
            source,
        })
    }
}

pub struct Scanner<P> {
    prober: Arc<P>,
    reporter: Arc<Reporter>,
    threads: usize,
}

impl<P: Probe> Scanner<P> {
    pub fn new(prober: P, reporter: Arc<Reporter>, threads: usize) -> Self {
        Self {
            prober: Arc::new(prober),
            reporter,
            threads,
        }
    }

    // Scans every line of `input`
    //
    // Returns once the input is exhausted and all workers are done, or as
    // soon as `cancel` fires. In the second case probes still in flight
    // are abandoned and `interrupted` is set in the summary.
    pub async fn run<R>(&self, input: R, cancel: CancellationToken) -> ScanSummary
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        // Queue holds one target per worker, so the reader never runs far
        // ahead of the probes
        let (tx, rx) = mpsc::channel(self.threads);

        let producer = tokio::spawn(queue::feed(input, tx, cancel.clone()));
        let pool = WorkerPool::spawn(
            self.threads,
            rx,
            Arc::clone(&self.prober),
            Arc::clone(&self.reporter),
            cancel.clone(),
        );

        let exit = pool.join(&cancel).await;

        match exit {
            PoolExit::Interrupted { .. } => producer.abort(),
            PoolExit::Drained { .. } => match producer.await {
                Ok(Ok(queued)) => info!("input exhausted after {} targets", queued),
                // Read errors only show up once everything already queued
                // has been probed
                Ok(Err(e)) => self.reporter.problem(&format!("Error reading input: {}", e)),
                Err(e) => warn!("input task failed: {}", e),
            },
        }

        let mut summary = self.reporter.summary();
        summary.targets = exit.dequeued();
        summary.interrupted = matches!(exit, PoolExit::Interrupted { .. });
        summary
    }
}
