// src/scan/interrupt.rs
// =============================================================================
// This module turns Ctrl-C (and SIGTERM on Unix) into a scan cancellation.
//
// What happens on a signal:
// 1. Print "Exit" through the Reporter (same lock as every other line, so
//    it never lands in the middle of a worker's output)
// 2. Cancel the scan token: the input stops feeding the queue, workers stop
//    taking targets, and the pool abandons whatever is still in flight
//
// It only fires once. After the first signal the process is already on its
// way out.
//
// Rust concepts:
// - #[cfg(unix)]: code that only compiles on Unix-like systems
// - AtomicBool::swap: "set to true and tell me what it was before" in one step
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::report::Reporter;

pub struct InterruptController {
    reporter: Arc<Reporter>,
    cancel: CancellationToken,
    fired: AtomicBool,
}

impl InterruptController {
    pub fn new(reporter: Arc<Reporter>, cancel: CancellationToken) -> Self {
        Self {
            reporter,
            cancel,
            fired: AtomicBool::new(false),
        }
    }

    // Starts listening for signals in the background
    pub fn listen(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            match wait_for_signal().await {
                Ok(()) => {
                    info!("termination requested");
                    self.trigger();
                }
                Err(e) => warn!("cannot listen for termination signals: {}", e),
            }
        })
    }

    // Prints "Exit" and cancels the scan
    //
    // Returns: false if it had already fired
    pub fn trigger(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }

        self.reporter.exit();
        self.cancel.cancel();
        true
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
