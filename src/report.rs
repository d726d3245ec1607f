// src/report.rs
// =============================================================================
// This module owns everything the scan prints or writes.
//
// Many workers finish probes at the same time. If each one wrote to the
// terminal and the output file on its own, lines could get mixed up, or a
// status line could end up separated from its output-file line by another
// worker's output. So there is exactly ONE lock, and it covers:
//   - the console (status lines)
//   - the output file (URLs that answered 200)
//   - the running counters for the final summary
//
// Every call into the Reporter takes that lock once, does all its writing,
// and lets go.
//
// Rust concepts:
// - Mutex: only one thread inside at a time
// - Box<dyn Write + Send>: "any writer that can move between threads",
//   so tests can capture output in memory instead of a real terminal/file
// - serde: the summary can be printed as JSON
// =============================================================================

use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::sync::{Mutex, MutexGuard};

use colored::Colorize;
use log::warn;
use serde::Serialize;

use crate::probe::{Outcome, ProbeResult};

// Totals collected over a whole scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Target lines taken off the queue by a worker
    pub targets: usize,
    /// Candidates that answered 200 (= lines written to the output file)
    pub success: usize,
    /// Candidates that answered with any other status
    pub failed: usize,
    /// Candidates we couldn't connect to at all
    pub unreachable: usize,
    /// Candidates that weren't valid URLs
    pub malformed: usize,
    /// Successful candidates we failed to write to the output file
    pub write_errors: usize,
    /// True if Ctrl-C / SIGTERM cut the scan short
    pub interrupted: bool,
}

struct Outputs {
    console: Box<dyn Write + Send>,
    sink: Box<dyn Write + Send>,
    summary: ScanSummary,
}

pub struct Reporter {
    outputs: Mutex<Outputs>,
}

impl Reporter {
    pub fn new<C, S>(console: C, sink: S) -> Self
    where
        C: Write + Send + 'static,
        S: Write + Send + 'static,
    {
        Self {
            outputs: Mutex::new(Outputs {
                console: Box::new(console),
                sink: Box::new(sink),
                summary: ScanSummary::default(),
            }),
        }
    }

    // Status lines to stdout, URLs to the given file
    //
    // LineWriter flushes at every '\n', so each URL reaches the file as
    // one complete line even if the process is killed mid-scan.
    pub fn to_stdout(sink: File) -> Self {
        Self::new(io::stdout(), LineWriter::new(sink))
    }

    // Reports one probe result, and saves the URL if it answered 200
    //
    // The status line and the file line are written under the same lock,
    // so nothing from another worker can land between them.
    pub fn record(&self, candidate: &str, result: ProbeResult) {
        let mut out = self.lock();

        match result {
            ProbeResult::Malformed => {
                out.summary.malformed += 1;
                out.say(format!("Malformed URL: {}", candidate).yellow());
            }
            ProbeResult::Unreachable => {
                out.summary.unreachable += 1;
                out.say(format!("Cannot access {}", candidate).red());
            }
            ProbeResult::Reached(code) => match result.outcome() {
                Outcome::Success => {
                    out.summary.success += 1;
                    out.say(format!("URL: {} Status Code: {}", candidate, code).green());

                    if let Err(e) = writeln!(out.sink, "{}", candidate) {
                        out.summary.write_errors += 1;
                        out.say(format!("Failed to write to output file: {}", e).red());
                    }
                }
                Outcome::Failure => {
                    out.summary.failed += 1;
                    out.say(format!("URL: {} Status Code: {}", candidate, code).red());
                }
                Outcome::Error => unreachable!("a reached URL is never classified as an error"),
            },
        }
    }

    // Prints a problem that isn't tied to a single URL
    // (e.g. the input file broke halfway through)
    pub fn problem(&self, message: &str) {
        self.lock().say(message.red());
    }

    // Prints the final "Exit" line when the scan is interrupted
    pub fn exit(&self) {
        self.lock().say("Exit".normal());
    }

    // Copy of the counters so far
    pub fn summary(&self) -> ScanSummary {
        self.lock().summary.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Outputs> {
        // A worker that panicked mid-write can't leave a half line behind
        // (each write is one call), so a poisoned lock is still usable.
        self.outputs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Outputs {
    fn say(&mut self, line: impl std::fmt::Display) {
        // One write_all per line, newline included
        let text = format!("{}\n", line);
        if let Err(e) = self.console.write_all(text.as_bytes()) {
            warn!("console write failed: {}", e);
        }
    }
}

// In-memory writer shared between a Reporter and the test that inspects it
#[cfg(test)]
pub(crate) mod capture {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        pub fn new() -> Self {
            // Plain text makes assertions readable
            colored::control::set_override(false);
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
