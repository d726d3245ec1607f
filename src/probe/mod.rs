// src/probe/mod.rs
// =============================================================================
// This module contains everything that happens to a single target line.
//
// Submodules:
// - normalize: Turns a raw line into one or two candidate URLs
// - http: Sends one GET per candidate and reports what happened
//
// This file (mod.rs) is the module root - it re-exports the public API
// so the rest of the app can write `probe::candidates()` and
// `probe::Prober` without knowing the file layout.
// =============================================================================

mod http;
mod normalize;

pub use http::{Outcome, Probe, ProbeResult, Prober, PROBE_TIMEOUT};
pub use normalize::candidates;
