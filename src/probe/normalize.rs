// src/probe/normalize.rs
// =============================================================================
// This module turns one raw input line into the URL(s) we will actually probe.
//
// Rules:
// - "http://..." or "https://..." is already a URL: probe it as-is
// - Anything else (a hostname, host:port, ...) gets both schemes, plain
//   http first and https second
//
// Nothing is validated here. A line like "://bad" still produces candidates;
// the prober is the one that notices they don't parse.
//
// Rust concepts:
// - &str vs String: we borrow the input and return owned strings
// - Slices and starts_with: cheap prefix checks, no allocation
// =============================================================================

// Schemes we recognise at the start of a line (case-sensitive on purpose:
// "HTTP://host" is treated as a bare host and gets both prefixes)
const SCHEMES: [&str; 2] = ["http://", "https://"];

// Builds the candidate URLs for one target line
//
// Parameters:
//   raw: one input line, line terminator already stripped
//
// Returns: one candidate if the line carries a scheme, otherwise two
//
// Example:
//   candidates("example.com")          -> ["http://example.com", "https://example.com"]
//   candidates("https://example.com")  -> ["https://example.com"]
pub fn candidates(raw: &str) -> Vec<String> {
    if has_scheme(raw) {
        return vec![raw.to_string()];
    }

    SCHEMES
        .iter()
        .map(|scheme| format!("{}{}", scheme, raw))
        .collect()
}

fn has_scheme(raw: &str) -> bool {
    SCHEMES.iter().any(|scheme| raw.starts_with(scheme))
}
