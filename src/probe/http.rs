// src/probe/http.rs
// =============================================================================
// This module checks one candidate URL with a single HTTP GET.
//
// Key functionality:
// - Validates the URL before touching the network
// - Sends exactly one GET with a 10 second timeout (no retries)
// - Follows redirects the way reqwest does by default
// - Reports the final status code, whatever it is
//
// Deciding what a status code *means* (200 = keep, anything else = drop)
// happens in the reporter, not here.
//
// Rust concepts:
// - Enums: ProbeResult is one of three shapes
// - Traits: Probe lets the worker pool run against a fake prober in tests
// - async/await: the GET is the slow part, so it's awaited
// =============================================================================

use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use url::Url;

use crate::error::ScanError;

// Every request gets the same fixed budget
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// What happened when we tried one candidate URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    /// The candidate isn't an absolute URL with a host
    Malformed,
    /// Connection refused, timeout, DNS failure, TLS failure, ...
    Unreachable,
    /// The server answered with this status code
    Reached(u16),
}

// How a probe result is treated by the rest of the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Status 200: the URL goes to the output file
    Success,
    /// Any other status: logged only
    Failure,
    /// Transport or parse problem: logged only
    Error,
}

impl ProbeResult {
    // Classifies the result. Only an exact 200 counts as success,
    // so 204 or a 3xx that wasn't followed is still a failure.
    pub fn outcome(&self) -> Outcome {
        match self {
            ProbeResult::Reached(200) => Outcome::Success,
            ProbeResult::Reached(_) => Outcome::Failure,
            ProbeResult::Malformed | ProbeResult::Unreachable => Outcome::Error,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ProbeResult::Malformed)
    }
}

// Anything that can turn a candidate URL into a ProbeResult
//
// The real implementation is Prober below. The returned future must be Send
// because workers run on tokio's multi-threaded runtime.
pub trait Probe: Send + Sync + 'static {
    fn probe(&self, candidate: &str) -> impl Future<Output = ProbeResult> + Send;
}

// The real HTTP prober
//
// One Client is shared by every worker so connections get pooled.
// Client is cheap to clone (it's just a reference counter internally).
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    // Builds a prober with the default 10 second timeout
    pub fn new() -> Result<Self, ScanError> {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    // Builds a prober with a custom timeout (tests use short ones)
    pub fn with_timeout(timeout: Duration) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ScanError::HttpClient)?;

        Ok(Self { client })
    }
}

impl Probe for Prober {
    async fn probe(&self, candidate: &str) -> ProbeResult {
        // Parse first: a malformed URL never reaches the network
        let url = match parse_candidate(candidate) {
            Some(url) => url,
            None => return ProbeResult::Malformed,
        };

        match self.client.get(url).send().await {
            // We only need the status line. Dropping the response closes
            // the body without downloading it.
            Ok(response) => ProbeResult::Reached(response.status().as_u16()),
            Err(e) => {
                debug!("GET {} failed: {}", candidate, e);
                ProbeResult::Unreachable
            }
        }
    }
}

// Parses a candidate into an absolute URL with a host
//
// Returns None for anything we can't send a request to
fn parse_candidate(candidate: &str) -> Option<Url> {
    match Url::parse(candidate) {
        Ok(url) if url.host_str().is_some() => Some(url),
        Ok(_) => {
            debug!("{} has no host", candidate);
            None
        }
        Err(e) => {
            debug!("{} does not parse: {}", candidate, e);
            None
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `impl Future<Output = ProbeResult> + Send` in a trait?
//    - It says "probe returns some future that produces a ProbeResult"
//    - Each implementation can return its own future type
//    - `async fn` in the impl block satisfies it automatically
//
// 2. Why match on `Reached(200)` before `Reached(_)`?
//    - match arms are checked top to bottom
//    - The specific pattern has to come before the catch-all
//
// 3. Why not read the body?
//    - We only care whether the server says 200
//    - Downloading pages would make every probe slower for nothing
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_outcome_classification() {
        assert_eq!(ProbeResult::Reached(200).outcome(), Outcome::Success);
        assert_eq!(ProbeResult::Reached(204).outcome(), Outcome::Failure);
        assert_eq!(ProbeResult::Reached(404).outcome(), Outcome::Failure);
        assert_eq!(ProbeResult::Reached(500).outcome(), Outcome::Failure);
        assert_eq!(ProbeResult::Unreachable.outcome(), Outcome::Error);
        assert_eq!(ProbeResult::Malformed.outcome(), Outcome::Error);
    }

    #[test]
    fn test_parse_candidate() {
        assert!(parse_candidate("http://example.com").is_some());
        assert!(parse_candidate("https://example.com:8443/x").is_some());
        assert!(parse_candidate("http://").is_none());
        assert!(parse_candidate("http://://bad").is_none());
        assert!(parse_candidate("not a url").is_none());
    }

    #[tokio::test]
    async fn test_malformed_candidate_is_not_sent() {
        let prober = Prober::new().unwrap();
        assert_eq!(prober.probe("http://://bad").await, ProbeResult::Malformed);
        assert_eq!(prober.probe("https://").await, ProbeResult::Malformed);
    }

    #[tokio::test]
    async fn test_reached_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let prober = Prober::new().unwrap();
        let ok = prober.probe(&format!("{}/ok", server.uri())).await;
        let missing = prober.probe(&format!("{}/missing", server.uri())).await;

        assert_eq!(ok, ProbeResult::Reached(200));
        assert_eq!(missing, ProbeResult::Reached(404));
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let prober = Prober::new().unwrap();
        let result = prober.probe(&format!("{}/old", server.uri())).await;
        assert_eq!(result, ProbeResult::Reached(200));
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        // Bind a port, then free it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let prober = Prober::new().unwrap();
        let result = prober.probe(&format!("http://{}", addr)).await;
        assert_eq!(result, ProbeResult::Unreachable);
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let prober = Prober::with_timeout(Duration::from_millis(200)).unwrap();
        let result = prober.probe(&server.uri()).await;
        assert_eq!(result, ProbeResult::Unreachable);
    }
}
