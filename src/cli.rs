// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use clap's "derive" API: the struct below IS the list of flags.
//
//   http-sweep -l hosts.txt -o alive.txt -t 50
//
// -h/--help and -V/--version come for free from clap.
// =============================================================================

use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "http-sweep",
    version,
    about = "Probe a list of hosts/URLs and keep the ones answering HTTP 200",
    long_about = "http-sweep reads one host or URL per line, tries http:// and https:// for \
                  bare hosts, and writes every URL that answers 200 to the output file. \
                  Press Ctrl-C to stop early; URLs found so far stay in the output file."
)]
pub struct Cli {
    /// File with one host, host:port or URL per line
    ///
    /// Without it, http-sweep prints this help and exits
    //
    // A String rather than a PathBuf so that `-l ""` parses and can be
    // treated the same as a missing flag
    #[arg(short = 'l', long = "list", value_name = "FILE")]
    pub list: Option<String>,

    /// File that receives every URL answering 200 (overwritten)
    #[arg(short, long, value_name = "FILE", default_value = "output.txt")]
    pub output: PathBuf,

    /// Number of concurrent workers (at least 1)
    //
    // Signed so "-t 0" or "-t -3" gets a clear error from ScanConfig
    // instead of a confusing parse failure
    #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
    pub threads: i64,

    /// Print the final summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    // The input path, if one was given and isn't empty
    pub fn input(&self) -> Option<&Path> {
        self.list
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(Path::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("http-sweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-l", "hosts.txt"]);
        assert_eq!(cli.input(), Some(Path::new("hosts.txt")));
        assert_eq!(cli.output, PathBuf::from("output.txt"));
        assert_eq!(cli.threads, 10);
        assert!(!cli.json);
    }

    #[test]
    fn test_long_flags() {
        let cli = parse(&["--list", "in.txt", "--output", "out.txt", "--threads", "64", "--json"]);
        assert_eq!(cli.input(), Some(Path::new("in.txt")));
        assert_eq!(cli.output, PathBuf::from("out.txt"));
        assert_eq!(cli.threads, 64);
        assert!(cli.json);
    }

    #[test]
    fn test_missing_or_empty_list_means_no_input() {
        assert_eq!(parse(&[]).input(), None);
        assert_eq!(parse(&["-l", ""]).input(), None);
    }

    #[test]
    fn test_negative_threads_reach_validation() {
        assert_eq!(parse(&["-l", "x", "-t", "-4"]).threads, -4);
    }

    #[test]
    fn test_help_is_a_clap_exit() {
        let err = Cli::try_parse_from(["http-sweep", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_non_numeric_threads_is_rejected() {
        assert!(Cli::try_parse_from(["http-sweep", "-l", "x", "-t", "many"]).is_err());
    }
}
