// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging and parse command-line arguments
// 2. Open the input list and create the output file (fail fast if we can't)
// 3. Start listening for Ctrl-C / SIGTERM
// 4. Run the scan and print a summary
// 5. Exit with proper code (0 = scan ran, 2 = couldn't start)
//
// Rust concepts used:
// - async/await: Because we need to make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Arc: one Reporter shared by the workers and the signal handler
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod error;    // src/error.rs - errors that stop a scan from starting
mod probe;    // src/probe/ - URL candidates and the HTTP check
mod report;   // src/report.rs - serialized console + output file writes
mod scan;     // src/scan/ - queue, worker pool and interrupt handling

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::info;
use tokio_util::sync::CancellationToken;

use cli::Cli;
use probe::{Prober, PROBE_TIMEOUT};
use report::{Reporter, ScanSummary};
use scan::{InterruptController, ScanConfig, Scanner};

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; status lines go to stdout.
    // RUST_LOG=debug shows why each unreachable URL failed.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Configuration problems: print once and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = scan finished or was interrupted (or only help was shown)
//   Err   = the scan could not start
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    println!("🔍 http-sweep v{}", env!("CARGO_PKG_VERSION"));

    let input = match cli.input() {
        Some(path) => path.to_path_buf(),
        None => {
            // No list, nothing to scan: show usage and leave
            Cli::command().print_help()?;
            println!();
            return Ok(0);
        }
    };

    // Everything that can fail up front fails here, before any worker starts
    let config = ScanConfig::new(input, cli.output.clone(), cli.threads)?;
    let reader = config.open_input().await?;
    let output = config.create_output()?;
    let prober = Prober::new()?;

    println!("📄 Input:   {}", config.input.display());
    println!("💾 Output:  {}", config.output.display());
    println!(
        "🧵 Workers: {} (timeout {}s per request)\n",
        config.threads,
        PROBE_TIMEOUT.as_secs()
    );

    let reporter = Arc::new(Reporter::to_stdout(output));
    let cancel = CancellationToken::new();
    let _signals = InterruptController::new(Arc::clone(&reporter), cancel.clone()).listen();

    info!("starting scan with {} workers", config.threads);
    let scanner = Scanner::new(prober, reporter, config.threads);
    let summary = scanner.run(reader, cancel).await;

    // Interrupted: shutdown is best-effort, so a probe that finished just as
    // "Exit" was printed may still have reported; everything else in flight
    // is dropped and the process ends here without a summary
    if summary.interrupted {
        return Ok(0);
    }

    print_summary(&summary, cli.json)?;
    Ok(0)
}

// Prints the summary either as text or JSON
fn print_summary(summary: &ScanSummary, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(summary)?;
        println!("{}", json_output);
    } else {
        println!();
        println!("📊 Summary:");
        println!("   📋 Targets:     {}", summary.targets);
        println!("   ✅ 200 OK:      {}", summary.success);
        println!("   ❌ Other code:  {}", summary.failed);
        println!("   🌐 Unreachable: {}", summary.unreachable);
        println!("   ⚠️  Malformed:   {}", summary.malformed);
        if summary.write_errors > 0 {
            println!("   💥 Not saved:   {}", summary.write_errors);
        }
    }
    Ok(())
}
