//! # smsexport CLI
//!
//! Command-line interface for the smsexport library.

use std::fs;
use std::process;
use std::time::Instant;

use chrono::Local;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use smsexport::cli::{Args, Source};
use smsexport::config::DiscoveryConfig;
use smsexport::core::{ExportReport, WindowDiscoverer, pipeline};
use smsexport::date::Window;
use smsexport::format::write_to_format;
use smsexport::progress::stderr_progress;
use smsexport::source::{JsonFileSource, PageFetcher};
use smsexport::ExportError;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ExportError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    let window = args.window()?;
    let (output_path, format) = args.output_target(&Local::now())?;
    let config = args.discovery_config();

    // Print header
    println!("📦 smsexport v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Source:  {}", args.source);
    if let Some(ref input) = args.input {
        println!("📂 Input:   {}", input.display());
    }
    println!("📅 Window:  {} to {}", window.start(), window.end());
    println!("📄 Format:  {}", format);
    println!();

    // Step 1: Discover and extract
    let fetch_start = Instant::now();
    let report = match args.source {
        Source::Twilio => export_from(open_twilio(&args)?, window, config)?,
        Source::File => {
            let source = JsonFileSource::open(args.input_path()?)?;
            println!("   Loaded {} records", source.len());
            export_from(source, window, config)?
        }
    };
    println!(
        "   Fetched {} messages in {} round(s) ({:.2}s)",
        report.fetched,
        report.rounds,
        fetch_start.elapsed().as_secs_f64()
    );

    if report.exhausted_before_start {
        match report.earliest_available {
            Some(earliest) => println!(
                "⚠️  History starts at {}, after the requested {}; exporting from {}",
                earliest,
                window.start(),
                report.effective_start()
            ),
            None => println!("⚠️  The source returned no messages"),
        }
    }
    if report.is_empty() {
        println!("⚠️  No messages between {} and {}", window.start(), window.end());
    }

    // Step 2: Write output
    fs::create_dir_all(args.output_parent())?;
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    write_to_format(&report.records, &output_path, format)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Exported:  {} messages", report.len());
    println!("   Fetched:   {} messages", report.fetched);
    println!("   Rounds:    {} (final fetch size {})", report.rounds, report.final_limit);

    println!();
    println!("⏱️  Execution time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "smsexport=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn export_from<F: PageFetcher>(
    fetcher: F,
    window: Window,
    config: DiscoveryConfig,
) -> Result<ExportReport, ExportError> {
    println!("⏳ Fetching from {}...", fetcher.name());
    let mut discoverer = WindowDiscoverer::new(fetcher, config).with_progress(stderr_progress());
    pipeline::run(&mut discoverer, window)
}

#[cfg(feature = "twilio")]
fn open_twilio(args: &Args) -> Result<smsexport::source::TwilioSource, ExportError> {
    smsexport::source::TwilioSource::new(args.twilio_config()?)
}

#[cfg(not(feature = "twilio"))]
fn open_twilio(_args: &Args) -> Result<smsexport::source::MemorySource, ExportError> {
    Err(ExportError::config(
        "smsexport was built without the 'twilio' feature",
    ))
}
