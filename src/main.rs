//! footprint-package-sizer: package classification and body sizing for PCB footprints
//!
//! Reads footprint documents, matches every package label against the
//! package database and writes a JSON size report.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use footprint_package_sizer::config;
use footprint_package_sizer::footprint::{read_document, Footprint};
use footprint_package_sizer::packaging::{DatabaseLoad, PackageDatabase};
use footprint_package_sizer::report::build_report;

/// Package classification and body sizing for PCB footprints.
///
/// Matches footprint package labels against a reference package database and
/// estimates body sizes from the drawing geometry where the database has none.
#[derive(Parser, Debug)]
#[command(name = "footprint-package-sizer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Footprint documents (JSON) or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Package database table (overrides the configuration)
    #[arg(short, long, value_name = "TABLE")]
    database: Option<PathBuf>,

    /// Minimum match score to accept a package alias (overrides the configuration)
    #[arg(short, long, value_name = "SCORE")]
    threshold: Option<f64>,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Expands input arguments into document paths, in argument order.
///
/// Arguments without glob metacharacters are taken as plain paths so that
/// a missing file is reported rather than silently matching nothing.
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, glob::PatternError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let before = paths.len();
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!(error = %e, "Skipping unreadable glob match"),
            }
        }
        if paths.len() == before {
            warn!(pattern, "Pattern matched no files");
        }
    }
    Ok(paths)
}

/// Reads all documents, returning the footprints and one message per
/// document or footprint that could not be decoded.
fn read_footprints(paths: &[PathBuf]) -> (Vec<Footprint>, Vec<String>) {
    let mut footprints = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        match read_document(path) {
            Ok(document) => {
                info!(
                    path = %path.display(),
                    footprints = document.footprints.len(),
                    rejected = document.rejected.len(),
                    "Read footprint document"
                );
                failures.extend(document.rejected.iter().map(ToString::to_string));
                footprints.extend(document.footprints);
            }
            Err(e) => {
                error!(error = %e, "Failed to read footprint document");
                failures.push(e.to_string());
            }
        }
    }

    (footprints, failures)
}

fn load_database(path: Option<&Path>, encoding: &str) -> Option<DatabaseLoad> {
    let Some(path) = path else {
        warn!("No package database configured, all sizes come from geometry");
        return Some(DatabaseLoad::default());
    };

    match PackageDatabase::load(path, encoding) {
        Ok(load) => Some(load),
        Err(e) => {
            error!(error = %e, "Failed to load package database");
            None
        }
    }
}

fn write_output(output: Option<&Path>, json: &str) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{json}\n")),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")
        }
    }
}

/// Entry point for footprint-package-sizer.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let mut cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(database) = args.database {
        cfg.database_path = Some(database);
    }
    if let Some(threshold) = args.threshold {
        cfg.matching.acceptance_threshold = threshold;
    }
    if let Err(e) = cfg.validate() {
        eprintln!("Configuration error: {e}");
        return ExitCode::FAILURE;
    }

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        threshold = cfg.matching.acceptance_threshold,
        "Starting footprint-package-sizer"
    );

    let Some(load) = load_database(cfg.database_path.as_deref(), &cfg.database_encoding) else {
        return ExitCode::FAILURE;
    };

    let paths = match expand_inputs(&args.inputs) {
        Ok(paths) => paths,
        Err(e) => {
            error!(error = %e, "Invalid input pattern");
            return ExitCode::FAILURE;
        }
    };

    let (footprints, failures) = read_footprints(&paths);
    let mut report = build_report(&footprints, &load.database, cfg.matching.acceptance_threshold);
    report.add_diagnostics(&load.warnings);
    report.add_diagnostics(&failures);

    let json = match serde_json::to_string_pretty(&report) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "Failed to serialise report");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = write_output(args.output.as_deref(), &json) {
        error!(error = %e, "Failed to write report");
        return ExitCode::FAILURE;
    }

    if !failures.is_empty() {
        warn!(failures = failures.len(), "Some inputs could not be decoded");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
