//! docsift CLI - persona-driven section ranking for PDF collections

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docsift::pipeline::collection_name;
use docsift::{BatchObserver, BatchSummary, CollectionOutcome, Engine, EngineOptions};

/// Per-document timeout in seconds; 0 disables it.
const TIMEOUT_ENV: &str = "DOCSIFT_TIMEOUT_SECS";
/// Any value other than empty, `0` or `false` disables parallel analysis.
const SEQUENTIAL_ENV: &str = "DOCSIFT_SEQUENTIAL";

#[derive(Parser)]
#[command(name = "docsift")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Rank persona-relevant sections and passages across PDF collections",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every collection directory under INPUT
    Run {
        /// Directory of collections (one subdirectory each)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory for `<collection>_output.json` files
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { input, output } => cmd_run(&input, &output),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_run(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Engine::with_options(options_from_env());

    let mut progress = ProgressReporter::new();
    let summary = engine.run_batch_with(input, output, &mut progress)?;
    progress.pb.finish_and_clear();

    print_summary(&summary, &progress.written);
    Ok(())
}

/// Drives the progress bar and remembers the files written.
struct ProgressReporter {
    pb: ProgressBar,
    written: Vec<PathBuf>,
}

impl ProgressReporter {
    fn new() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self {
            pb,
            written: Vec::new(),
        }
    }
}

impl BatchObserver for ProgressReporter {
    fn on_batch_start(&mut self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn on_collection_start(&mut self, dir: &Path) {
        self.pb.set_message(collection_name(dir));
    }

    fn on_collection_end(&mut self, _dir: &Path, result: &docsift::Result<CollectionOutcome>) {
        if let Ok(CollectionOutcome::Written(path)) = result {
            self.written.push(path.clone());
        }
        self.pb.inc(1);
    }
}

fn print_summary(summary: &BatchSummary, written: &[PathBuf]) {
    let counts = format!("{}/{}", summary.processed, summary.total);
    let counts = if summary.is_complete() {
        counts.green().bold()
    } else {
        counts.yellow().bold()
    };
    println!("{} {} collections processed", "Done:".green().bold(), counts);

    if summary.skipped > 0 {
        println!("  {} {} skipped", "├─".dimmed(), summary.skipped);
    }
    if summary.failed > 0 {
        println!("  {} {}", "├─".dimmed(), format!("{} failed", summary.failed).red());
    }
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
}

/// Engine options with the environment overrides applied.
fn options_from_env() -> EngineOptions {
    let mut options = EngineOptions::default();
    if let Some(timeout) = env::var(TIMEOUT_ENV).ok().and_then(|v| parse_timeout(&v)) {
        options = options.with_timeout(timeout);
    }
    if env::var(SEQUENTIAL_ENV).is_ok_and(|v| is_truthy(&v)) {
        options = options.sequential();
    }
    options
}

/// `None` for unparsable values, `Some(None)` for 0.
fn parse_timeout(value: &str) -> Option<Option<Duration>> {
    match value.trim().parse::<u64>() {
        Ok(0) => Some(None),
        Ok(secs) => Some(Some(Duration::from_secs(secs))),
        Err(_) => {
            log::warn!("Ignoring {TIMEOUT_ENV}={value:?}: not a number of seconds");
            None
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no"
    )
}
