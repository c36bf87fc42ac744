//! Paper-Chaser main entry point
//!
//! This is the command-line interface for the Paper-Chaser Drive crawler.

use clap::{Parser, Subcommand};
use paper_chaser::config::{load_config_with_hash, Config};
use paper_chaser::crawler::{crawl, ShutdownSignal};
use paper_chaser::drive::{DriveFetcher, ObjectFetcher};
use paper_chaser::links::resolve_ids;
use paper_chaser::state::load_ids;
use paper_chaser::{ChaserError, CrawlState};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code after a requested shutdown, as for a shell-interrupted process
const EXIT_INTERRUPTED: u8 = 130;

/// Paper-Chaser: a Google Drive link crawler
///
/// Paper-Chaser starts from a list of Drive URLs and follows every link to
/// another Drive file it can find in Docs, Sheets, Slides and folder listings,
/// recording the metadata of each file it can open.
#[derive(Parser, Debug)]
#[command(name = "paper-chaser")]
#[command(version = "1.0.0")]
#[command(about = "A Google Drive link crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "paper-chaser.toml", global = true)]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a single Drive file and print the links found in it
    Extract {
        /// Drive file ID or URL
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Crawl every Drive file reachable from the seed URLs
    Crawl {
        /// File with one Drive URL per line
        #[arg(value_name = "SEED_FILE")]
        seed_file: PathBuf,

        /// Already-crawled ID list from a previous run
        #[arg(long, value_name = "FILE")]
        visited: Option<PathBuf>,

        /// Remaining queue from a previous run
        #[arg(long, value_name = "FILE")]
        queue: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let result = run(cli).await;
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config).map_err(ChaserError::from)?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Extract { id } => {
            handle_extract(&config, &id).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Crawl {
            seed_file,
            visited,
            queue,
        } => handle_crawl(&config, &seed_file, visited.as_deref(), queue.as_deref()).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paper_chaser=info,warn"),
            1 => EnvFilter::new("paper_chaser=debug,info"),
            2 => EnvFilter::new("paper_chaser=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the extract command: prints the links found in one file
async fn handle_extract(config: &Config, target: &str) -> anyhow::Result<()> {
    // Accept a Drive URL as well as a bare ID
    let id = resolve_ids([target])
        .into_iter()
        .next()
        .unwrap_or_else(|| target.to_string());

    let fetcher = DriveFetcher::new(config).map_err(ChaserError::from)?;
    let object = fetcher.fetch(&id).await.map_err(|source| {
        if source.is_fatal() {
            ChaserError::AuthExpired
        } else {
            ChaserError::Fetch {
                id: id.clone(),
                source,
            }
        }
    })?;

    tracing::info!(
        "{} ({}) is a {:?}",
        object.metadata.title.as_deref().unwrap_or("untitled"),
        id,
        object.kind()
    );
    for link in object.links() {
        println!("{}", link);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    seed_file: &Path,
    visited_file: Option<&Path>,
    queue_file: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let content = std::fs::read_to_string(seed_file).map_err(|source| ChaserError::SeedFile {
        path: seed_file.to_path_buf(),
        source,
    })?;

    let lines = content.lines().map(str::trim).filter(|line| !line.is_empty());
    let seeds = resolve_ids(lines);
    if seeds.is_empty() {
        return Err(ChaserError::NoSeeds.into());
    }
    tracing::info!("Seeding crawl with {} Drive ID(s)", seeds.len());

    let visited = match visited_file {
        Some(path) => load_ids(path).map_err(ChaserError::from)?,
        None => Vec::new(),
    };
    let previous_frontier = match queue_file {
        Some(path) => load_ids(path).map_err(ChaserError::from)?,
        None => Vec::new(),
    };
    if !visited.is_empty() || !previous_frontier.is_empty() {
        tracing::info!(
            "Resuming with {} already-crawled and {} queued ID(s)",
            visited.len(),
            previous_frontier.len()
        );
    }

    let shutdown = ShutdownSignal::new();
    let listener = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt detected, flushing queue and results before quitting");
            listener.trigger("interrupt signal");
        }
    });

    let report = crawl(config, seeds, previous_frontier, visited, shutdown).await?;
    tracing::info!(
        "Crawl {} finished ({}) after {}s: {} file(s) recorded, {} skipped, {} remaining",
        report.run,
        report.state,
        report.elapsed().num_seconds(),
        report.fetched,
        report.skipped,
        report.remaining
    );

    match report.state {
        CrawlState::Interrupted => Ok(ExitCode::from(EXIT_INTERRUPTED)),
        _ => Ok(ExitCode::SUCCESS),
    }
}
