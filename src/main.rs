//! JobScript harvester entry point
//!
//! Command-line interface for crawling a site for email addresses, serving
//! the crawler over HTTP, and sanitizing text.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use jobscript_harvester::config::{load_config_with_hash, Config};
use jobscript_harvester::crawler::{Coordinator, CrawlJob, EmailScrapeResponse};
use jobscript_harvester::sanitize::{has_content, sanitize_text};
use jobscript_harvester::server;
use std::io::Read;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// JobScript harvester: find contact emails on a website
#[derive(Parser, Debug)]
#[command(name = "jobscript-harvester")]
#[command(version)]
#[command(about = "Find contact emails on a website", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

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
    /// Crawl a website and print the emails found as JSON
    Crawl {
        /// URL to start crawling from
        url: String,

        /// Maximum number of pages to visit
        #[arg(long)]
        page_budget: Option<usize>,

        /// Number of concurrent workers
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print crawl statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Serve the crawler over HTTP
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Replace em-dashes with spaces in TEXT (or stdin)
    Sanitize {
        /// Text to sanitize; read from stdin when omitted
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            url,
            page_budget,
            concurrency,
            stats,
        } => {
            if let Some(page_budget) = page_budget {
                config.crawler.page_budget = page_budget;
            }
            if let Some(concurrency) = concurrency {
                config.crawler.concurrency = concurrency;
            }
            jobscript_harvester::config::validate(&config)
                .context("Invalid command-line overrides")?;

            handle_crawl(&url, &config, stats).await
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            jobscript_harvester::config::validate(&config)
                .context("Invalid command-line overrides")?;

            handle_serve(config).await
        }
        Command::Sanitize { text } => handle_sanitize(text),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout only ever carries command output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jobscript_harvester=info,warn"),
            1 => EnvFilter::new("jobscript_harvester=debug,info"),
            2 => EnvFilter::new("jobscript_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, otherwise the built-in defaults
fn load_configuration(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Returns a token that is cancelled on Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight requests");
            trigger.cancel();
        }
    });

    token
}

/// Handles the crawl command
async fn handle_crawl(url: &str, config: &Config, print_stats: bool) -> anyhow::Result<()> {
    let job = CrawlJob::new(url, &config.crawler)?;
    let outcome = Coordinator::from_config(job, config)?
        .with_cancellation(cancel_on_ctrl_c())
        .run()
        .await
        .context("Crawl failed")?;

    if print_stats {
        eprintln!("{}", outcome.stats);
        eprintln!("  Elapsed: {:?}", outcome.elapsed);
    }

    let response = EmailScrapeResponse::from(outcome);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

/// Handles the serve command
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    server::serve(config, cancel_on_ctrl_c())
        .await
        .context("Server error")
}

/// Handles the sanitize command
fn handle_sanitize(text: Option<String>) -> anyhow::Result<()> {
    let input = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    if !has_content(&input) {
        bail!("Please enter text to sanitize");
    }

    print!("{}", sanitize_text(&input));
    Ok(())
}
