//! Handbook scraper main entry point
//!
//! This is the command-line interface that crawls the wiki into the
//! handbook's static datasets.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use handbook_scraper::browser::Engine;
use handbook_scraper::config::{load_config_or_default, Config};
use handbook_scraper::output::{log_report, render_dataset, write_dataset, write_image_map};
use handbook_scraper::{run_crawl, CrawlRequest, EntityKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Handbook scraper: builds the handbook's datasets from the game wiki
///
/// ACTION is one of: items, equipment, survivors, challenges, artifacts, gencode.
/// The entity actions crawl the wiki and write the kind's JSON dataset;
/// gencode regenerates the image map from the image directory.
#[derive(Parser, Debug)]
#[command(name = "handbook-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Builds the handbook's datasets from the game wiki", long_about = None)]
struct Cli {
    /// What to do: an entity kind to crawl, or gencode
    #[arg(value_name = "ACTION")]
    action: Option<String>,

    /// Seed URL overriding the kind's configured seed
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Extract only the seed page and print the result instead of writing it
    #[arg(long)]
    single: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a TOML configuration file overriding the defaults
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Browser engine used for navigation
    #[arg(long, value_enum)]
    engine: Option<Engine>,

    /// Directory the datasets are written to
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

/// A parsed ACTION argument
enum Action {
    Crawl(EntityKind),
    Gencode,
}

fn parse_action(action: Option<&str>) -> Option<Action> {
    match action? {
        "gencode" => Some(Action::Gencode),
        other => other.parse().ok().map(Action::Crawl),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(action) = parse_action(cli.action.as_deref()) else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(engine) = cli.engine {
        config.browser.engine = engine;
    }
    if let Some(dir) = &cli.out_dir {
        config.output.data_dir = dir.clone();
    }

    match action {
        Action::Gencode => handle_gencode(&config),
        Action::Crawl(kind) => handle_crawl(&config, kind, cli.seed, cli.single).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that `--single` output on stdout stays valid JSON.
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("handbook_scraper=info,warn"),
                1 => EnvFilter::new("handbook_scraper=debug,info"),
                _ => EnvFilter::new("handbook_scraper=trace,debug"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles gencode: regenerates the image map from the image directory
fn handle_gencode(config: &Config) -> anyhow::Result<()> {
    let image_dir = &config.output.image_dir;
    std::fs::create_dir_all(image_dir)
        .with_context(|| format!("Failed to create image directory {}", image_dir.display()))?;

    let count = write_image_map(image_dir, &config.output.image_map)
        .with_context(|| format!("Failed to generate {}", config.output.image_map.display()))?;

    tracing::info!("Mapped {} image(s)", count);
    println!("written to {}", config.output.image_map.display());
    Ok(())
}

/// Handles a crawl of one entity kind
async fn handle_crawl(config: &Config, kind: EntityKind, seed: Option<String>, single: bool) -> anyhow::Result<()> {
    let request = CrawlRequest { kind, seed, single };
    tracing::info!("Crawling {} with the {:?} engine", kind, config.browser.engine);

    let outcome = run_crawl(config, &request)
        .await
        .with_context(|| format!("Crawl of {} failed", kind))?;
    log_report(&outcome.report);

    if single {
        print!("{}", render_dataset(&outcome.dataset)?);
        return Ok(());
    }

    let path = config.dataset_path(kind);
    write_dataset(&path, &outcome.dataset).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("written to {}", path.display());
    Ok(())
}
