//! MarkuAPI CLI
//!
//! Runs one scrape operation and prints the response as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use markuapi::{
    config,
    error::ScrapeError,
    models::{Config, Paging},
    pipeline::Scraper,
};
use serde::Serialize;

/// MarkuAPI - Filmarks drama scraper
#[derive(Parser, Debug)]
#[command(name = "markuapi", version, about = "Scrape Filmarks drama pages into JSON")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone, Copy)]
struct PagingArgs {
    /// Maximum number of records to return
    #[arg(long, default_value_t = Paging::DEFAULT_LIMIT,
          value_parser = clap::value_parser!(u32).range(1..=1000))]
    limit: u32,

    /// Result page number
    #[arg(long, default_value_t = Paging::DEFAULT_PAGE,
          value_parser = clap::value_parser!(u32).range(1..=1000))]
    page: u32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search dramas by free text
    Search {
        /// Search text
        #[arg(default_value = "")]
        query: String,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Fetch the detail page of one drama season
    Detail {
        series_id: u64,
        season_id: u64,
    },

    /// List currently trending dramas
    Trend {
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// List dramas by country of origin
    Country {
        country_id: u64,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// List dramas by production year
    Year {
        year: u32,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging from the configured level or the verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize response: {e}");
            ExitCode::FAILURE
        }
    }
}

fn report<T: Serialize>(outcome: Result<T, ScrapeError>) -> ExitCode {
    match outcome {
        Ok(value) => print_json(&value),
        Err(err) => {
            print_json(&serde_json::json!({ "status": err.status, "detail": err.detail }));
            ExitCode::FAILURE
        }
    }
}

fn paging(args: PagingArgs) -> Result<Paging, ScrapeError> {
    Ok(Paging::new(args.limit, args.page)?)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, "info");
            log::error!("Failed to load config from {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Command::Validate => validate(&config),
        command => run(command, &config).await,
    }
}

async fn run(command: Command, config: &Config) -> ExitCode {
    let scraper = match Scraper::from_config(config) {
        Ok(scraper) => scraper,
        Err(e) => {
            log::error!("Failed to initialise scraper: {e}");
            return report::<()>(Err(ScrapeError::from(e)));
        }
    };

    match command {
        Command::Search { query, paging: args } => match paging(args) {
            Ok(p) => report(scraper.search_dramas(&query, p).await),
            Err(e) => report::<()>(Err(e)),
        },
        Command::Detail {
            series_id,
            season_id,
        } => report(scraper.drama_detail(series_id, season_id).await),
        Command::Trend { paging: args } => match paging(args) {
            Ok(p) => report(scraper.trending_dramas(p).await),
            Err(e) => report::<()>(Err(e)),
        },
        Command::Country {
            country_id,
            paging: args,
        } => match paging(args) {
            Ok(p) => report(scraper.dramas_by_country(country_id, p).await),
            Err(e) => report::<()>(Err(e)),
        },
        Command::Year { year, paging: args } => match paging(args) {
            Ok(p) => report(scraper.dramas_by_year(year, p).await),
            Err(e) => report::<()>(Err(e)),
        },
        Command::Validate => validate(config),
    }
}

fn validate(config: &Config) -> ExitCode {
    log::info!("Validating configuration...");
    match config::validate_all(config) {
        Ok(registry) => {
            log::info!("✓ Config OK (base {})", registry.base());
            log::info!("All validations passed!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Config validation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
