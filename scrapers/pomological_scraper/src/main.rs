use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pomological_scraper::{
    config::{FailureMode, ScraperConfig},
    pipeline::{self, RunOptions, DEFAULT_CSV_NAME, DEFAULT_END, DEFAULT_START},
};

/// Scrape paintings from the USDA Pomological Watercolor Collection.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    scrape: ScrapeArgs,
}

#[derive(Debug, Args)]
struct ScrapeArgs {
    /// Image number from which to begin collecting paintings
    #[arg(long, default_value_t = DEFAULT_START)]
    start: u32,

    /// Image number at which to stop collecting paintings (exclusive)
    #[arg(long, default_value_t = DEFAULT_END)]
    end: u32,

    /// If > 0, print scraping progress
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    verbose: i32,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Name of the CSV file to save data to
    #[arg(long = "csv_name", visible_alias = "csv-name", default_value = DEFAULT_CSV_NAME)]
    csv_name: PathBuf,

    /// Leave image links empty instead of aborting when a cell has no image
    #[arg(long)]
    lenient_images: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract records from a saved search results page
    ProcessFile {
        /// Path to the HTML file to process
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn load_config(output: &OutputArgs) -> ScraperConfig {
    let mut config = ScraperConfig::from_env();
    if output.lenient_images {
        config.extraction.image_failure = FailureMode::Soft;
    }
    config
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ProcessFile { file, output }) => {
            let config = load_config(&output);
            let table = pipeline::process_file(&config, &file, &output.csv_name)
                .with_context(|| format!("Failed to process {}", file.display()))?;
            info!("Extracted {} records from {:?}", table.len(), file);
        }
        None => {
            let args = cli.scrape;
            let config = load_config(&args.output);
            let options = RunOptions {
                start: args.start,
                end: args.end,
                csv_path: args.output.csv_name,
                verbose: args.verbose,
            };
            let table = pipeline::run(&config, &options).context("Scrape failed")?;
            info!("Collected {} paintings", table.len());
        }
    }

    Ok(())
}
