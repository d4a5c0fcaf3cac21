use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    config::ScraperConfig,
    error::{Result, ScrapeError},
    extract::RecordExtractor,
    fetcher::{page_offsets, HttpPageFetcher, PageFetcher},
    table::PaintingTable,
};

pub const DEFAULT_START: u32 = 0;
pub const DEFAULT_END: u32 = 7564;
pub const DEFAULT_CSV_NAME: &str = "usda_pomological_watercolors.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub start: u32,
    /// Exclusive.
    pub end: u32,
    pub csv_path: PathBuf,
    /// Per-page progress lines are printed when > 0.
    pub verbose: i32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
            csv_path: PathBuf::from(DEFAULT_CSV_NAME),
            verbose: 1,
        }
    }
}

pub struct Pipeline<F: PageFetcher> {
    fetcher: F,
    extractor: RecordExtractor,
    page_stride: u32,
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(fetcher: F, config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            extractor: RecordExtractor::new(config)?,
            page_stride: config.source.page_stride.max(1),
        })
    }

    /// The fetcher pages are requested from.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches and extracts every page in `[start, end)`.
    ///
    /// Pages are visited strictly in ascending offset order. The first page
    /// that yields no cells ends the run early, since later offsets are past
    /// the end of the collection.
    pub fn scrape(&self, start: u32, end: u32, verbose: i32) -> Result<PaintingTable> {
        self.scrape_to(start, end, verbose, &mut io::stdout())
    }

    /// Like [`Pipeline::scrape`], with progress lines written to `out`.
    pub fn scrape_to<W: Write>(&self, start: u32, end: u32, verbose: i32, out: &mut W) -> Result<PaintingTable> {
        if start > end {
            return Err(ScrapeError::InvalidRange { start, end });
        }

        let mut table = PaintingTable::new();
        for offset in page_offsets(start, end, self.page_stride) {
            if verbose > 0 {
                writeln!(out, "Scraping images {}-{}", offset, offset.saturating_add(self.page_stride))?;
            }

            let page = self.fetcher.fetch(offset)?;
            let records = self.extractor.extract(&page.body, page.offset)?;
            if records.is_empty() {
                info!("No cells at offset {}, stopping at end of collection", offset);
                break;
            }

            info!("Extracted {} records at offset {}", records.len(), offset);
            table.append(records);
        }

        info!("Scraped {} records in total", table.len());
        Ok(table)
    }

    /// Scrapes the requested range and writes it to `options.csv_path`.
    pub fn run(&self, options: &RunOptions) -> Result<PaintingTable> {
        self.run_to(options, &mut io::stdout())
    }

    /// Like [`Pipeline::run`], with the banner, progress and completion lines
    /// written to `out`. Only the per-page lines depend on `options.verbose`.
    pub fn run_to<W: Write>(&self, options: &RunOptions, out: &mut W) -> Result<PaintingTable> {
        writeln!(
            out,
            "Collecting Pomological Watercolors {} through {}",
            options.start, options.end
        )?;

        let table = self.scrape_to(options.start, options.end, options.verbose, out)?;
        save(&table, &options.csv_path, out)?;
        Ok(table)
    }
}

fn save<W: Write>(table: &PaintingTable, path: &Path, out: &mut W) -> Result<()> {
    table.write_csv(path)?;
    writeln!(out, "Data successfully saved to {}", path.display())?;
    Ok(())
}

/// Scrapes the live collection over HTTP.
pub fn run(config: &ScraperConfig, options: &RunOptions) -> Result<PaintingTable> {
    let fetcher = HttpPageFetcher::new(config)?;
    Pipeline::new(fetcher, config)?.run(options)
}

/// Extracts one saved results page into a CSV file.
pub fn process_file(config: &ScraperConfig, html_path: &Path, csv_path: &Path) -> Result<PaintingTable> {
    info!("Processing saved page {:?}", html_path);
    let html = fs::read_to_string(html_path)?;

    let table: PaintingTable = RecordExtractor::new(config)?
        .extract(&html, 0)?
        .into_iter()
        .collect();

    save(&table, csv_path, &mut io::stdout())?;
    Ok(table)
}
