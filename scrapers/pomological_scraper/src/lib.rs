pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod pipeline;
pub mod table;
pub mod types;

pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use pipeline::{Pipeline, RunOptions};
pub use table::PaintingTable;
pub use types::{FetchedPage, PaintingRecord};
