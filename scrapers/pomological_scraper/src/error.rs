use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("cell {cell} on page at offset {offset} is missing required field {field}: {reason}")]
    MissingField {
        field: String,
        offset: u32,
        cell: usize,
        reason: String,
    },

    #[error("invalid offset range: start {start} is past end {end}")]
    InvalidRange { start: u32, end: u32 },

    #[error("search URL template has no {{offset}} placeholder: {0}")]
    InvalidTemplate(String),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
