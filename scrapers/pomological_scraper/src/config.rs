use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_SEARCH_URL: &str = "https://naldc-legacy.nal.usda.gov/naldc/search.xhtml?start={offset}&collectionFacet=USDA+Pomological+Watercolor+Collection";
pub const DEFAULT_IMAGE_PREFIX: &str = "https://naldc-legacy.nal.usda.gov/";
pub const DEFAULT_PAGE_STRIDE: u32 = 20;

/// What to do when a cell has no usable specimen image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FailureMode {
    /// Leave the field empty and keep going.
    Soft,
    /// Abort the whole run.
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; PomologicalScraper/0.1)".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Search endpoint with an `{offset}` placeholder.
    pub search_url_template: String,
    /// Prepended to the relative thumbnail path found in each cell.
    pub image_prefix: String,
    /// Results per page on the site; not read from the environment.
    pub page_stride: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            search_url_template: DEFAULT_SEARCH_URL.to_string(),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            page_stride: DEFAULT_PAGE_STRIDE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub image_failure: FailureMode,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            image_failure: FailureMode::Hard,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub scraping: ScrapingConfig,
    pub source: SourceConfig,
    pub extraction: ExtractionConfig,
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(user_agent) = env::var("POMO_USER_AGENT") {
            config.scraping.user_agent = user_agent;
        }
        if let Ok(Some(timeout)) = env::var("POMO_TIMEOUT_SECS").map_or(Ok(None), |t| t.parse::<u64>().map(Some)) {
            config.scraping.request_timeout_secs = timeout;
        }
        if let Ok(template) = env::var("POMO_SEARCH_URL") {
            config.source.search_url_template = template;
        }
        if let Ok(prefix) = env::var("POMO_IMAGE_PREFIX") {
            config.source.image_prefix = prefix;
        }
        if let Ok(lenient) = env::var("POMO_LENIENT_IMAGES") {
            if matches!(lenient.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config.extraction.image_failure = FailureMode::Soft;
            }
        }

        config
    }
}
