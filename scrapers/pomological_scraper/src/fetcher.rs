use std::time::Duration;
use tracing::{debug, info};

use crate::{
    config::ScraperConfig,
    error::{Result, ScrapeError},
    types::FetchedPage,
};

const OFFSET_PLACEHOLDER: &str = "{offset}";

/// Substitutes `offset` into a search URL template.
pub fn page_url(template: &str, offset: u32) -> String {
    template.replace(OFFSET_PLACEHOLDER, &offset.to_string())
}

/// Offsets `start, start + stride, ...` strictly below `end`.
pub fn page_offsets(start: u32, end: u32, stride: u32) -> impl Iterator<Item = u32> {
    (start..end).step_by(stride.max(1) as usize)
}

/// Source of search result pages.
///
/// Failure handling belongs to the implementation: the HTTP fetcher treats any
/// transport error or non-success status as fatal, and a retrying fetcher can
/// wrap it without the extractor knowing.
pub trait PageFetcher {
    fn fetch(&self, offset: u32) -> Result<FetchedPage>;
}

pub struct HttpPageFetcher {
    client: reqwest::blocking::Client,
    url_template: String,
}

impl HttpPageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let url_template = config.source.search_url_template.clone();
        if !url_template.contains(OFFSET_PLACEHOLDER) {
            return Err(ScrapeError::InvalidTemplate(url_template));
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.scraping.user_agent)
            .timeout(Duration::from_secs(config.scraping.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url_template,
        })
    }

    pub fn url_for(&self, offset: u32) -> String {
        page_url(&self.url_template, offset)
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, offset: u32) -> Result<FetchedPage> {
        let url = self.url_for(offset);
        debug!("GET {}", url);
        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        info!("Fetched page at offset {} ({} bytes)", offset, body.len());

        Ok(FetchedPage {
            offset,
            url,
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config_for(server: &mockito::Server) -> ScraperConfig {
        let mut config = ScraperConfig::default();
        config.source.search_url_template = format!(
            "{}/naldc/search.xhtml?start={{offset}}&collectionFacet=USDA+Pomological+Watercolor+Collection",
            server.url()
        );
        config.scraping.request_timeout_secs = 5;
        config
    }

    #[test]
    fn test_page_url_matches_template() {
        let url = page_url(crate::config::DEFAULT_SEARCH_URL, 40);
        assert_eq!(
            url,
            "https://naldc-legacy.nal.usda.gov/naldc/search.xhtml?start=40&collectionFacet=USDA+Pomological+Watercolor+Collection"
        );
    }

    #[test]
    fn test_page_offsets_stride() {
        let offsets: Vec<u32> = page_offsets(0, 100, 20).collect();
        assert_eq!(offsets, vec![0, 20, 40, 60, 80]);

        let offsets: Vec<u32> = page_offsets(20, 61, 20).collect();
        assert_eq!(offsets, vec![20, 40, 60]);

        assert_eq!(page_offsets(40, 40, 20).count(), 0);
        assert_eq!(page_offsets(0, 7564, 20).last(), Some(7560));
    }

    #[test]
    fn test_fetcher_rejects_template_without_placeholder() {
        let mut config = ScraperConfig::default();
        config.source.search_url_template = "https://example.com/search".to_string();
        assert!(matches!(
            HttpPageFetcher::new(&config),
            Err(ScrapeError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_fetch_page_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Regex(r"^/naldc/search\.xhtml".to_string()))
            .match_query(Matcher::UrlEncoded("start".into(), "40".into()))
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body>page two</body></html>")
            .create();

        let fetcher = HttpPageFetcher::new(&config_for(&server)).unwrap();
        let page = fetcher.fetch(40).unwrap();

        mock.assert();
        assert_eq!(page.offset, 40);
        assert_eq!(page.status, 200);
        assert!(page.url.contains("start=40&"));
        assert!(page.body.contains("page two"));
    }

    #[test]
    fn test_fetch_page_http_error_is_fatal() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/naldc/search\.xhtml".to_string()))
            .with_status(503)
            .create();

        let fetcher = HttpPageFetcher::new(&config_for(&server)).unwrap();
        match fetcher.fetch(0) {
            Err(ScrapeError::HttpStatus { status, url }) => {
                assert_eq!(status, 503);
                assert!(url.contains("start=0&"));
            }
            other => panic!("expected HttpStatus error, got {:?}", other),
        }
    }
}
