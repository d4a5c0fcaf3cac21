use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintingRecord {
    pub painting_index: Option<String>,
    pub fruit: Option<String>,
    pub authors: Option<String>,
    pub subjects: Option<String>,
    pub year: Option<String>,
    pub image: Option<String>,
    pub thumbnail_image: Option<String>,
}

impl PaintingRecord {
    /// Sets the thumbnail and derives the full-size image link from it.
    pub fn set_thumbnail(&mut self, thumbnail: String) {
        self.image = Some(screen_image_url(&thumbnail));
        self.thumbnail_image = Some(thumbnail);
    }
}

/// Full-size images live beside thumbnails under `screen/` instead of `thumbnail/`.
pub fn screen_image_url(thumbnail: &str) -> String {
    thumbnail.replace("thumbnail", "screen")
}

/// One search results page as returned by a fetcher.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub offset: u32,
    pub url: String,
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_image_url() {
        assert_eq!(
            screen_image_url("https://naldc-legacy.nal.usda.gov/images/thumbnail/x.jpg"),
            "https://naldc-legacy.nal.usda.gov/images/screen/x.jpg"
        );
        assert_eq!(screen_image_url("no-match.jpg"), "no-match.jpg");
    }

    #[test]
    fn test_set_thumbnail_fills_both_links() {
        let mut record = PaintingRecord::default();
        record.set_thumbnail("https://host/thumbnail/7.jpg".to_string());
        assert_eq!(record.thumbnail_image.as_deref(), Some("https://host/thumbnail/7.jpg"));
        assert_eq!(record.image.as_deref(), Some("https://host/screen/7.jpg"));
    }
}
