//! Record extraction for search result pages.
//!
//! The collection's markup repeats every facet class twice inside a cell:
//! once on the facet label and once on the value. Which occurrence to read,
//! and how to clean it up, is spelled out per field in [`FIELD_RULES`] so the
//! site quirks stay in one place.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::{
    config::{FailureMode, ScraperConfig},
    error::{Result, ScrapeError},
    types::PaintingRecord,
};

pub const CONTAINER_SELECTOR: &str = "div.grid_12";
pub const CELL_SELECTOR: &str = ".document.blacklight-pdf";
const IMAGE_SELECTOR: &str = "img";
const RELATIVE_PREFIX_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `painting_index` and `fruit`, split out of one `.`-separated title.
    Name,
    Authors,
    Subjects,
    Year,
    /// `thumbnail_image` and the derived `image`.
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Text,
    NestedImageSrc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    Raw,
    /// Drops `\n` and `\t` anywhere in the text; spaces are kept.
    StripControlWhitespace,
    /// Drops the `../` style prefix and prepends the configured image host.
    AbsoluteImageUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub class_marker: &'static str,
    pub match_index: usize,
    pub source: ValueSource,
    pub post: PostProcess,
    pub failure: FailureMode,
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        class_marker: "blacklight-extent_format_facet",
        match_index: 0,
        source: ValueSource::Text,
        post: PostProcess::StripControlWhitespace,
        failure: FailureMode::Soft,
    },
    FieldRule {
        field: Field::Authors,
        class_marker: "blacklight-name_facet",
        match_index: 1,
        source: ValueSource::Text,
        post: PostProcess::Raw,
        failure: FailureMode::Soft,
    },
    FieldRule {
        field: Field::Subjects,
        class_marker: "blacklight-subject",
        match_index: 1,
        source: ValueSource::Text,
        post: PostProcess::StripControlWhitespace,
        failure: FailureMode::Soft,
    },
    FieldRule {
        field: Field::Year,
        class_marker: "blacklight-year_facet",
        match_index: 1,
        source: ValueSource::Text,
        post: PostProcess::StripControlWhitespace,
        failure: FailureMode::Soft,
    },
    // failure is replaced by the configured image policy
    FieldRule {
        field: Field::Image,
        class_marker: "blacklight-specimen_identifier_s",
        match_index: 1,
        source: ValueSource::NestedImageSrc,
        post: PostProcess::AbsoluteImageUrl,
        failure: FailureMode::Hard,
    },
];

struct CompiledRule {
    rule: FieldRule,
    selector: Selector,
}

pub struct RecordExtractor {
    container: Selector,
    cell: Selector,
    image: Selector,
    rules: Vec<CompiledRule>,
    image_prefix: String,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn strip_control_whitespace(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\t').collect()
}

/// Splits a cleaned title like `"1234.Apple"` into its index and fruit parts.
pub fn split_name(name: &str) -> (Option<String>, Option<String>) {
    let mut parts = name.split('.');
    let painting_index = parts.next().map(str::to_string);
    let fruit = parts.next().map(str::to_string);
    (painting_index, fruit)
}

impl RecordExtractor {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let rules = FIELD_RULES
            .iter()
            .map(|rule| -> Result<CompiledRule> {
                let mut rule = *rule;
                if rule.field == Field::Image {
                    rule.failure = config.extraction.image_failure;
                }
                Ok(CompiledRule {
                    rule,
                    selector: parse_selector(&format!(".{}", rule.class_marker))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            container: parse_selector(CONTAINER_SELECTOR)?,
            cell: parse_selector(CELL_SELECTOR)?,
            image: parse_selector(IMAGE_SELECTOR)?,
            rules,
            image_prefix: config.source.image_prefix.clone(),
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Extracts every cell of one results page, in document order.
    ///
    /// A page without a results container yields no records. `offset` only
    /// labels errors and log lines.
    pub fn extract(&self, html: &str, offset: u32) -> Result<Vec<PaintingRecord>> {
        let document = Html::parse_document(html);

        let Some(container) = document.select(&self.container).next() else {
            warn!("No results container on page at offset {}", offset);
            return Ok(Vec::new());
        };

        container
            .select(&self.cell)
            .enumerate()
            .map(|(idx, cell)| self.extract_cell(cell, offset, idx))
            .collect()
    }

    fn extract_cell(&self, cell: ElementRef, offset: u32, idx: usize) -> Result<PaintingRecord> {
        let mut record = PaintingRecord::default();

        for compiled in &self.rules {
            let rule = &compiled.rule;
            match self.read_value(cell, compiled) {
                Ok(value) => assign(&mut record, rule.field, value),
                Err(reason) => match rule.failure {
                    FailureMode::Soft if rule.field == Field::Image => {
                        warn!("Cell {} at offset {} has no usable image: {}", idx, offset, reason);
                    }
                    FailureMode::Soft => {
                        debug!("Cell {} at offset {}: {:?} left empty ({})", idx, offset, rule.field, reason);
                    }
                    FailureMode::Hard => {
                        return Err(ScrapeError::MissingField {
                            field: format!("{:?}", rule.field),
                            offset,
                            cell: idx,
                            reason,
                        });
                    }
                },
            }
        }

        Ok(record)
    }

    fn read_value(&self, cell: ElementRef, compiled: &CompiledRule) -> std::result::Result<String, String> {
        let rule = &compiled.rule;
        let element = cell
            .select(&compiled.selector)
            .nth(rule.match_index)
            .ok_or_else(|| {
                format!(
                    "no match #{} for .{}",
                    rule.match_index, rule.class_marker
                )
            })?;

        let raw = match rule.source {
            ValueSource::Text => element.text().collect::<String>(),
            ValueSource::NestedImageSrc => element
                .select(&self.image)
                .next()
                .ok_or_else(|| format!("no <img> inside .{}", rule.class_marker))?
                .value()
                .attr("src")
                .ok_or_else(|| "<img> has no src attribute".to_string())?
                .to_string(),
        };

        Ok(match rule.post {
            PostProcess::Raw => raw,
            PostProcess::StripControlWhitespace => strip_control_whitespace(&raw),
            PostProcess::AbsoluteImageUrl => {
                let path: String = raw.chars().skip(RELATIVE_PREFIX_LEN).collect();
                format!("{}{}", self.image_prefix, path)
            }
        })
    }
}

fn assign(record: &mut PaintingRecord, field: Field, value: String) {
    match field {
        Field::Name => {
            let (painting_index, fruit) = split_name(&value);
            record.painting_index = painting_index;
            record.fruit = fruit;
        }
        Field::Authors => record.authors = Some(value),
        Field::Subjects => record.subjects = Some(value),
        Field::Year => record.year = Some(value),
        Field::Image => record.set_thumbnail(value),
    }
}
