//! Listing extraction with per-job CSS selectors.
//!
//! Field selectors are always evaluated inside one listing container, so a
//! listing without a price never picks up its neighbour's.

use pricewatch_common::{JobSpec, RawRecord, NOT_AVAILABLE};
use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;

/// Result of looking up one field inside a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Found(String),
    Missing,
}

impl Field {
    /// The found value, or the `N/A` sentinel.
    pub fn into_value(self) -> String {
        match self {
            Field::Found(value) => value,
            Field::Missing => NOT_AVAILABLE.to_string(),
        }
    }
}

/// The four selectors of a job, compiled once per run.
#[derive(Debug)]
pub struct SelectorSet {
    listing: Selector,
    title: Selector,
    price: Selector,
    url: Selector,
}

fn parse_selector(field: &'static str, raw: &str) -> Result<Selector, ParseError> {
    Selector::parse(raw).map_err(|e| ParseError::InvalidSelector {
        field,
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}

impl SelectorSet {
    pub fn compile(job: &JobSpec) -> Result<Self, ParseError> {
        Ok(Self {
            listing: parse_selector("listing", &job.listing_selector)?,
            title: parse_selector("title", &job.title_selector)?,
            price: parse_selector("price", &job.price_selector)?,
            url: parse_selector("url", &job.url_selector)?,
        })
    }

    /// Lazily yields one record per listing container, in document order.
    pub fn records<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = RawRecord> + 'a {
        document
            .select(&self.listing)
            .map(move |listing| self.record(listing))
    }

    fn record(&self, listing: ElementRef<'_>) -> RawRecord {
        RawRecord {
            title: first_text(listing, &self.title).into_value(),
            price: first_text(listing, &self.price).into_value(),
            url: first_href(listing, &self.url).into_value(),
        }
    }
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Field {
    scope
        .select(selector)
        .next()
        .map(|el| Field::Found(el.text().collect::<String>().trim().to_string()))
        .unwrap_or(Field::Missing)
}

/// Raw `href` of the first match. Relative paths are kept as they are.
fn first_href(scope: ElementRef<'_>, selector: &Selector) -> Field {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| Field::Found(href.to_string()))
        .unwrap_or(Field::Missing)
}

/// Parses `html` and extracts every listing of `job`.
pub fn extract(html: &str, job: &JobSpec) -> Result<Vec<RawRecord>, ParseError> {
    let selectors = SelectorSet::compile(job)?;
    let document = Html::parse_document(html);
    Ok(selectors.records(&document).collect())
}
