//! HTML extraction engine
//!
//! The console has no API, only server-rendered pages. Each page type gets a
//! layout struct implementing [`PageExtractor`]; the layout owns every magic
//! number for that page (table index, row indices, column offsets) so a
//! markup change on the provider side means editing one default, or
//! overriding it from configuration.
//!
//! Extraction never fails. Missing tables, rows without anchors and anchors
//! without ids all degrade to "nothing extracted" or empty strings. The one
//! signal the console does give, the inline error banner, is returned next
//! to the data in [`Scraped`].
//!
//! ```text
//! body ──parse──▶ Html ──┬── error_banner() ──▶ banner
//!                        └── layout.extract() ─▶ data
//! ```

pub mod details;
pub mod domains;
pub mod records;

pub use details::RecordDetailLayout;
pub use domains::DomainListLayout;
pub use records::RecordListLayout;

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where the console renders its inline error messages
pub const ERROR_BANNER_SELECTOR: &str = "li font";

/// A pure `(document) -> model` extraction for one page type
pub trait PageExtractor {
    /// Model produced from the page
    type Output;

    /// Short page name for logs
    fn page_kind(&self) -> &'static str;

    /// Pull the model out of a parsed page
    fn extract(&self, document: &Html) -> Self::Output;
}

/// Data extracted from a page plus the banner found next to it
///
/// A page can carry both: the console may render an error and still list
/// whatever rows it has.
#[must_use = "the page may carry an error banner next to the data"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scraped<T> {
    /// Whatever the layout could extract
    pub data: T,
    /// Inline error text, verbatim
    pub banner: Option<String>,
}

impl<T> Scraped<T> {
    /// Data without a banner
    pub fn clean(data: T) -> Self {
        Self { data, banner: None }
    }

    /// Whether the page carried no error banner
    pub fn is_clean(&self) -> bool {
        self.banner.is_none()
    }

    /// The banner as an error, if any
    pub fn provider_error(&self) -> Option<Error> {
        self.banner.as_deref().map(Error::provider_reported)
    }

    /// The data, or the banner as [`Error::ProviderReported`]
    pub fn into_result(self) -> Result<T> {
        match self.banner {
            Some(msg) => Err(Error::ProviderReported(msg)),
            None => Ok(self.data),
        }
    }

    /// Transform the data, keeping the banner
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Scraped<U> {
        Scraped {
            data: f(self.data),
            banner: self.banner,
        }
    }
}

/// Pages that only acknowledge a mutation (create/delete)
#[derive(Debug, Clone, Copy, Default)]
pub struct AckPage;

impl PageExtractor for AckPage {
    type Output = ();

    fn page_kind(&self) -> &'static str {
        "acknowledgement"
    }

    fn extract(&self, _document: &Html) {}
}

/// Every page layout, overridable as a unit from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayouts {
    /// Domain overview page
    pub domains: DomainListLayout,
    /// Record listing of one domain
    pub records: RecordListLayout,
    /// Edit page of one record
    pub details: RecordDetailLayout,
}

impl PageLayouts {
    /// Check that configured selectors parse
    pub fn validate(&self) -> Result<()> {
        for (name, css) in [
            ("records.row_selector", &self.records.row_selector),
            ("details.row_selector", &self.details.row_selector),
        ] {
            Selector::parse(css)
                .map_err(|e| Error::config(format!("layout {} is not a valid selector: {:?}", name, e)))?;
        }
        Ok(())
    }
}

/// Parse `body` and run `extractor` over it
pub fn scrape<E: PageExtractor>(body: &str, extractor: &E) -> Scraped<E::Output> {
    let document = Html::parse_document(body);
    let banner = error_banner(&document);
    if let Some(ref msg) = banner {
        debug!("{} page carries error banner: {}", extractor.page_kind(), msg);
    }

    Scraped {
        data: extractor.extract(&document),
        banner,
    }
}

/// Text of the inline error banner, if the page has a non-empty one
pub fn error_banner(document: &Html) -> Option<String> {
    let banner_selector = selector(ERROR_BANNER_SELECTOR)?;
    let text = document
        .select(&banner_selector)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!text.is_empty()).then_some(text)
}

/// Value of the first query parameter in an `href`
///
/// `edit.php?data_id=123` yields `123`. No `=` or an empty value yields
/// `None`, which callers treat as "not a data row".
pub fn query_param_value(href: &str) -> Option<&str> {
    let (_, rest) = href.split_once('=')?;
    let value = rest.split(['&', '#']).next().unwrap_or_default();
    (!value.is_empty()).then_some(value)
}

pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!("Ignoring unparsable selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// Concatenated, trimmed text of an element
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn is_cell(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "td" | "th")
}

/// Nearest `td`/`th` containing `element`
pub(crate) fn enclosing_cell(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(is_cell)
}

/// The cell `offset` columns to the right of `cell` (0 is `cell` itself)
pub(crate) fn sibling_cell(cell: ElementRef<'_>, offset: usize) -> Option<ElementRef<'_>> {
    if offset == 0 {
        return Some(cell);
    }
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(is_cell)
        .nth(offset - 1)
}

/// The `index`-th cell of a row
pub(crate) fn row_cell(row: ElementRef<'_>, index: usize) -> Option<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(is_cell)
        .nth(index)
}
