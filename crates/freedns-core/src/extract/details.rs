//! Record edit page (`/subdomain/edit.php?data_id=<record id>`)
//!
//! The edit form is a two-column table: a label cell and a cell holding the
//! form control. Each field lives on a fixed row and is read from the
//! control's attributes rather than the label.

use super::{PageExtractor, row_cell, selector, text_of};
use crate::model::RecordDetails;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rows of the edit form
pub const RECORD_DETAIL_ROW_SELECTOR: &str = "form table tr";

/// Cell holding the form control in each row
pub const DETAIL_CONTROL_CELL: usize = 1;

/// `<select name="type">`
pub const DETAIL_TYPE_ROW: usize = 1;
/// `<input name="subdomain">`
pub const DETAIL_HOST_ROW: usize = 2;
/// `<select name="domain_id">`
pub const DETAIL_DOMAIN_ROW: usize = 3;
/// `<textarea name="address">`
pub const DETAIL_VALUE_ROW: usize = 4;
/// `<input name="ttlalias">`
pub const DETAIL_TTL_ROW: usize = 5;
/// `<input type="checkbox" name="wildcard">`
pub const DETAIL_WILDCARD_ROW: usize = 6;

/// Layout of the record edit page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordDetailLayout {
    /// CSS selector for the form rows
    pub row_selector: String,
    /// Index of the control cell within a row
    pub control_cell: usize,
    /// Row of the record type select
    pub type_row: usize,
    /// Row of the host input
    pub host_row: usize,
    /// Row of the domain select
    pub domain_row: usize,
    /// Row of the destination textarea
    pub value_row: usize,
    /// Row of the TTL input
    pub ttl_row: usize,
    /// Row of the wildcard checkbox
    pub wildcard_row: usize,
}

impl Default for RecordDetailLayout {
    fn default() -> Self {
        Self {
            row_selector: RECORD_DETAIL_ROW_SELECTOR.to_string(),
            control_cell: DETAIL_CONTROL_CELL,
            type_row: DETAIL_TYPE_ROW,
            host_row: DETAIL_HOST_ROW,
            domain_row: DETAIL_DOMAIN_ROW,
            value_row: DETAIL_VALUE_ROW,
            ttl_row: DETAIL_TTL_ROW,
            wildcard_row: DETAIL_WILDCARD_ROW,
        }
    }
}

impl PageExtractor for RecordDetailLayout {
    type Output = RecordDetails;

    fn page_kind(&self) -> &'static str {
        "record details"
    }

    /// The record id is not on the page; the caller fills it in.
    fn extract(&self, document: &Html) -> RecordDetails {
        let Some(rows) = selector(&self.row_selector) else {
            return RecordDetails::default();
        };
        let rows: Vec<ElementRef<'_>> = document.select(&rows).collect();
        let control = |row: usize| {
            rows.get(row)
                .and_then(|r| row_cell(*r, self.control_cell))
        };

        let record_type = control(self.type_row)
            .map(|cell| match selected_option(cell) {
                Some(option) => option_value(option),
                None => text_of(cell),
            })
            .unwrap_or_default();

        let host = control(self.host_row)
            .map(|cell| input_value(cell).unwrap_or_else(|| text_of(cell)))
            .unwrap_or_default();

        let (domain_id, domain) = control(self.domain_row)
            .map(|cell| match selected_option(cell) {
                Some(option) => (
                    option.value().attr("value").unwrap_or_default().to_string(),
                    first_word(&text_of(option)),
                ),
                None => (String::new(), first_word(&text_of(cell))),
            })
            .unwrap_or_default();

        let value = control(self.value_row)
            .map(|cell| {
                textarea_text(cell)
                    .or_else(|| input_value(cell))
                    .unwrap_or_else(|| text_of(cell))
            })
            .unwrap_or_default();

        // Plain-text TTL cells are upsell notices, not values
        let ttl = control(self.ttl_row)
            .and_then(input_value)
            .unwrap_or_default();

        let wildcard = control(self.wildcard_row)
            .map(is_checked)
            .unwrap_or(false);

        if rows.is_empty() {
            debug!("Record edit form not found; page layout may have changed");
        }

        RecordDetails {
            id: String::new(),
            fqdn: fqdn(&host, &domain),
            record_type,
            host,
            domain_id,
            domain,
            value,
            ttl,
            wildcard: if wildcard { "1" } else { "0" }.to_string(),
        }
    }
}

fn fqdn(host: &str, domain: &str) -> String {
    match (host.is_empty(), domain.is_empty()) {
        (true, _) => domain.to_string(),
        (false, true) => host.to_string(),
        (false, false) => format!("{}.{}", host, domain),
    }
}

fn first_word(text: &str) -> String {
    text.split_whitespace().next().unwrap_or_default().to_string()
}

/// The selected option, or the first one as a browser would show it
fn selected_option(cell: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let selected = selector("option[selected]")?;
    let any = selector("option")?;
    cell.select(&selected)
        .next()
        .or_else(|| cell.select(&any).next())
}

fn option_value(option: ElementRef<'_>) -> String {
    match option.value().attr("value") {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => text_of(option),
    }
}

fn input_value(cell: ElementRef<'_>) -> Option<String> {
    let inputs = selector("input:not([type=checkbox]):not([type=hidden])")?;
    cell.select(&inputs)
        .next()
        .map(|input| input.value().attr("value").unwrap_or_default().to_string())
}

/// Textarea content as submitted, surrounding whitespace included
fn textarea_text(cell: ElementRef<'_>) -> Option<String> {
    let textareas = selector("textarea")?;
    cell.select(&textareas)
        .next()
        .map(|textarea| textarea.text().collect())
}

fn is_checked(cell: ElementRef<'_>) -> bool {
    selector("input[type=checkbox]")
        .and_then(|checkbox| cell.select(&checkbox).next())
        .is_some_and(|input| input.value().attr("checked").is_some())
}
