//! Record listing of one domain (`/subdomain/?limit=<domain id>`)
//!
//! Rows look like
//!
//! ```text
//! <tr><td><a href="edit.php?data_id=ID">host.example.com</a></td><td>A</td><td>1.2.3.4</td></tr>
//! ```
//!
//! Long destinations are cut short and suffixed with an ellipsis; the facade
//! fetches the edit page for those.

use super::{PageExtractor, enclosing_cell, query_param_value, selector, sibling_cell, text_of};
use crate::model::{Record, RecordMap};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rows considered for record extraction
pub const RECORD_LIST_ROW_SELECTOR: &str = "form table tr";

/// Columns between the name cell and the type cell
pub const RECORD_TYPE_COLUMN_OFFSET: usize = 1;

/// Columns between the name cell and the destination cell
pub const RECORD_VALUE_COLUMN_OFFSET: usize = 2;

/// Layout of the record listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordListLayout {
    /// CSS selector for candidate rows
    pub row_selector: String,
    /// Column offset of the type cell relative to the name cell
    pub type_offset: usize,
    /// Column offset of the value cell relative to the name cell
    pub value_offset: usize,
}

impl Default for RecordListLayout {
    fn default() -> Self {
        Self {
            row_selector: RECORD_LIST_ROW_SELECTOR.to_string(),
            type_offset: RECORD_TYPE_COLUMN_OFFSET,
            value_offset: RECORD_VALUE_COLUMN_OFFSET,
        }
    }
}

impl PageExtractor for RecordListLayout {
    type Output = RecordMap;

    fn page_kind(&self) -> &'static str {
        "record list"
    }

    fn extract(&self, document: &Html) -> RecordMap {
        let mut records = RecordMap::new();

        let (Some(rows), Some(anchors)) = (selector(&self.row_selector), selector("td a")) else {
            return records;
        };

        for row in document.select(&rows) {
            let Some(anchor) = row.select(&anchors).next() else {
                continue;
            };
            let name = text_of(anchor);
            if !name.contains('.') {
                continue;
            }

            let Some(id) = anchor.value().attr("href").and_then(query_param_value) else {
                debug!("Record row {} has no id link, skipping", name);
                continue;
            };

            let cell = enclosing_cell(anchor);
            let column = |offset: usize| {
                cell.and_then(|c| sibling_cell(c, offset))
                    .map(text_of)
                    .unwrap_or_default()
            };

            records.insert(
                id.to_string(),
                Record {
                    id: id.to_string(),
                    name,
                    record_type: column(self.type_offset),
                    value: column(self.value_offset),
                },
            );
        }

        debug!("Extracted {} record(s)", records.len());
        records
    }
}
