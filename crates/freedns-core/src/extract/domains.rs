//! Domain overview page (`/domain/`)
//!
//! The page is a stack of layout tables; one of them lists the account's
//! domains. Each domain cell holds the name in `<font><b>..</b></font>` and
//! management links whose query string carries the domain id.

use super::{PageExtractor, enclosing_cell, query_param_value, selector, text_of};
use crate::model::DomainMap;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Position of the domain table among all `<table>` elements on the page
///
/// Earlier console revisions used 5.
pub const DOMAIN_LIST_TABLE_INDEX: usize = 6;

/// Layout of the domain overview page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainListLayout {
    /// Zero-based index of the domain table in document order
    pub table_index: usize,
}

impl Default for DomainListLayout {
    fn default() -> Self {
        Self {
            table_index: DOMAIN_LIST_TABLE_INDEX,
        }
    }
}

impl PageExtractor for DomainListLayout {
    type Output = DomainMap;

    fn page_kind(&self) -> &'static str {
        "domain list"
    }

    fn extract(&self, document: &Html) -> DomainMap {
        let mut domains = DomainMap::new();

        let (Some(tables), Some(fonts), Some(bold), Some(anchors)) = (
            selector("table"),
            selector("tr td font"),
            selector("b"),
            selector("a"),
        ) else {
            return domains;
        };

        let Some(table) = document.select(&tables).nth(self.table_index) else {
            debug!(
                "Domain table #{} not found; page layout may have changed",
                self.table_index
            );
            return domains;
        };

        for font in table.select(&fonts) {
            let Some(name) = font.select(&bold).next().map(text_of) else {
                continue;
            };
            // Header and footer cells carry no dotted name
            if !name.contains('.') {
                continue;
            }

            let id = enclosing_cell(font)
                .and_then(|cell| cell.select(&anchors).next())
                .and_then(|anchor| anchor.value().attr("href"))
                .and_then(query_param_value);

            match id {
                Some(id) => domains.insert(name, id),
                None => debug!("Domain {} has no id link, skipping", name),
            }
        }

        debug!("Extracted {} domain(s)", domains.len());
        domains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::scrape;

    fn filler_tables(count: usize) -> String {
        "<table><tr><td>menu</td></tr></table>".repeat(count)
    }

    fn domain_page(rows: &str) -> String {
        format!(
            "<html><body>{}<table>\
             <tr><td><font><b>Domain</b></font></td></tr>\
             {}\
             </table></body></html>",
            filler_tables(DOMAIN_LIST_TABLE_INDEX),
            rows
        )
    }

    fn domain_row(name: &str, id: &str) -> String {
        format!(
            "<tr><td><font><b>{name}</b> (public)</font> \
             <a href=\"/subdomain/?limit={id}\">[Manage]</a> \
             <a href=\"/domain/delete.php?domain_id={id}\">[Delete]</a></td></tr>"
        )
    }

    #[test]
    fn test_extracts_domains_in_both_directions() {
        let page = domain_page(&format!(
            "{}{}",
            domain_row("example.com", "1001"),
            domain_row("example.org", "1002")
        ));

        let scraped = scrape(&page, &DomainListLayout::default());
        assert!(scraped.is_clean());
        let domains = scraped.data;
        assert_eq!(domains.len(), 2);
        assert_eq!(domains.id_of("example.com"), Some("1001"));
        assert_eq!(domains.name_of("1002"), Some("example.org"));
    }

    #[test]
    fn test_header_rows_are_skipped() {
        let scraped = scrape(&domain_page(""), &DomainListLayout::default());
        assert!(scraped.data.is_empty());
    }

    #[test]
    fn test_wrong_table_index_yields_nothing() {
        let page = domain_page(&domain_row("example.com", "1001"));
        let layout = DomainListLayout { table_index: 5 };
        assert!(scrape(&page, &layout).data.is_empty());

        let layout = DomainListLayout { table_index: 40 };
        assert!(scrape(&page, &layout).data.is_empty());
    }

    #[test]
    fn test_domain_without_link_is_skipped() {
        let page = domain_page(
            "<tr><td><font><b>orphan.com</b></font></td></tr>\
             <tr><td><font><b>example.com</b></font><a href=\"/subdomain/?limit=5\">x</a></td></tr>",
        );
        let domains = scrape(&page, &DomainListLayout::default()).data;
        assert_eq!(domains.len(), 1);
        assert_eq!(domains.id_of("example.com"), Some("5"));
        assert_eq!(domains.id_of("orphan.com"), None);
    }

    #[test]
    fn test_banner_with_partial_rows() {
        let page = format!(
            "<ul><li><font>Session expired</font></li></ul>{}",
            domain_page(&domain_row("example.com", "1001"))
        );
        let scraped = scrape(&page, &DomainListLayout::default());
        assert_eq!(scraped.banner.as_deref(), Some("Session expired"));
        assert_eq!(scraped.data.len(), 1);
    }
}
