pub mod definition;
pub mod dom;
pub mod page;

use scraper::Html;

use crate::error::ScrapeError;
use page::PageExtract;

/// HTML -> parsed tree -> property records for one manual page.
pub fn extract_page(html: &str) -> Result<PageExtract, ScrapeError> {
    let document = Html::parse_document(html);
    page::extract(document.root_element())
}
