use std::sync::LazyLock;

use anyhow::Result;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::error::ScrapeError;
use crate::fetch::PageSource;

static INDEX_TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[id="shtable"]"#).unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Menu name -> page URLs, in the order menus first appear on the TOC page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuToc {
    menus: Vec<(String, Vec<String>)>,
}

impl MenuToc {
    /// A repeated menu name replaces the earlier page list but keeps its slot.
    fn insert(&mut self, menu: String, pages: Vec<String>) {
        match self.menus.iter_mut().find(|(m, _)| *m == menu) {
            Some(entry) => entry.1 = pages,
            None => self.menus.push((menu, pages)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.menus.iter().map(|(m, p)| (m.as_str(), p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn page_count(&self) -> usize {
        self.menus.iter().map(|(_, p)| p.len()).sum()
    }
}

/// Fetch the TOC page below `root` and read its menu index tables.
pub fn discover(source: &dyn PageSource, root: &Url, toc_path: &str) -> Result<MenuToc> {
    let toc_url = resolve(root, toc_path)?;
    info!("Fetching table of contents: {}", toc_url);
    let html = source.fetch(&toc_url)?;
    let toc = parse_toc(&html, root)?;
    info!("Found {} menus, {} pages", toc.len(), toc.page_count());
    Ok(toc)
}

/// Each `#shtable` is a two-row grid: menu names in row one, link lists in
/// the same column of row two.
pub fn parse_toc(html: &str, root: &Url) -> Result<MenuToc, ScrapeError> {
    let document = Html::parse_document(html);
    let tables: Vec<ElementRef> = document.select(&INDEX_TABLE_SELECTOR).collect();
    if tables.is_empty() {
        return Err(ScrapeError::MissingTocTable);
    }

    let mut toc = MenuToc::default();
    for (idx, table) in tables.iter().enumerate() {
        let rows: Vec<ElementRef> = table.select(&ROW_SELECTOR).collect();
        let heads = rows
            .first()
            .ok_or(ScrapeError::MissingTocRow { table: idx, row: 0 })?;
        let lists = rows
            .get(1)
            .ok_or(ScrapeError::MissingTocRow { table: idx, row: 1 })?;

        let list_cells: Vec<ElementRef> = lists.select(&CELL_SELECTOR).collect();
        for (column, head) in heads.select(&CELL_SELECTOR).enumerate() {
            let list = list_cells
                .get(column)
                .ok_or(ScrapeError::MissingTocCell { table: idx, column })?;
            let menu = head.text().collect::<String>().trim().to_string();
            if menu.is_empty() {
                continue;
            }
            let pages = list
                .select(&LINK_SELECTOR)
                .filter_map(|a| a.value().attr("href"))
                .map(|href| resolve(root, href))
                .collect::<Result<Vec<_>, _>>()?;
            toc.insert(menu, pages);
        }
    }

    Ok(toc)
}

fn resolve(root: &Url, href: &str) -> Result<String, ScrapeError> {
    root.join(href)
        .map(String::from)
        .map_err(|e| ScrapeError::InvalidUrl {
            href: href.to_string(),
            reason: e.to_string(),
        })
}
