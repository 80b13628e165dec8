use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::fetch::PageSource;
use crate::model::{AggregatedProperty, PropertyRecord, References};
use crate::parser;
use crate::settings::Settings;
use crate::toc;

/// Folds records into one entry per property name.
///
/// Entries keep first-encounter order. Within an entry a later record for
/// the same command replaces the earlier one; other commands are untouched.
#[derive(Debug, Default)]
pub struct Aggregator {
    index: HashMap<String, usize>,
    properties: Vec<AggregatedProperty>,
}

impl Aggregator {
    pub fn add(&mut self, record: PropertyRecord) {
        let slot = match self.index.get(&record.name).copied() {
            Some(i) => i,
            None => {
                self.index.insert(record.name.clone(), self.properties.len());
                self.properties.push(AggregatedProperty {
                    name: record.name,
                    references: References::default(),
                });
                self.properties.len() - 1
            }
        };
        self.properties[slot]
            .references
            .upsert(record.command, record.info);
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn into_properties(self) -> Vec<AggregatedProperty> {
        self.properties
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub menus: usize,
    pub pages: usize,
    pub records: usize,
    pub properties: usize,
    pub skipped_tables: usize,
    pub skipped_rows: usize,
}

impl RunStats {
    pub fn summary(&self, elapsed: Duration) -> String {
        format!(
            "Scraped {} pages in {} menus: {} records, {} properties ({} tables, {} rows skipped) in {:.1}s.",
            self.pages,
            self.menus,
            self.records,
            self.properties,
            self.skipped_tables,
            self.skipped_rows,
            elapsed.as_secs_f64(),
        )
    }
}

pub struct ScrapeOutput {
    pub properties: Vec<AggregatedProperty>,
    pub stats: RunStats,
}

/// Discover the TOC, then extract and merge every page it links, in order.
/// Any fetch or container failure aborts the whole run.
pub fn run(source: &dyn PageSource, settings: &Settings) -> Result<ScrapeOutput> {
    let root = settings.root()?;
    let toc = toc::discover(source, &root, &settings.toc_path)?;

    let pb = ProgressBar::new(toc.page_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut aggregator = Aggregator::default();
    let mut stats = RunStats {
        menus: toc.len(),
        ..Default::default()
    };

    for (menu, pages) in toc.iter() {
        info!("Processing menu: {}", menu);
        pb.set_message(menu.to_string());
        for url in pages {
            debug!("Processing page: {}", url);
            let html = source.fetch(url)?;
            let page = parser::extract_page(&html).with_context(|| format!("Failed to extract {url}"))?;

            for diagnostic in &page.diagnostics {
                diagnostic.emit(url);
                if diagnostic.is_skipped_table() {
                    stats.skipped_tables += 1;
                } else if diagnostic.is_skipped_row() {
                    stats.skipped_rows += 1;
                }
            }

            stats.pages += 1;
            stats.records += page.records.len();
            for record in page.records {
                aggregator.add(record);
            }
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    stats.properties = aggregator.len();
    info!(
        "Collected {} properties from {} pages",
        stats.properties, stats.pages
    );

    Ok(ScrapeOutput {
        properties: aggregator.into_properties(),
        stats,
    })
}
