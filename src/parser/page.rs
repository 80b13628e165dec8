use tracing::{debug, info, warn};

use super::definition::{parse_definition, Pattern};
use super::dom::DocNode;
use crate::error::ScrapeError;
use crate::model::{Mode, PropertyDefinition, PropertyRecord};

const MANUAL_CLASS: &str = "manual";
const BODY_CONTENT_ID: &str = "bodyContent";
const TOC_MARKER: &str = "toc";
const STYLED_TABLE_CLASS: &str = "styled_table";

const HEADING_TAGS: &[&str] = &["b", "strong", "h1", "h2", "h3", "h4", "h5", "h6"];
const SCOPE_TOKENS: &[&str] = &["submenu", "sub-menu", "command"];
const READ_ONLY_TOKENS: &[&str] = &["readonly", "read-only", "read only"];

/// Something worth reporting about a page that did not stop extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    ScopeChanged { commands: Vec<String> },
    AmbiguousScope { used: String, ignored: Vec<String> },
    ReadOnlyMarker,
    TableWithoutHeader,
    NotPropertyTable { header: String },
    TableWithoutScope,
    UnparsedRow { definition: String },
    FallbackParse { definition: String },
    ReadOnlyWithDefault { property: String, default: String },
    MissingDescription { property: String },
}

impl Diagnostic {
    pub fn is_skipped_table(&self) -> bool {
        matches!(
            self,
            Self::TableWithoutHeader | Self::NotPropertyTable { .. } | Self::TableWithoutScope
        )
    }

    pub fn is_skipped_row(&self) -> bool {
        matches!(self, Self::UnparsedRow { .. })
    }

    pub fn emit(&self, page: &str) {
        match self {
            Self::ScopeChanged { commands } => {
                debug!(page, ?commands, "command scope changed")
            }
            Self::AmbiguousScope { used, ignored } => {
                info!(page, used = %used, ?ignored, "several command declarations, using the first")
            }
            Self::ReadOnlyMarker => debug!(page, "next property table is read-only"),
            Self::TableWithoutHeader => warn!(page, "skipping table without header cells"),
            Self::NotPropertyTable { header } => {
                warn!(page, header = %header, "skipping non-property table")
            }
            Self::TableWithoutScope => {
                warn!(page, "skipping property table with no command in scope")
            }
            Self::UnparsedRow { definition } => {
                warn!(page, definition = %definition, "unable to parse definition")
            }
            Self::FallbackParse { definition } => {
                debug!(page, definition = %definition, "parsed definition with fallback pattern")
            }
            Self::ReadOnlyWithDefault { property, default } => {
                warn!(page, property = %property, default = %default, "read-only property declares a default")
            }
            Self::MissingDescription { property } => {
                warn!(page, property = %property, "row has no description cell")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct PageExtract {
    pub records: Vec<PropertyRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Traversal state carried from one top-level child to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    pub current_commands: Option<Vec<String>>,
    pub read_only: bool,
}

/// Walk the manual container of a page and collect every property row,
/// once per command path in scope.
pub fn extract<N: DocNode>(root: N) -> Result<PageExtract, ScrapeError> {
    let container = find_container(root).ok_or(ScrapeError::MissingContainer)?;
    let mut ctx = CommandContext::default();
    let mut out = PageExtract::default();

    for child in container.element_children() {
        if is_toc_block(&child) {
            continue;
        }
        if let Some(commands) = declared_commands(child, &mut out.diagnostics) {
            out.diagnostics.push(Diagnostic::ScopeChanged {
                commands: commands.clone(),
            });
            ctx.current_commands = Some(commands);
        }
        if mentions_read_only(child) {
            out.diagnostics.push(Diagnostic::ReadOnlyMarker);
            ctx.read_only = true;
        }
        if child.has_class(STYLED_TABLE_CLASS) {
            extract_table(child, &ctx, &mut out);
            ctx.read_only = false;
        }
    }

    Ok(out)
}

fn find_container<N: DocNode>(root: N) -> Option<N> {
    let nodes = root.subtree();
    nodes
        .iter()
        .find(|n| n.has_class(MANUAL_CLASS))
        .or_else(|| nodes.iter().find(|n| n.attribute("id") == Some(BODY_CONTENT_ID)))
        .copied()
}

fn is_toc_block<N: DocNode>(node: &N) -> bool {
    node.attribute("id") == Some(TOC_MARKER) || node.has_class(TOC_MARKER)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// Command paths declared by `node`, if it carries a sub-menu/command heading
/// and at least one `<code>` span starting with `/`.
fn declared_commands<N: DocNode>(node: N, diagnostics: &mut Vec<Diagnostic>) -> Option<Vec<String>> {
    let subtree = node.subtree();
    let has_heading = subtree.iter().any(|n| {
        HEADING_TAGS.contains(&n.tag_name()) && contains_any(&n.text_content(), SCOPE_TOKENS)
    });
    if !has_heading {
        return None;
    }

    let paths: Vec<String> = subtree
        .iter()
        .filter(|n| n.tag_name() == "code")
        .map(|n| n.text_content().trim().to_string())
        .filter(|t| t.starts_with('/'))
        .collect();
    let (first, rest) = paths.split_first()?;
    if !rest.is_empty() {
        diagnostics.push(Diagnostic::AmbiguousScope {
            used: first.clone(),
            ignored: rest.to_vec(),
        });
    }

    Some(
        first
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}

fn mentions_read_only<N: DocNode>(node: N) -> bool {
    contains_any(&node.text_content(), READ_ONLY_TOKENS)
}

fn extract_table<N: DocNode>(table: N, ctx: &CommandContext, out: &mut PageExtract) {
    let Some(first_header) = table.find_all("th").into_iter().next() else {
        out.diagnostics.push(Diagnostic::TableWithoutHeader);
        return;
    };
    let header = first_header.text_content().trim().to_lowercase();
    if header != "property" {
        out.diagnostics.push(Diagnostic::NotPropertyTable { header });
        return;
    }
    let Some(commands) = ctx.current_commands.as_deref() else {
        out.diagnostics.push(Diagnostic::TableWithoutScope);
        return;
    };
    let mode = if ctx.read_only {
        Mode::ReadOnly
    } else {
        Mode::ReadWrite
    };

    for row in table.find_all("tr") {
        let cells: Vec<N> = row
            .element_children()
            .into_iter()
            .filter(|c| c.tag_name() == "td")
            .collect();
        let Some(first) = cells.first() else {
            continue;
        };

        let definition = first.text_content();
        let Some(parsed) = parse_definition(&definition) else {
            out.diagnostics.push(Diagnostic::UnparsedRow {
                definition: definition.trim().to_string(),
            });
            continue;
        };
        if parsed.pattern == Pattern::Fallback {
            out.diagnostics.push(Diagnostic::FallbackParse {
                definition: definition.trim().to_string(),
            });
        }
        if let (true, Some(default)) = (ctx.read_only, &parsed.default) {
            out.diagnostics.push(Diagnostic::ReadOnlyWithDefault {
                property: parsed.name.clone(),
                default: default.clone(),
            });
        }

        let description = match cells.get(1) {
            Some(cell) => cell.text_content().trim().to_string(),
            None => {
                out.diagnostics.push(Diagnostic::MissingDescription {
                    property: parsed.name.clone(),
                });
                String::new()
            }
        };

        let info = PropertyDefinition {
            mode,
            values: parsed.values,
            default: parsed.default,
            description,
        };
        for command in commands {
            out.records.push(PropertyRecord {
                name: parsed.name.clone(),
                command: command.clone(),
                info: info.clone(),
            });
        }
    }
}
