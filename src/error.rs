use thiserror::Error;

/// Structural failures that abort the run.
///
/// Recoverable problems inside a page (odd tables, unparsable rows) are not
/// errors; they surface as [`crate::parser::page::Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("page has neither a .manual nor a #bodyContent container")]
    MissingContainer,

    #[error("table of contents has no #shtable index tables")]
    MissingTocTable,

    #[error("table of contents index #{table} is missing row {row}")]
    MissingTocRow { table: usize, row: usize },

    #[error("table of contents index #{table} has no link cell in column {column}")]
    MissingTocCell { table: usize, column: usize },

    #[error("cannot resolve link {href:?}: {reason}")]
    InvalidUrl { href: String, reason: String },

    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}
