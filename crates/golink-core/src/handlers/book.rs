// crates/golink-core/src/handlers/book.rs - Consolidated book notes
//
// format: go://book/<slug>
//
// Every book lives in one file; each entry carries an
// `:EXPORT_FILE_NAME: <slug>` property, and the slug in the URI picks it.

use std::rc::Rc;

use super::{ServiceHandler, locate_or_warn};
use crate::config::BookConfig;
use crate::editor::FileOpener;
use crate::error::Result;
use crate::request::Query;

/// Handles the book service
pub struct BookHandler {
    config: BookConfig,
    opener: Rc<dyn FileOpener>,
}

impl BookHandler {
    pub fn new(config: BookConfig, opener: Rc<dyn FileOpener>) -> Self {
        Self { config, opener }
    }
}

impl ServiceHandler for BookHandler {
    /// Open the book file at the entry whose export name is `path`
    ///
    /// Exactly one leading `/` is dropped to get the slug, which is then
    /// looked up on `:EXPORT_FILE_NAME:` lines. The query is ignored.
    ///
    /// ERROR HANDLING:
    /// An unknown slug or unreadable file is logged as a warning and the file
    /// opens at line 0; only the opener's error fails the request.
    fn handle(&self, path: &str, _query: &Query) -> Result<()> {
        let slug = path.strip_prefix('/').unwrap_or(path);
        let line = locate_or_warn(&self.config.file, slug, &self.config.property_prefix);

        self.opener.open(&self.config.file, line)?;
        Ok(())
    }
}
