// crates/golink-core/src/handlers/mod.rs - Service handlers
//
// One handler per URI host. A handler turns the request path (and maybe the
// query) into a file plus a line, then asks its `FileOpener` to show it.
//
// LOOKUP POLICY:
// A failed header lookup never fails the request. Whether the heading is
// missing or the file itself cannot be read, the handler logs a warning and
// opens the file at line 0; the editor is better placed to report a missing
// file than we are.

pub mod book;
pub mod journal;

pub use book::BookHandler;
pub use journal::JournalHandler;

use std::path::Path;

use crate::error::Result;
use crate::locator::find_header_line;
use crate::request::Query;

/// Behavior registered under a service name
pub trait ServiceHandler {
    fn handle(&self, path: &str, query: &Query) -> Result<()>;
}

/// Line of the first header matching `term`, or 0 with a warning
fn locate_or_warn(file: &Path, term: &str, prefix: &str) -> usize {
    match find_header_line(file, term.as_bytes(), prefix.as_bytes()) {
        Ok(line) => line,
        Err(err) => {
            tracing::warn!("{err}");
            0
        }
    }
}
