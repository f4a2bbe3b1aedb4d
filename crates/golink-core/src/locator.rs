// crates/golink-core/src/locator.rs - Header line lookup in org files
//
// Finds the line a handler should jump to. Org files mark navigable lines with
// a fixed leading marker: outline headings start with `*`, file-scoped export
// properties start with `:EXPORT_FILE_NAME:`. A line qualifies as a candidate
// when it starts with the marker, and the first candidate that contains the
// search term anywhere wins.
//
// ALGORITHM:
// 1. Open the file read-only and wrap it in a BufReader
// 2. Read one line at a time into a reused buffer (never the whole file)
// 3. Drop the line terminator, test prefix, then test substring
// 4. Return the 1-based number of the first hit
//
// Matching is on raw bytes: no Unicode normalization, case-sensitive.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while scanning a file for a header line
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to find {term:?} header")]
    HeaderNotFound { term: String },
}

impl LocateError {
    /// True when the file was readable but nothing matched
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HeaderNotFound { .. })
    }
}

/// Result type for locator operations
pub type LocateResult<T> = Result<T, LocateError>;

/// A header lookup: which lines are candidates, and what they must contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSearch<'a> {
    prefix: &'a [u8],
    term: &'a [u8],
}

impl<'a> HeaderSearch<'a> {
    pub fn new(prefix: &'a [u8], term: &'a [u8]) -> Self {
        Self { prefix, term }
    }

    /// Whether a single line (without its terminator) is a match
    pub fn matches(&self, line: &[u8]) -> bool {
        line.starts_with(self.prefix) && contains(line, self.term)
    }

    /// Scan a file on disk. The handle is closed when this returns.
    pub fn find_in_file(&self, path: &Path) -> LocateResult<usize> {
        let file = File::open(path).map_err(|source| LocateError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        self.find_in_reader(BufReader::new(file))
            .map_err(|err| match err {
                LocateError::Read { source, .. } => LocateError::Read {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })
    }

    /// Scan any buffered reader line by line
    ///
    /// SCANNING:
    /// - One reused buffer filled by `read_until(b'\n')`, so lines are bytes
    ///   and need not be UTF-8
    /// - Line numbers start at 1; a last line without `\n` is still scanned
    /// - `\n` and a preceding `\r` are stripped before matching
    /// - The first matching line wins and the scan stops there
    ///
    /// ERROR HANDLING:
    /// - `Read` on an I/O error mid-scan, with an empty path that
    ///   `find_in_file` fills in
    /// - `HeaderNotFound` once the reader is exhausted without a match
    pub fn find_in_reader<R: BufRead>(&self, mut reader: R) -> LocateResult<usize> {
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| LocateError::Read {
                    path: PathBuf::new(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_no += 1;

            if self.matches(strip_terminator(&buf)) {
                return Ok(line_no);
            }
        }

        Err(LocateError::HeaderNotFound {
            term: String::from_utf8_lossy(self.term).into_owned(),
        })
    }
}

/// Find the 1-based line number of the first line starting with `prefix`
/// that contains `term`.
///
/// Matching is byte-level and case-sensitive. An empty `term` matches the
/// first line carrying `prefix`.
///
/// ERROR HANDLING:
/// - `Open` when the file cannot be opened
/// - `Read` when reading fails part way through
/// - `HeaderNotFound` when no line matches; see [`LocateError::is_not_found`]
///
/// ```no_run
/// use golink_core::locator::find_header_line;
/// use std::path::Path;
///
/// let line = find_header_line(Path::new("20200627.org"), b"Rust", b"*")?;
/// # Ok::<(), golink_core::locator::LocateError>(())
/// ```
pub fn find_header_line(path: &Path, term: &[u8], prefix: &[u8]) -> LocateResult<usize> {
    HeaderSearch::new(prefix, term).find_in_file(path)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
