// crates/golink-core/src/handlers/journal.rs - Daily journal files
//
// format: go://journal/<name>?title=<heading>
//
// <name> selects `<base_dir>/<name>.org`; the optional title moves the cursor
// to the first outline heading that mentions it.

use std::path::PathBuf;
use std::rc::Rc;

use super::{ServiceHandler, locate_or_warn};
use crate::config::JournalConfig;
use crate::editor::FileOpener;
use crate::error::Result;
use crate::request::{Query, first_value};

/// Handles the journal service
pub struct JournalHandler {
    config: JournalConfig,
    opener: Rc<dyn FileOpener>,
}

impl JournalHandler {
    pub fn new(config: JournalConfig, opener: Rc<dyn FileOpener>) -> Self {
        Self { config, opener }
    }

    /// File for a request path such as `/20200627`
    ///
    /// Leading separators are part of the incoming path; joining them onto the
    /// base directory must not turn the result into an absolute path.
    pub fn entry_path(&self, path: &str) -> PathBuf {
        let name = format!("{}.{}", path.trim_start_matches('/'), self.config.extension);
        self.config.base_dir.join(name)
    }
}

impl ServiceHandler for JournalHandler {
    /// Open the journal entry for `path`, at the heading named by `title`
    ///
    /// LINE SELECTION:
    /// - First non-empty `title` value → first `*` heading containing it
    /// - Heading missing or file unreadable → warning, line 0
    /// - No `title`, or an empty one → warning, line 0
    ///
    /// ERROR HANDLING:
    /// Only the opener can fail the request; its error is returned as
    /// `Error::Editor`.
    fn handle(&self, path: &str, query: &Query) -> Result<()> {
        let file = self.entry_path(path);

        let line = match first_value(query, "title").filter(|title| !title.is_empty()) {
            Some(title) => locate_or_warn(&file, title, &self.config.header_prefix),
            None => {
                tracing::warn!("request parameter does not contain title");
                0
            }
        };

        self.opener.open(&file, line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorError, EditorResult};
    use crate::handlers::test_support::capture_logs;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<(PathBuf, usize)>>,
        fail: bool,
    }

    impl FileOpener for RecordingOpener {
        fn open(&self, file: &Path, line: usize) -> EditorResult<()> {
            self.opened.borrow_mut().push((file.to_path_buf(), line));
            if self.fail {
                return Err(EditorError::Exit {
                    command: "emacsclient".to_string(),
                    code: Some(1),
                });
            }
            Ok(())
        }
    }

    fn setup(fail: bool) -> (TempDir, Rc<RecordingOpener>, JournalHandler) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("20200627.org"),
            "#+TITLE: 2020-06-27\n\n* foo bar\n** nested foo\n* baz\n",
        )
        .unwrap();

        let opener = Rc::new(RecordingOpener {
            fail,
            ..RecordingOpener::default()
        });
        let config = JournalConfig {
            base_dir: temp_dir.path().to_path_buf(),
            extension: "org".to_string(),
            header_prefix: "*".to_string(),
        };
        let handler = JournalHandler::new(config, opener.clone());
        (temp_dir, opener, handler)
    }

    fn query(pairs: &[(&str, &str)]) -> Query {
        let mut query = Query::new();
        for (key, value) in pairs {
            query
                .entry(key.to_string())
                .or_default()
                .push(value.to_string());
        }
        query
    }

    #[test]
    fn test_entry_path_absorbs_leading_separator() {
        let (temp_dir, _opener, handler) = setup(false);
        assert_eq!(
            handler.entry_path("/20200627"),
            temp_dir.path().join("20200627.org")
        );
        assert_eq!(
            handler.entry_path("2020/0627"),
            temp_dir.path().join("2020/0627.org")
        );
    }

    #[test]
    fn test_title_selects_heading_line() {
        let (temp_dir, opener, handler) = setup(false);
        handler
            .handle("/20200627", &query(&[("title", "foo")]))
            .unwrap();
        assert_eq!(
            *opener.opened.borrow(),
            vec![(temp_dir.path().join("20200627.org"), 3)]
        );
    }

    #[test]
    fn test_first_title_value_is_used() {
        let (_temp_dir, opener, handler) = setup(false);
        handler
            .handle("/20200627", &query(&[("title", "baz"), ("title", "foo")]))
            .unwrap();
        assert_eq!(opener.opened.borrow()[0].1, 5);
    }

    #[test]
    fn test_missing_title_opens_at_line_zero() {
        let (_temp_dir, opener, handler) = setup(false);
        let (result, logs) = capture_logs(|| handler.handle("/20200627", &Query::new()));
        result.unwrap();
        assert_eq!(opener.opened.borrow()[0].1, 0);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("request parameter does not contain title"));
    }

    #[test]
    fn test_empty_title_opens_at_line_zero() {
        let (_temp_dir, opener, handler) = setup(false);
        let (result, logs) =
            capture_logs(|| handler.handle("/20200627", &query(&[("title", "")])));
        result.unwrap();
        assert_eq!(opener.opened.borrow()[0].1, 0);
        assert!(logs.contains("request parameter does not contain title"));
    }

    #[test]
    fn test_unknown_title_is_not_fatal() {
        let (_temp_dir, opener, handler) = setup(false);
        let (result, logs) =
            capture_logs(|| handler.handle("/20200627", &query(&[("title", "nowhere")])));
        result.unwrap();
        assert_eq!(opener.opened.borrow()[0].1, 0);
        assert!(logs.contains("WARN"));
        assert!(logs.contains(r#"failed to find "nowhere" header"#));
    }

    #[test]
    fn test_found_title_logs_nothing() {
        let (_temp_dir, opener, handler) = setup(false);
        let (result, logs) =
            capture_logs(|| handler.handle("/20200627", &query(&[("title", "foo")])));
        result.unwrap();
        assert_eq!(opener.opened.borrow()[0].1, 3);
        assert!(logs.is_empty(), "unexpected log output: {logs}");
    }

    #[test]
    fn test_missing_file_still_opens_editor() {
        let (temp_dir, opener, handler) = setup(false);
        let (result, logs) =
            capture_logs(|| handler.handle("/19990101", &query(&[("title", "foo")])));
        result.unwrap();
        assert!(logs.contains("failed to open"));
        assert_eq!(
            *opener.opened.borrow(),
            vec![(temp_dir.path().join("19990101.org"), 0)]
        );
    }

    #[test]
    fn test_editor_failure_propagates() {
        let (_temp_dir, _opener, handler) = setup(true);
        let err = handler.handle("/20200627", &Query::new()).unwrap_err();
        assert!(matches!(err, crate::Error::Editor(EditorError::Exit { .. })));
    }
}
