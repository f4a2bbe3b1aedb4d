// crates/golink-core/src/config.rs - Built-in configuration
//
// There is no configuration file: the handler is registered once with the OS
// and always runs the same way. What varies between machines is the home
// directory, so every path default is derived from it.
//
// SECTIONS:
// - editor:  which command opens files, its fixed flags, and how a line
//            number is spelled on its command line
// - journal: one org file per day under a base directory
// - book:    one consolidated org file, entries tagged with an export property
//
// Validation runs once at startup so a broken default fails before any
// request is handled.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Placeholder replaced by the line number in `EditorConfig::line_directive`
pub const LINE_PLACEHOLDER: &str = "{line}";

/// Errors raised when the assembled configuration is unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Home directory could not be determined")]
    NoHomeDir,

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub editor: EditorConfig,

    pub journal: JournalConfig,

    pub book: BookConfig,
}

/// Editor integration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Program to run, looked up on PATH when not absolute
    pub command: String,

    /// Arguments passed before the line directive and file
    ///
    /// The defaults ask emacsclient to return immediately and stay quiet.
    pub args: Vec<String>,

    /// Jump-to-line argument; `{line}` is replaced with the 1-based line
    ///
    /// Example: `+{line}` for emacs and vim, `--goto={line}` for others
    pub line_directive: String,
}

/// Journal service: `go://journal/<date>?title=<heading>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    /// Directory holding one file per day
    pub base_dir: PathBuf,

    /// Extension appended to the request path
    pub extension: String,

    /// Outline heading marker
    pub header_prefix: String,
}

/// Book service: `go://book/<slug>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// The single file listing every book
    pub file: PathBuf,

    /// Property that carries each entry's slug
    pub property_prefix: String,
}

impl AppConfig {
    /// Defaults rooted at the given home directory
    ///
    /// - journal: `~/Dropbox/org/journal/`
    /// - book:    `~/Dropbox/org/books.org`
    pub fn for_home(home: &Path) -> Self {
        let org_dir = home.join("Dropbox").join("org");
        Self {
            editor: EditorConfig::default(),
            journal: JournalConfig {
                base_dir: org_dir.join("journal"),
                extension: "org".to_string(),
                header_prefix: "*".to_string(),
            },
            book: BookConfig {
                file: org_dir.join("books.org"),
                property_prefix: ":EXPORT_FILE_NAME:".to_string(),
            },
        }
    }

    /// Check the configuration for values that would misbehave at runtime
    pub fn validate(&self) -> ConfigResult<()> {
        if self.editor.command.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "editor command cannot be empty".to_string(),
            ));
        }

        if !self.editor.line_directive.contains(LINE_PLACEHOLDER) {
            return Err(ConfigError::ValidationError(format!(
                "line directive '{}' must contain {LINE_PLACEHOLDER}",
                self.editor.line_directive
            )));
        }

        if self.journal.extension.is_empty() {
            return Err(ConfigError::ValidationError(
                "journal extension cannot be empty".to_string(),
            ));
        }

        // An empty prefix would turn every line into a header candidate
        if self.journal.header_prefix.is_empty() || self.book.property_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "header prefixes cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: "emacsclient".to_string(),
            args: vec!["--no-wait".to_string(), "--quiet".to_string()],
            line_directive: "+{line}".to_string(),
        }
    }
}

impl EditorConfig {
    /// Render the jump-to-line argument for `line`
    pub fn render_line_directive(&self, line: usize) -> String {
        self.line_directive
            .replace(LINE_PLACEHOLDER, &line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::for_home(Path::new("/home/user"))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_paths_are_rooted_at_home() {
        let config = config();
        assert_eq!(
            config.journal.base_dir,
            PathBuf::from("/home/user/Dropbox/org/journal")
        );
        assert_eq!(
            config.book.file,
            PathBuf::from("/home/user/Dropbox/org/books.org")
        );
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let mut config = config();
        config.editor.command = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_directive_without_placeholder_is_rejected() {
        let mut config = config();
        config.editor.line_directive = "+".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let mut config = config();
        config.book.property_prefix.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_render_line_directive() {
        let mut editor = EditorConfig::default();
        assert_eq!(editor.render_line_directive(42), "+42");

        editor.line_directive = "--goto={line}".to_string();
        assert_eq!(editor.render_line_directive(7), "--goto=7");
    }
}
