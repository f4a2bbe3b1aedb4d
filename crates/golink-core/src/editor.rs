// crates/golink-core/src/editor.rs - Editor Integration
//
// Opening a file is the last step of every request. Two seams keep it
// testable without launching a real editor:
//
// - `FileOpener`: what handlers call ("open this file at this line")
// - `ProcessRunner`: how `EditorInvoker` runs a command and collects output
//
// PROCESS HANDLING:
// - Runs the editor synchronously and waits for it to exit
// - Captures stdout and stderr instead of inheriting them
// - On failure, the captured output goes to stderr before the error returns
// - On success nothing is printed
//
// With the default `--no-wait` flag emacsclient hands the file to a running
// Emacs and exits at once, so "waits for exit" is short in practice.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::EditorConfig;

/// Errors raised while running the editor
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("failed to launch editor '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("editor '{command}' exited with {}", exit_description(*code))]
    Exit { command: String, code: Option<i32> },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Opens a file, optionally at a line; `line == 0` means no specific line
pub trait FileOpener {
    fn open(&self, file: &Path, line: usize) -> EditorResult<()>;
}

/// Outcome of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// Stdout followed by stderr
    pub combined: Vec<u8>,
}

/// Runs an external command to completion
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

/// `ProcessRunner` backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        let output = Command::new(program).args(args).output()?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            combined,
        })
    }
}

/// One editor command line, built fresh for each open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorInvocation {
    pub command: String,
    pub fixed_args: Vec<String>,
    pub line_directive: Option<String>,
    pub target_file: PathBuf,
}

impl EditorInvocation {
    pub fn new(config: &EditorConfig, target_file: &Path, line: usize) -> Self {
        Self {
            command: config.command.clone(),
            fixed_args: config.args.clone(),
            line_directive: (line > 0).then(|| config.render_line_directive(line)),
            target_file: target_file.to_path_buf(),
        }
    }

    /// Fixed arguments, then the line directive if any, then the file
    pub fn args(&self) -> Vec<String> {
        let mut args = self.fixed_args.clone();
        args.extend(self.line_directive.iter().cloned());
        args.push(self.target_file.to_string_lossy().into_owned());
        args
    }
}

/// Opens files by running the configured editor command
pub struct EditorInvoker {
    config: EditorConfig,
    runner: Box<dyn ProcessRunner>,
}

impl EditorInvoker {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    pub fn with_runner(config: EditorConfig, runner: Box<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }
}

impl FileOpener for EditorInvoker {
    /// Run the configured editor on `file`, jumping to `line` when it is set
    ///
    /// COMMAND LINE:
    /// `<command> <args...> [<line directive>] <file>`; with the defaults and
    /// line 12 that is `emacsclient --no-wait --quiet +12 /path/books.org`.
    /// Line 0 leaves the directive out entirely.
    ///
    /// PROCESS HANDLING:
    /// - Blocks until the child exits
    /// - Stdout and stderr are captured, not inherited
    /// - The child and its buffers are dropped before this returns
    ///
    /// ERROR HANDLING:
    /// - `Launch` when the command cannot be started (not installed, not
    ///   executable)
    /// - `Exit` when it ran and returned non-zero; the captured output is
    ///   copied to stderr first so the editor's own message is visible
    fn open(&self, file: &Path, line: usize) -> EditorResult<()> {
        let invocation = EditorInvocation::new(&self.config, file, line);
        let args = invocation.args();
        tracing::debug!(command = %invocation.command, ?args, "opening editor");

        let output = self
            .runner
            .run(&invocation.command, &args)
            .map_err(|source| EditorError::Launch {
                command: invocation.command.clone(),
                source,
            })?;

        if output.success {
            return Ok(());
        }

        write_diagnostics(&output.combined);
        Err(EditorError::Exit {
            command: invocation.command,
            code: output.code,
        })
    }
}

fn write_diagnostics(output: &[u8]) {
    if output.is_empty() {
        return;
    }
    let mut stderr = io::stderr().lock();
    // Nothing useful to do if stderr itself is gone
    let _ = stderr.write_all(output);
    if !output.ends_with(b"\n") {
        let _ = stderr.write_all(b"\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every command and replays a canned result
    struct FakeRunner {
        calls: Rc<RefCell<Vec<(String, Vec<String>)>>>,
        result: fn() -> io::Result<ProcessOutput>,
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            (self.result)()
        }
    }

    fn invoker_with(
        result: fn() -> io::Result<ProcessOutput>,
    ) -> (EditorInvoker, Rc<RefCell<Vec<(String, Vec<String>)>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = FakeRunner {
            calls: Rc::clone(&calls),
            result,
        };
        (
            EditorInvoker::with_runner(EditorConfig::default(), Box::new(runner)),
            calls,
        )
    }

    #[test]
    fn test_args_with_line() {
        let invocation =
            EditorInvocation::new(&EditorConfig::default(), Path::new("/tmp/j/a.org"), 3);
        assert_eq!(
            invocation.args(),
            vec!["--no-wait", "--quiet", "+3", "/tmp/j/a.org"]
        );
    }

    #[test]
    fn test_args_without_line() {
        let invocation =
            EditorInvocation::new(&EditorConfig::default(), Path::new("/tmp/j/a.org"), 0);
        assert_eq!(invocation.line_directive, None);
        assert_eq!(invocation.args(), vec!["--no-wait", "--quiet", "/tmp/j/a.org"]);
    }

    #[test]
    fn test_open_runs_configured_command() {
        let (invoker, calls) = invoker_with(|| {
            Ok(ProcessOutput {
                success: true,
                code: Some(0),
                combined: Vec::new(),
            })
        });

        invoker.open(Path::new("/tmp/books.org"), 12).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "emacsclient");
        assert_eq!(calls[0].1, vec!["--no-wait", "--quiet", "+12", "/tmp/books.org"]);
    }

    #[test]
    fn test_non_zero_exit_is_error() {
        let (invoker, _calls) = invoker_with(|| {
            Ok(ProcessOutput {
                success: false,
                code: Some(1),
                combined: b"emacsclient: can't find socket\n".to_vec(),
            })
        });

        let err = invoker.open(Path::new("/tmp/a.org"), 0).unwrap_err();
        assert!(matches!(err, EditorError::Exit { code: Some(1), .. }));
        assert_eq!(err.to_string(), "editor 'emacsclient' exited with status 1");
    }

    #[test]
    fn test_launch_failure_is_error() {
        let (invoker, _calls) =
            invoker_with(|| Err(io::Error::new(io::ErrorKind::NotFound, "not found")));

        let err = invoker.open(Path::new("/tmp/a.org"), 0).unwrap_err();
        assert!(matches!(err, EditorError::Launch { .. }));
    }

    #[test]
    fn test_missing_program_with_system_runner() {
        let config = EditorConfig {
            command: "golink-test-no-such-editor".to_string(),
            ..EditorConfig::default()
        };
        let err = EditorInvoker::new(config)
            .open(Path::new("/tmp/a.org"), 1)
            .unwrap_err();
        assert!(matches!(err, EditorError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        // `sh -c 'exit 3' <directive> <file>`: the trailing args become $0 and $1
        let config = EditorConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "echo oops >&2; exit 3".to_string()],
            ..EditorConfig::default()
        };
        let err = EditorInvoker::new(config)
            .open(Path::new("/tmp/a.org"), 5)
            .unwrap_err();
        assert!(matches!(err, EditorError::Exit { code: Some(3), .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_combines_output() {
        let output = SystemRunner
            .run(
                "sh",
                &["-c".to_string(), "echo out; echo err >&2".to_string()],
            )
            .unwrap();
        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert_eq!(output.combined, b"out\nerr\n");
    }
}
