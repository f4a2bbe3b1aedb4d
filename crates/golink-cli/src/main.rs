// crates/golink-cli/src/main.rs - CLI Application Entry Point
//
// Registered with the OS as the handler for the go:// scheme. Each click on a
// link starts one process with the link as its only argument:
//
// ┌─────────────┐   ┌────────────┐   ┌──────────┐   ┌─────────┐   ┌────────┐
// │ go:// link  │──▶│ validation │──▶│  router  │──▶│ handler │──▶│ editor │
// │ (argv[1])   │   │ (Request)  │   │ (by host)│   │ (+line) │   │        │
// └─────────────┘   └────────────┘   └──────────┘   └─────────┘   └────────┘
//
// Exit status is 0 when the editor accepted the file and 1 on any fatal error.
// A heading that cannot be found is only a warning; the file still opens.
//
// EXAMPLE USAGE:
// ```bash
// golink 'go://journal/20200627?title=Rust'   # open the day at the heading
// golink 'go://book/programming-rust'         # open books.org at the entry
// ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::Level;

mod cli; // Command-line interface definition
mod context; // Configuration and service registry

use cli::Cli;
use context::Context;

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Validate before touching the home directory so a bad link is reported as such
    let request = golink_core::validate(&cli.args)?;

    let ctx = Context::new()?;
    ctx.dispatch(&request)
}

/// Diagnostics go to stderr; stdout stays empty
fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::INFO)
        .with_target(false)
        .without_time()
        .init();
}
