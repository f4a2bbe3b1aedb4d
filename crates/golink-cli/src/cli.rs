use clap::Parser;

/// Main CLI structure
///
/// The OS URL handler passes the link as the only argument. It is kept
/// optional here so a missing link is reported by URI validation rather than
/// by clap, and anything after it is ignored.
#[derive(Parser, Debug)]
#[command(name = "golink")]
#[command(about = "Open go:// links in org files with an external editor")]
#[command(version)]
pub struct Cli {
    /// Link to open, e.g. go://journal/20200627?title=Rust
    #[arg(value_name = "URI", num_args = 0..)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_is_positional() {
        let cli = Cli::try_parse_from(["golink", "go://journal/20200627"]).unwrap();
        assert_eq!(cli.args, vec!["go://journal/20200627"]);
    }

    #[test]
    fn test_no_uri_is_accepted_by_parser() {
        let cli = Cli::try_parse_from(["golink"]).unwrap();
        assert!(cli.args.is_empty());
    }

    #[test]
    fn test_trailing_arguments_are_collected() {
        let cli = Cli::try_parse_from(["golink", "go://book/rust", "extra"]).unwrap();
        assert_eq!(cli.args.len(), 2);
    }
}
