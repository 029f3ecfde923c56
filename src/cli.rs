use crate::engine::config::DEFAULT_OVERFLOW_EXAMPLES;
use crate::engine::types::Settings;
use clap::Parser;
use std::path::PathBuf;

/// netcmp: find TCP connections abandoned by one side.
///
/// Each FILE holds the output of `netstat -n -f inet -P tcp` captured on one
/// host. Connections that one host reports and its peer does not are printed
/// as asymmetric, followed by a summary of every connection seen.
#[derive(Parser, Debug, Clone)]
#[command(
    name    = "netcmp",
    version,
    about   = "Compare netstat snapshots from several hosts to find abandoned TCP connections",
    long_about = None,
)]
pub struct Cli {
    /// Log connections involving hosts with no data, and connections seen more
    /// than twice, as they are classified.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────────────

    /// Write log output to this file in addition to stderr.
    ///
    /// The file is created if it does not exist and appended to if it does.
    #[arg(short = 'o', long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Emit log entries as newline-delimited JSON (NDJSON).
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    // ── Report ───────────────────────────────────────────────────────────────

    /// How many connections with more than two sources to print as examples.
    #[arg(
        short = 'n',
        long = "examples",
        value_name = "N",
        default_value_t = DEFAULT_OVERFLOW_EXAMPLES,
    )]
    pub examples: usize,

    /// Also print connection counts for every pair of addresses.
    #[arg(short = 'p', long = "pairs")]
    pub pairs: bool,

    /// netstat output files, one per host. At least two are required.
    #[arg(value_name = "FILE", required = true, num_args = 2..)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            debug:        self.debug,
            max_examples: self.examples,
            pairs:        self.pairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["netcmp", "a.txt", "b.txt"]).unwrap();
        assert!(!cli.debug);
        assert_eq!(cli.files.len(), 2);

        let settings = cli.settings();
        assert_eq!(settings.max_examples, DEFAULT_OVERFLOW_EXAMPLES);
        assert!(!settings.pairs);
    }

    #[test]
    fn test_debug_and_options() {
        let cli = Cli::try_parse_from(["netcmp", "-d", "-n", "5", "-p", "a", "b", "c"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.examples, 5);
        assert!(cli.pairs);
        assert_eq!(cli.files.len(), 3);
    }

    #[test]
    fn test_needs_two_files() {
        let err = Cli::try_parse_from(["netcmp", "a.txt"]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TooFewValues | ErrorKind::WrongNumberOfValues
        ));
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["netcmp"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_flag() {
        let err = Cli::try_parse_from(["netcmp", "-x", "a", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
