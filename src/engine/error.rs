//! Error types for netcmp.
//!
//! Errors are layered the same way the input is: an [`EndpointError`] sits
//! inside a [`RowError`], which sits inside a [`FormatError`], which the
//! ingest path wraps with the file name and line number in [`NetcmpError`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A raw `address.port` token could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("bad IP/port pair \"{0}\": no '.' separator")]
    MissingSeparator(String),

    #[error("bad TCP port \"{0}\"")]
    InvalidPort(String),

    #[error("TCP port {0} out of range")]
    PortOutOfRange(String),
}

/// A data row could not be turned into an observation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("failed to parse line: expected 7 fields, found {0}")]
    MissingFields(usize),

    #[error("failed to parse line: unexpected trailing field \"{0}\"")]
    TrailingField(String),

    #[error("unexpected TCP state: \"{0}\"")]
    UnknownState(String),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// The report does not look like netstat output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected end of file in header")]
    TruncatedHeader,

    #[error("expected blank line")]
    ExpectedBlank,

    #[error("expected \"TCP: IPv4\" header")]
    ExpectedProtocolHeader,

    #[error("expected column headers (missing \"{0}\")")]
    ExpectedColumnHeaders(&'static str),

    #[error("expected separator row")]
    ExpectedSeparator,

    #[error("line too long")]
    LineTooLong,

    #[error("line not terminated by a newline")]
    UnterminatedLine,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error(transparent)]
    Row(#[from] RowError),
}

/// Fatal errors that abort a run.
#[derive(Error, Debug)]
pub enum NetcmpError {
    #[error("{}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: failed to process line {line}: {kind}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        #[source]
        kind: FormatError,
    },
}

/// Result type alias for netcmp operations.
pub type Result<T> = std::result::Result<T, NetcmpError>;
