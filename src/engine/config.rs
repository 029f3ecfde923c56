/// Loopback address excluded from cross-host matching.
///
/// Every host has its own `127.0.0.1`, so two files reporting a connection
/// over it are not talking about the same socket. Such rows are counted and
/// dropped before they reach either registry.
pub const LOOPBACK_ADDR: &str = "127.0.0.1";

/// Number of contributing sources retained per connection.
///
/// A healthy connection is reported by exactly two hosts. Observations past
/// this cap still bump the counter but keep no reference.
pub const MAX_RETAINED_SOURCES: usize = 2;

/// Second line of every `netstat -n -f inet -P tcp` report.
pub const PROTOCOL_HEADER: &str = "TCP: IPv4";

/// Column names that must all appear on the third line of a report.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Local Address",
    "Remote Address",
    "Swind",
    "Send-Q",
    "Rwind",
    "Recv-Q",
    "State",
];

/// Longest accepted input line in bytes, newline included.
pub const MAX_LINE_LEN: usize = 255;

/// Overflow connections dumped in the report unless `--examples` says otherwise.
pub const DEFAULT_OVERFLOW_EXAMPLES: usize = 1;
