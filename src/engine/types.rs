use serde::Serialize;
use std::rc::Rc;

/// One side of a TCP connection as printed by netstat.
///
/// Addresses are kept as the literal text netstat printed and compared as
/// strings; the tool never routes anything, so no semantic validation is done.
/// Field order matters: the derived `Ord` compares the address first and the
/// port second, which is the canonical ordering used by [`ConnKey`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Endpoint {
    pub addr: String,
    pub port: u16,
}

/// Uniquely identifies a connection regardless of which host reported it.
///
/// The key is always normalised so that the smaller endpoint occupies `a`,
/// ensuring that the rows from both hosts of a connection map to the same
/// entry in the connection registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnKey {
    pub a: Endpoint,
    pub b: Endpoint,
}

/// TCP connection state as reported in the netstat `State` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TcpState {
    #[serde(rename = "CLOSED")]
    Closed,
    #[serde(rename = "IDLE")]
    Idle,
    #[serde(rename = "BOUND")]
    Bound,
    #[serde(rename = "LISTEN")]
    Listen,
    #[serde(rename = "SYN_SENT")]
    SynSent,
    #[serde(rename = "SYN_RCVD")]
    SynRcvd,
    #[serde(rename = "ESTABLISHED")]
    Established,
    #[serde(rename = "CLOSE_WAIT")]
    CloseWait,
    #[serde(rename = "FIN_WAIT_1")]
    FinWait1,
    #[serde(rename = "CLOSING")]
    Closing,
    #[serde(rename = "LAST_ACK")]
    LastAck,
    #[serde(rename = "FIN_WAIT_2")]
    FinWait2,
    /// Recently closed. Expected to linger on one side only, so these are
    /// pruned before classification.
    #[serde(rename = "TIME_WAIT")]
    TimeWait,
}

/// The host behind one input file, identified by a local IP it used.
///
/// A file yields one `Source` per distinct local address appearing in its
/// rows. The label is the file's base name and is fixed by whichever file
/// registered the address first.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub ip:    String,
    pub label: String,
}

/// The deduplicated record of one four-tuple.
#[derive(Debug)]
pub struct Connection {
    pub key: ConnKey,

    /// State from the first row that reported this tuple. Later rows with a
    /// different state do not overwrite it.
    pub state: TcpState,

    /// Rows that reported this tuple, saturating at `u8::MAX`.
    pub observations: u8,

    /// The sources of the first rows, at most
    /// [`MAX_RETAINED_SOURCES`](crate::engine::config::MAX_RETAINED_SOURCES).
    pub sources: Vec<Rc<Source>>,
}

/// Outcome assigned to each connection by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// In `TIME_WAIT`; not informative about abandonment.
    Pruned,
    /// Reported by more than two rows.
    Overflow,
    /// Reported by both sides.
    Symmetric,
    /// Reported once, and the other side's data was never supplied.
    External,
    /// Reported once even though both hosts' data was supplied.
    Asymmetric,
}

/// Run-time options assembled from CLI arguments.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Log external and overflow connections as they are classified.
    pub debug:        bool,
    /// Overflow connections kept as examples for the report.
    pub max_examples: usize,
    /// Print the per-host-pair table after the summary.
    pub pairs:        bool,
}
