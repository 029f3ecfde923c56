//! Parsers for netstat data rows and TCP state tokens.

use crate::engine::error::RowError;
use crate::engine::types::{Endpoint, TcpState};
use std::fmt;
use std::str::FromStr;

/// One data row of a netstat report, reduced to what the engine uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub local:  Endpoint,
    pub remote: Endpoint,
    pub state:  TcpState,
}

impl TcpState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed      => "CLOSED",
            Self::Idle        => "IDLE",
            Self::Bound       => "BOUND",
            Self::Listen      => "LISTEN",
            Self::SynSent     => "SYN_SENT",
            Self::SynRcvd     => "SYN_RCVD",
            Self::Established => "ESTABLISHED",
            Self::CloseWait   => "CLOSE_WAIT",
            Self::FinWait1    => "FIN_WAIT_1",
            Self::Closing     => "CLOSING",
            Self::LastAck     => "LAST_ACK",
            Self::FinWait2    => "FIN_WAIT_2",
            Self::TimeWait    => "TIME_WAIT",
        }
    }
}

impl FromStr for TcpState {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CLOSED"      => Self::Closed,
            "IDLE"        => Self::Idle,
            "BOUND"       => Self::Bound,
            "LISTEN"      => Self::Listen,
            "SYN_SENT"    => Self::SynSent,
            "SYN_RCVD"    => Self::SynRcvd,
            "ESTABLISHED" => Self::Established,
            "CLOSE_WAIT"  => Self::CloseWait,
            "FIN_WAIT_1"  => Self::FinWait1,
            "CLOSING"     => Self::Closing,
            "LAST_ACK"    => Self::LastAck,
            "FIN_WAIT_2"  => Self::FinWait2,
            "TIME_WAIT"   => Self::TimeWait,
            other         => return Err(RowError::UnknownState(other.to_string())),
        })
    }
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one data row: `local remote swind send-q rwind recv-q state`.
///
/// The four window/queue columns are skipped without inspection. The state is
/// checked before the endpoints so an unknown state is reported even when an
/// endpoint is also bad.
pub fn parse_row(line: &str) -> Result<Row, RowError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [local, remote, _swind, _send_q, _rwind, _recv_q, state, rest @ ..] = fields.as_slice()
    else {
        return Err(RowError::MissingFields(fields.len()));
    };

    if let Some(extra) = rest.first() {
        return Err(RowError::TrailingField(extra.to_string()));
    }

    let state: TcpState = state.parse()?;
    let local: Endpoint = local.parse()?;
    let remote: Endpoint = remote.parse()?;

    Ok(Row { local, remote, state })
}
