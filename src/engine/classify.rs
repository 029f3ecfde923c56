//! Final classification of every connection.
//!
//! Runs once, after all input files have been folded into the registries.
//! Each connection gets exactly one [`Verdict`], checked in this order:
//! TIME_WAIT pruning, more-than-two-sources overflow, symmetric, external,
//! asymmetric.

use crate::engine::connections::ConnectionRegistry;
use crate::engine::sources::SourceRegistry;
use crate::engine::types::{Connection, TcpState, Verdict};
use crate::logger::{Event, Logger};
use serde::Serialize;
use std::collections::BTreeMap;

/// Verdict counters, kept for the whole run and for each address pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub pruned:     u64,
    pub overflow:   u64,
    pub symmetric:  u64,
    pub external:   u64,
    pub asymmetric: u64,
}

impl Tally {
    fn bump(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pruned     => self.pruned += 1,
            Verdict::Overflow   => self.overflow += 1,
            Verdict::Symmetric  => self.symmetric += 1,
            Verdict::External   => self.external += 1,
            Verdict::Asymmetric => self.asymmetric += 1,
        }
    }
}

/// Outcome counters for a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Rows dropped for touching the loopback address. These never become
    /// connections, so they sit outside the verdict tally.
    pub localhost: u64,
    #[serde(flatten)]
    pub verdicts:  Tally,
}

/// Everything the report needs, borrowing connections from the registry.
#[derive(Debug, Default)]
pub struct Classification<'a> {
    pub counts: Counts,

    /// Candidate abandoned connections, in canonical order.
    pub asymmetric: Vec<&'a Connection>,

    /// The first overflow connections, capped at `max_examples`.
    pub overflow_examples: Vec<&'a Connection>,

    /// Per address pair, smaller address first.
    pub pairs: BTreeMap<(&'a str, &'a str), Tally>,
}

/// Decides the outcome of one connection.
///
/// A single-row connection is asymmetric only when both of its addresses are
/// known sources: the reporting host always registered its own address, so
/// the question is whether the peer's report was supplied too and simply
/// lacks this connection.
pub fn classify_one(conn: &Connection, sources: &SourceRegistry) -> Verdict {
    if conn.state == TcpState::TimeWait {
        return Verdict::Pruned;
    }

    match conn.observations {
        n if n > 2 => Verdict::Overflow,
        2 => Verdict::Symmetric,
        _ => {
            let (a, b) = conn.key.addrs();
            if sources.contains(a) && sources.contains(b) {
                Verdict::Asymmetric
            } else {
                Verdict::External
            }
        }
    }
}

/// Walks the connection registry once and assigns every connection a verdict.
///
/// # Arguments
/// * `conns`        - Completed connection registry.
/// * `sources`      - Completed source registry.
/// * `max_examples` - Overflow connections to keep for the report.
/// * `logger`       - External and overflow connections are logged as debug
///                    events while classifying.
pub fn classify<'a>(
    conns:        &'a ConnectionRegistry,
    sources:      &SourceRegistry,
    max_examples: usize,
    logger:       &Logger,
) -> Classification<'a> {
    let mut out = Classification {
        counts: Counts {
            localhost: conns.localhost_skipped(),
            ..Counts::default()
        },
        ..Classification::default()
    };

    for conn in conns.iter() {
        let verdict = classify_one(conn, sources);
        out.counts.verdicts.bump(verdict);
        out.pairs.entry(conn.key.addrs()).or_default().bump(verdict);

        if let Some(event) = Event::from_connection(verdict, conn) {
            logger.debug(&event);
        }

        match verdict {
            Verdict::Overflow => {
                if out.overflow_examples.len() < max_examples {
                    out.overflow_examples.push(conn);
                }
            }
            Verdict::Asymmetric => out.asymmetric.push(conn),
            Verdict::Pruned | Verdict::Symmetric | Verdict::External => {}
        }
    }

    out
}
