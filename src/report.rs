//! Human-readable report output.
//!
//! The report goes to stdout: one line per asymmetric connection followed by
//! the summary counters. Overflow examples are warnings and go to stderr.
//! Every function writes to a caller-supplied `Write` so output can be
//! captured in tests.

use crate::engine::classify::Classification;
use crate::engine::types::{Connection, Settings};
use std::io::{self, Write};

/// Writes the main report: asymmetric detail lines, the summary block and,
/// when requested, the per-address-pair table.
pub fn write_report<W: Write>(
    out:      &mut W,
    result:   &Classification,
    settings: &Settings,
) -> io::Result<()> {
    for conn in &result.asymmetric {
        writeln!(
            out,
            "{} only in {}",
            conn.key,
            conn.first_label().unwrap_or("?")
        )?;
    }

    let c = &result.counts.verdicts;
    writeln!(out, "summary of connections found:")?;
    writeln!(out, "    {:7} localhost connections skipped", result.counts.localhost)?;
    writeln!(out, "    {:7} pruned (in state TIME_WAIT)", c.pruned)?;
    writeln!(out, "    {:7} symmetric (present on both sides)", c.symmetric)?;
    writeln!(out, "    {:7} external (only one side's data was supplied)", c.external)?;
    writeln!(out, "    {:7} asymmetric (abandoned by one side)", c.asymmetric)?;
    writeln!(out, "    {:7} overflow (more than two sources)", c.overflow)?;

    if settings.pairs {
        write_pairs(out, result)?;
    }

    Ok(())
}

/// Writes one line per address pair with the verdict counts between them.
fn write_pairs<W: Write>(out: &mut W, result: &Classification) -> io::Result<()> {
    writeln!(out, "connections by address pair:")?;
    for ((a, b), t) in &result.pairs {
        writeln!(
            out,
            "    {:>15} <-> {:<15} symmetric={} asymmetric={} external={} pruned={} overflow={}",
            a, b, t.symmetric, t.asymmetric, t.external, t.pruned, t.overflow
        )?;
    }
    Ok(())
}

/// Warns about connections seen in more than two rows, with examples.
///
/// Writes nothing when there are none.
pub fn write_overflow_warning<W: Write>(err: &mut W, result: &Classification) -> io::Result<()> {
    let n = result.counts.verdicts.overflow;
    if n == 0 {
        return Ok(());
    }

    let plural = if n == 1 { "" } else { "s" };
    match result.overflow_examples.len() {
        0 => writeln!(err, "netcmp: {} connection{} had more than two sources!", n, plural)?,
        k => writeln!(
            err,
            "netcmp: {} connection{} had more than two sources! example{}:",
            n,
            plural,
            if k == 1 { "" } else { "s" },
        )?,
    }
    for conn in &result.overflow_examples {
        dump_connection(err, conn)?;
    }
    Ok(())
}

/// Everything known about one connection, indented for diagnostics.
pub fn dump_connection<W: Write>(out: &mut W, conn: &Connection) -> io::Result<()> {
    writeln!(out, "    {}", conn.key)?;
    for source in &conn.sources {
        writeln!(out, "        source: {}", source.label)?;
    }
    Ok(())
}
