//! Structured logging for netcmp.
//!
//! Provides a [`Logger`] that writes diagnostic events to stderr and
//! optionally to a log file. stdout is left to the report itself. Output can be
//! formatted as human-readable plain text or as newline-delimited JSON
//! (NDJSON).

use crate::engine::classify::Counts;
use crate::engine::types::{Connection, TcpState, Verdict};
use chrono::Local;
use serde::Serialize;
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};

// ── Event types ──────────────────────────────────────────────────────────────

/// All distinct event kinds that netcmp can emit.
///
/// The `#[serde(tag = "event")]` attribute puts an `"event"` key in every JSON
/// line so consumers can filter by type without inspecting structure.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event<'a> {
    /// An input file is about to be read.
    ProcessingFile { path: &'a str },

    /// A local address registered as a source, with the file that claimed it.
    KnownSource { ip: &'a str, label: &'a str },

    /// A single-row connection whose peer host was never supplied.
    ExternalConnection {
        a:       String,
        b:       String,
        state:   TcpState,
        sources: Vec<&'a str>,
    },

    /// A connection reported by more than two rows.
    OverflowConnection {
        a:            String,
        b:            String,
        observations: u8,
        sources:      Vec<&'a str>,
    },

    /// The run is aborting.
    Error { message: &'a str },

    /// Totals emitted once classification is complete.
    RunSummary {
        files:       usize,
        sources:     usize,
        connections: usize,
        #[serde(flatten)]
        counts:      Counts,
    },
}

impl<'a> Event<'a> {
    /// Builds the debug event describing `conn`, for the verdicts that have
    /// one (external and overflow).
    pub fn from_connection(verdict: Verdict, conn: &'a Connection) -> Option<Self> {
        let a = conn.key.a.to_string();
        let b = conn.key.b.to_string();
        let sources = conn.sources.iter().map(|s| s.label.as_str()).collect();

        match verdict {
            Verdict::Overflow => Some(Event::OverflowConnection {
                a,
                b,
                observations: conn.observations,
                sources,
            }),
            Verdict::External => Some(Event::ExternalConnection {
                a,
                b,
                state: conn.state,
                sources,
            }),
            _ => None,
        }
    }
}

// ── Logger ───────────────────────────────────────────────────────────────────

/// Structured logger for a single run.
///
/// Constructed once in `main` and lent to the engine. netcmp is
/// single-threaded, so the optional file writer sits in a `RefCell` rather
/// than behind a lock.
pub struct Logger {
    /// Whether to format events as NDJSON instead of plain text.
    json:  bool,
    /// Whether [`Logger::debug`] events are written at all.
    debug: bool,
    /// Optional buffered file writer. `None` when `--log-file` was not given.
    file:  Option<RefCell<BufWriter<File>>>,
}

impl Logger {
    /// Creates a new logger.
    ///
    /// # Arguments
    /// * `json`     - Emit NDJSON instead of plain text when `true`.
    /// * `debug`    - Write events passed to [`Logger::debug`].
    /// * `log_path` - If `Some`, open (or create) this file for appended writes.
    ///
    /// # Errors
    /// Returns an `io::Error` if the log file cannot be opened or created.
    pub fn new(json: bool, debug: bool, log_path: Option<&str>) -> io::Result<Self> {
        let file = match log_path {
            Some(path) => {
                let f = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                Some(RefCell::new(BufWriter::new(f)))
            }
            None => None,
        };

        Ok(Self { json, debug, file })
    }

    /// Logs a single [`Event`] to stderr and, if configured, the log file.
    pub fn log(&self, event: &Event) {
        let line = self.render(event);

        eprintln!("{}", line);

        if let Some(cell) = &self.file {
            let mut writer = cell.borrow_mut();
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }

    /// Logs `event` only when debug output was requested.
    pub fn debug(&self, event: &Event) {
        if self.debug {
            self.log(event);
        }
    }

    /// Formats an event as one output line, timestamp included.
    fn render(&self, event: &Event) -> String {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string();

        if self.json {
            // Serialise to a Value first so the timestamp can be injected.
            let mut val = serde_json::to_value(event).unwrap_or_default();
            if let Some(obj) = val.as_object_mut() {
                obj.insert("timestamp".to_string(), serde_json::Value::String(timestamp));
            }
            serde_json::to_string(&val).unwrap_or_default()
        } else {
            format!("[{}] {}", timestamp, plain_text(event))
        }
    }
}

/// Formats an [`Event`] as a human-readable plain-text string (no timestamp).
fn plain_text(event: &Event) -> String {
    match event {
        Event::ProcessingFile { path } =>
            format!("[INFO] processing file {}", path),

        Event::KnownSource { ip, label } =>
            format!("[SOURCE] {} from {}", ip, label),

        Event::ExternalConnection { a, b, state, sources } =>
            format!(
                "[EXTERNAL] {} <-> {} {} involves IP with no data; source: {}",
                a, b, state, sources.join(", ")
            ),

        Event::OverflowConnection { a, b, observations, sources } =>
            format!(
                "[OVERFLOW] {} <-> {} has {} sources; first: {}",
                a, b, observations, sources.join(", ")
            ),

        Event::Error { message } =>
            format!("[ERROR] {}", message),

        Event::RunSummary { files, sources, connections, counts } => format!(
            "[SUMMARY] files={} sources={} connections={} localhost={} pruned={} \
             symmetric={} external={} asymmetric={} overflow={}",
            files, sources, connections, counts.localhost, counts.verdicts.pruned,
            counts.verdicts.symmetric, counts.verdicts.external, counts.verdicts.asymmetric,
            counts.verdicts.overflow
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::Tally;
    use std::fs;

    #[test]
    fn test_plain_text_tags() {
        assert_eq!(
            plain_text(&Event::ProcessingFile { path: "hostA.txt" }),
            "[INFO] processing file hostA.txt"
        );
        assert_eq!(plain_text(&Event::Error { message: "boom" }), "[ERROR] boom");
    }

    #[test]
    fn test_json_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netcmp.log");
        let logger = Logger::new(true, false, path.to_str()).unwrap();

        logger.log(&Event::RunSummary {
            files:       2,
            sources:     3,
            connections: 4,
            counts:      Counts {
                localhost: 1,
                verdicts:  Tally { symmetric: 4, ..Tally::default() },
            },
        });

        let text = fs::read_to_string(&path).unwrap();
        let val: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(val["event"], "run_summary");
        assert_eq!(val["symmetric"], 4);
        assert_eq!(val["localhost"], 1);
        assert_eq!(val["files"], 2);
        assert!(val["timestamp"].is_string());
    }

    #[test]
    fn test_debug_events_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netcmp.log");
        let logger = Logger::new(false, false, path.to_str()).unwrap();

        logger.debug(&Event::KnownSource { ip: "10.0.0.9", label: "hidden.txt" });
        logger.log(&Event::ProcessingFile { path: "shown.txt" });

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("hidden"));
        assert!(text.contains("[INFO] processing file shown.txt"));
    }
}
