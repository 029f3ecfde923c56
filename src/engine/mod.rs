//! Connection matching engine.
//!
//! [`Netcmp`] owns both registries for the lifetime of a run. Files are
//! folded in one at a time; once every file is in, [`Netcmp::classify`] walks
//! the result and produces the [`Classification`] the report is printed from.

pub mod classify;
pub mod config;
pub mod connections;
pub mod endpoint;
pub mod error;
pub mod key;
pub mod parsers;
pub mod reader;
pub mod sources;
pub mod types;

use crate::engine::classify::{classify, Classification};
use crate::engine::connections::ConnectionRegistry;
use crate::engine::error::{NetcmpError, Result};
use crate::engine::reader::{NetstatReader, ReadError};
use crate::engine::sources::SourceRegistry;
use crate::engine::types::{Endpoint, TcpState};
use crate::logger::{Event, Logger};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// State accumulated over one run.
#[derive(Debug, Default)]
pub struct Netcmp {
    conns:   ConnectionRegistry,
    sources: SourceRegistry,
    files:   usize,
}

impl Netcmp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one row reported by the host labelled `label`.
    ///
    /// Rows touching the loopback address are counted and dropped before the
    /// local address is registered as a source. Otherwise the local address
    /// becomes (or already is) a known source and the row is folded into the
    /// connection registry.
    pub fn observe(&mut self, local: Endpoint, remote: Endpoint, state: TcpState, label: &str) {
        if self.conns.skip_loopback(&local, &remote) {
            return;
        }

        let source = self.sources.register(&local.addr, label);
        self.conns.observe(local, remote, state, source);
    }

    /// Reads a netstat report from disk.
    ///
    /// The source label is the file's base name. Any I/O or format problem is
    /// fatal and reported with the file path (and line number, for format
    /// errors).
    pub fn ingest_file(&mut self, path: &Path, logger: &Logger) -> Result<()> {
        logger.log(&Event::ProcessingFile {
            path: &path.to_string_lossy(),
        });

        let file = File::open(path).map_err(|source| NetcmpError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        self.ingest_reader(BufReader::new(file), &label)
            .map_err(|e| match e {
                ReadError::Io(source) => NetcmpError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                ReadError::Format { line, kind } => NetcmpError::Format {
                    path: path.to_path_buf(),
                    line,
                    kind,
                },
            })
    }

    /// Folds every row of one report into the registries.
    pub fn ingest_reader<R: BufRead>(
        &mut self,
        reader: R,
        label:  &str,
    ) -> std::result::Result<(), ReadError> {
        for row in NetstatReader::new(reader)? {
            let (_, row) = row?;
            self.observe(row.local, row.remote, row.state, label);
        }
        self.files += 1;
        Ok(())
    }

    /// Assigns every connection its verdict.
    pub fn classify(&self, max_examples: usize, logger: &Logger) -> Classification<'_> {
        classify(&self.conns, &self.sources, max_examples, logger)
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.conns
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Number of reports ingested successfully.
    pub fn files(&self) -> usize {
        self.files
    }
}
