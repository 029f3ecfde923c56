//! Line reader for `netstat -n -f inet -P tcp` reports.
//!
//! Validates the fixed four-line preamble, then hands out one parsed [`Row`]
//! per non-blank data line together with its 1-based line number.

use crate::engine::config::{MAX_LINE_LEN, PROTOCOL_HEADER, REQUIRED_COLUMNS};
use crate::engine::error::FormatError;
use crate::engine::parsers::{parse_row, Row};
use std::io::{self, BufRead};

/// Failure while reading a report: either the stream broke or its content is
/// malformed. Carries the line number so callers can point at it.
#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    Format { line: usize, kind: FormatError },
}

/// Streaming reader over one report.
pub struct NetstatReader<R> {
    inner:   R,
    line_no: usize,
    raw:     Vec<u8>,
    buf:     String,
}

impl<R: BufRead> NetstatReader<R> {
    /// Wraps `inner` and consumes the preamble.
    ///
    /// Fails if any of the four header lines is missing or does not match the
    /// netstat layout.
    pub fn new(inner: R) -> Result<Self, ReadError> {
        let mut reader = Self {
            inner,
            line_no: 0,
            raw: Vec::new(),
            buf: String::new(),
        };
        reader.read_header()?;
        Ok(reader)
    }

    fn read_header(&mut self) -> Result<(), ReadError> {
        // Blank line
        if !self.next_line()? {
            return Err(self.format_error(FormatError::TruncatedHeader));
        }
        if !self.content().is_empty() {
            return Err(self.format_error(FormatError::ExpectedBlank));
        }

        // "TCP: IPv4"
        if !self.next_line()? {
            return Err(self.format_error(FormatError::TruncatedHeader));
        }
        if self.content() != PROTOCOL_HEADER {
            return Err(self.format_error(FormatError::ExpectedProtocolHeader));
        }

        // Column names
        if !self.next_line()? {
            return Err(self.format_error(FormatError::TruncatedHeader));
        }
        if let Some(missing) = REQUIRED_COLUMNS
            .into_iter()
            .find(|col| !self.content().contains(col))
        {
            return Err(self.format_error(FormatError::ExpectedColumnHeaders(missing)));
        }

        // Dashes
        if !self.next_line()? {
            return Err(self.format_error(FormatError::TruncatedHeader));
        }
        if !self
            .content()
            .chars()
            .all(|c| c == '-' || c.is_whitespace())
        {
            return Err(self.format_error(FormatError::ExpectedSeparator));
        }

        Ok(())
    }

    /// Reads the next physical line into `buf`. Returns `false` at EOF.
    ///
    /// Every line must end in a newline and be valid UTF-8; the line counter
    /// moves before either is checked so errors point at the offending line.
    fn next_line(&mut self) -> Result<bool, ReadError> {
        self.raw.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.raw)
            .map_err(ReadError::Io)?;
        if n == 0 {
            return Ok(false);
        }

        self.line_no += 1;
        if n > MAX_LINE_LEN {
            return Err(self.format_error(FormatError::LineTooLong));
        }
        if self.raw.last() != Some(&b'\n') {
            return Err(self.format_error(FormatError::UnterminatedLine));
        }

        self.buf.clear();
        match std::str::from_utf8(&self.raw) {
            Ok(text) => self.buf.push_str(text),
            Err(_) => return Err(self.format_error(FormatError::InvalidUtf8)),
        }
        Ok(true)
    }

    /// Current line without its terminator.
    fn content(&self) -> &str {
        self.buf.trim_end_matches(|c: char| c == '\n' || c == '\r')
    }

    fn format_error(&self, kind: FormatError) -> ReadError {
        ReadError::Format { line: self.line_no, kind }
    }
}

impl<R: BufRead> Iterator for NetstatReader<R> {
    type Item = Result<(usize, Row), ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_line() {
                Ok(false) => return None,
                Ok(true) => {}
                Err(e) => return Some(Err(e)),
            }

            if self.content().trim().is_empty() {
                continue;
            }

            return Some(
                parse_row(self.content())
                    .map(|row| (self.line_no, row))
                    .map_err(|e| self.format_error(e.into())),
            );
        }
    }
}
