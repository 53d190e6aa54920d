// ==============================================================================
// chart.rs - Functional Annotation Chart Parser
// ==============================================================================
// Description: Parser for tab-delimited enrichment charts with a header row
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited text, header row names the columns (any order)
// Example:
//   Category    Term    Count    %    PValue    Genes    List Total    ...
//   GOTERM_BP_FAT    GO:0006955~immune response    3    2.5    0.01    CD4, IL2, TNF    110    ...
// ==============================================================================

use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::models::{ChartRecord, Layout};

/// Errors that can occur during chart file parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is empty, expected a header row")]
    MissingHeader,

    #[error("Header is missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Row at line {line} has {found} fields, header has {expected}")]
    FieldCount { line: u64, expected: u64, found: u64 },

    #[error("Malformed row at line {line}: {details}")]
    Malformed { line: u64, details: String },
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |pos| pos.line());
        let details = err.to_string();

        match err.into_kind() {
            csv::ErrorKind::Io(source) => ParseError::Io(source),
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => ParseError::FieldCount {
                line,
                expected: expected_len,
                found: len,
            },
            _ => ParseError::Malformed { line, details },
        }
    }
}

/// Parser for chart files and the per-cluster files derived from cluster reports
#[derive(Debug, Clone)]
pub struct ChartParser {
    /// Determines which columns the header must provide
    pub layout: Layout,
}

impl Default for ChartParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartParser {
    /// Create a parser for plain chart files
    pub fn new() -> Self {
        Self {
            layout: Layout::Chart,
        }
    }

    /// Create a parser for per-cluster files, which carry the two cluster columns
    pub fn for_layout(layout: Layout) -> Self {
        Self { layout }
    }

    /// Parse a chart file
    ///
    /// # Arguments
    /// * `path` - Path to the tab-delimited chart
    ///
    /// # Returns
    /// * `Ok(Vec<ChartRecord>)` - Records in input order
    /// * `Err(ParseError)` - Parse error
    ///
    /// The header is checked for every required column before any row is
    /// read. Every row must have as many fields as the header. Extra columns
    /// are ignored.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<ChartRecord>, ParseError> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ParseError::MissingHeader);
        }

        let missing: Vec<String> = self
            .layout
            .required_columns()
            .into_iter()
            .filter(|name| !headers.iter().any(|header| header == *name))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(ParseError::MissingColumns { columns: missing });
        }

        // Blank lines are skipped by the reader but still counted
        let mut raw = StringRecord::new();
        let mut records = Vec::new();
        while reader.read_record(&mut raw)? {
            let mut record: ChartRecord = raw.deserialize(Some(&headers))?;
            record.line = raw.position().map_or(0, |pos| pos.line());
            records.push(record);
        }

        debug!("Parsed {} records from {:?}", records.len(), path);

        Ok(records)
    }
}
