// ==============================================================================
// cluster.rs - Annotation Cluster Report Parser
// ==============================================================================
// Description: Splits a cluster report into blocks and reads cluster metadata
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Blocks separated by blank lines. Each block is one metadata line,
//         one chart header line, then chart data rows.
// Example:
//   Annotation Cluster 1    Enrichment Score: 4.12
//   Category    Term    Count    %    PValue    Genes    ...
//   GOTERM_BP_FAT    GO:0006955~immune response    3    ...
//
//   Annotation Cluster 2    Enrichment Score: 2.87
//   ...
// ==============================================================================

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::models::ClusterMetadata;

/// Errors for cluster reports that do not follow the block layout
#[derive(Error, Debug)]
pub enum StructuralError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blank line at line {line} does not close a cluster block")]
    EmptyBlock { line: usize },

    #[error("Cluster {cluster} (line {line}) has no header line")]
    MissingHeader { cluster: usize, line: usize },

    #[error("Cluster {cluster} (line {line}) has no {what} token")]
    MissingToken {
        cluster: usize,
        line: usize,
        what: &'static str,
    },

    #[error("Report contains no cluster blocks")]
    NoClusters,
}

/// One input line with the terminator it had in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub text: String,
    /// "\r\n", "\n", or "" for a final unterminated line
    pub terminator: String,
}

impl ReportLine {
    fn split(raw: &str) -> Self {
        let (text, terminator) = if let Some(text) = raw.strip_suffix("\r\n") {
            (text, "\r\n")
        } else if let Some(text) = raw.strip_suffix('\n') {
            (text, "\n")
        } else {
            (raw, "")
        };

        Self {
            text: text.to_string(),
            terminator: terminator.to_string(),
        }
    }

    /// Terminator to write back out, unterminated lines get "\n"
    pub fn line_ending(&self) -> &str {
        if self.terminator.is_empty() {
            "\n"
        } else {
            &self.terminator
        }
    }
}

/// One annotation cluster from a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterBlock {
    /// Sequential block index, starting at 1
    pub index: usize,
    pub metadata: ClusterMetadata,
    /// The block's own chart header
    pub header: ReportLine,
    pub rows: Vec<ReportLine>,
}

/// Parser for annotation cluster reports
#[derive(Debug, Clone, Default)]
pub struct ClusterParser;

impl ClusterParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a cluster report file
    ///
    /// # Arguments
    /// * `path` - Path to the cluster report
    ///
    /// # Returns
    /// * `Ok(Vec<ClusterBlock>)` - Blocks in file order
    /// * `Err(StructuralError)` - The report does not follow the block layout
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<ClusterBlock>, StructuralError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let blocks = self.parse_str(&contents)?;

        debug!("Parsed {} cluster blocks from {:?}", blocks.len(), path.as_ref());

        Ok(blocks)
    }

    /// Parse cluster report contents
    ///
    /// A block ends at a blank (whitespace-only) line or at end of input. A
    /// blank line with no open block is an error, so leading, doubled or
    /// extra trailing blank lines are rejected.
    pub fn parse_str(&self, contents: &str) -> Result<Vec<ClusterBlock>, StructuralError> {
        let mut blocks = Vec::new();
        let mut pending: Vec<(usize, ReportLine)> = Vec::new();

        for (idx, raw) in contents.split_inclusive('\n').enumerate() {
            let line_number = idx + 1;

            if raw.trim().is_empty() {
                if pending.is_empty() {
                    return Err(StructuralError::EmptyBlock { line: line_number });
                }
                let block = self.build_block(blocks.len() + 1, std::mem::take(&mut pending))?;
                blocks.push(block);
            } else {
                pending.push((line_number, ReportLine::split(raw)));
            }
        }

        if !pending.is_empty() {
            let block = self.build_block(blocks.len() + 1, pending)?;
            blocks.push(block);
        }

        if blocks.is_empty() {
            return Err(StructuralError::NoClusters);
        }

        Ok(blocks)
    }

    fn build_block(
        &self,
        index: usize,
        lines: Vec<(usize, ReportLine)>,
    ) -> Result<ClusterBlock, StructuralError> {
        let mut lines = lines.into_iter();

        let (first_line, metadata_line) = match lines.next() {
            Some(line) => line,
            None => return Err(StructuralError::MissingHeader { cluster: index, line: 0 }),
        };

        let (_, header) = lines.next().ok_or(StructuralError::MissingHeader {
            cluster: index,
            line: first_line,
        })?;

        let metadata = Self::parse_metadata(&metadata_line.text, index, first_line)?;
        let rows = lines.map(|(_, line)| line).collect();

        Ok(ClusterBlock {
            index,
            metadata,
            header,
            rows,
        })
    }

    /// Read the cluster id and enrichment score from a metadata line
    ///
    /// The line holds two tab-separated fields; the wanted value is the 3rd
    /// whitespace-separated token of each ("Annotation Cluster 1",
    /// "Enrichment Score: 4.12").
    fn parse_metadata(
        text: &str,
        cluster: usize,
        line: usize,
    ) -> Result<ClusterMetadata, StructuralError> {
        let mut fields = text.split('\t');

        let token = |field: Option<&str>, what: &'static str| {
            field
                .and_then(|field| field.split_whitespace().nth(2))
                .map(str::to_string)
                .ok_or(StructuralError::MissingToken { cluster, line, what })
        };

        let cluster_id = token(fields.next(), "cluster id")?;
        let enrichment_score = token(fields.next(), "enrichment score")?;

        Ok(ClusterMetadata {
            cluster: cluster_id,
            enrichment_score,
        })
    }
}
