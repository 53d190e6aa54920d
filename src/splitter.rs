// ==============================================================================
// splitter.rs - Annotation Cluster Splitting
// ==============================================================================
// Description: Writes one chart file per annotation cluster, tagging every row
//              with its cluster number and enrichment score, then expands each
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::expander::{ChartExpander, ExpansionSummary};
use crate::models::{Column, Layout};
use crate::output::{output_name, OutputDirectory};
use crate::parsers::{ChartParser, ClusterBlock};

/// Splits parsed cluster blocks into per-cluster chart files
#[derive(Debug, Clone)]
pub struct ClusterSplitter {
    expander: ChartExpander,
}

impl ClusterSplitter {
    pub fn new(rows_per_part: usize) -> Self {
        Self {
            expander: ChartExpander::new(Layout::Cluster).with_rows_per_part(rows_per_part),
        }
    }

    /// File name of the chart written for cluster `index`
    pub fn cluster_file_name(index: usize) -> String {
        format!("cluster_{}.txt", index)
    }

    /// Render a block as a chart with the two cluster columns appended
    ///
    /// The metadata line is dropped; each remaining line keeps its input
    /// line terminator.
    pub fn render_block(block: &ClusterBlock) -> String {
        let mut contents = String::new();

        contents.push_str(&block.header.text);
        contents.push('\t');
        contents.push_str(Column::AnnotationCluster.header());
        contents.push('\t');
        contents.push_str(Column::EnrichmentScore.header());
        contents.push_str(block.header.line_ending());

        for row in &block.rows {
            contents.push_str(&row.text);
            contents.push('\t');
            contents.push_str(&block.metadata.cluster);
            contents.push('\t');
            contents.push_str(&block.metadata.enrichment_score);
            contents.push_str(row.line_ending());
        }

        contents
    }

    /// Write `cluster_<K>.txt` for every block, in block order
    pub fn write_clusters(
        &self,
        blocks: &[ClusterBlock],
        directory: &OutputDirectory,
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(blocks.len());

        for block in blocks {
            let file_name = Self::cluster_file_name(block.index);
            let (path, mut writer) = directory
                .create(&file_name)
                .with_context(|| format!("Failed to create {}", file_name))?;

            writer.write_all(Self::render_block(block).as_bytes())?;
            writer
                .flush()
                .with_context(|| format!("Failed to write {}", file_name))?;

            debug!(
                "Wrote cluster {} ({} rows) to {:?}",
                block.metadata.cluster,
                block.rows.len(),
                path
            );
            paths.push(path);
        }

        info!("Created {} cluster files", paths.len());

        Ok(paths)
    }

    /// Expand one per-cluster chart file into its complete and part files
    pub fn expand_cluster_file(
        &self,
        path: &Path,
        directory: &OutputDirectory,
    ) -> Result<ExpansionSummary> {
        let name = output_name(path);

        let records = ChartParser::for_layout(Layout::Cluster)
            .parse(path)
            .with_context(|| format!("Failed to parse cluster file {:?}", path))?;

        self.expander.expand(&records, &name, directory)
    }

    /// Write every cluster file, then expand each one independently
    pub fn split(
        &self,
        blocks: &[ClusterBlock],
        directory: &OutputDirectory,
    ) -> Result<(Vec<PathBuf>, Vec<ExpansionSummary>)> {
        let cluster_files = self.write_clusters(blocks, directory)?;

        let expansions = cluster_files
            .iter()
            .map(|path| self.expand_cluster_file(path, directory))
            .collect::<Result<Vec<_>>>()?;

        Ok((cluster_files, expansions))
    }
}
