// ==============================================================================
// processor.rs - Batch Reformatting Pipeline
// ==============================================================================
// Description: Runs chart or cluster reformatting for one input report
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ReformatterConfig;
use crate::expander::{ChartExpander, ExpansionSummary};
use crate::models::{Layout, Mode};
use crate::output::{output_name, OutputDirectory};
use crate::parsers::{ChartParser, ClusterParser};
use crate::splitter::ClusterSplitter;

/// Everything a run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: Mode,
    pub output_dir: PathBuf,
    /// Per-cluster charts, cluster mode only
    pub cluster_files: Vec<PathBuf>,
    pub expansions: Vec<ExpansionSummary>,
}

impl RunSummary {
    /// Total files written, including per-cluster charts
    pub fn files_written(&self) -> usize {
        self.cluster_files.len()
            + self
                .expansions
                .iter()
                .map(|expansion| 1 + expansion.part_files.len())
                .sum::<usize>()
    }

    pub fn total_rows(&self) -> usize {
        self.expansions.iter().map(|expansion| expansion.rows).sum()
    }
}

pub struct BatchReformatter {
    config: ReformatterConfig,
}

impl BatchReformatter {
    pub fn new(config: ReformatterConfig) -> Self {
        Self { config }
    }

    /// Main processing pipeline
    ///
    /// Inputs are fully parsed and validated before the output directory is
    /// touched.
    pub fn run(&self, input: &Path, mode: Mode) -> Result<RunSummary> {
        self.config.validate()?;

        info!("Reformatting {:?} as {} report", input, mode.as_str());

        let summary = match mode {
            Mode::Chart => self.run_chart(input)?,
            Mode::Cluster => self.run_cluster(input)?,
        };

        info!(
            "Processing complete: {} files, {} expanded rows in {:?}",
            summary.files_written(),
            summary.total_rows(),
            summary.output_dir
        );

        Ok(summary)
    }

    fn run_chart(&self, input: &Path) -> Result<RunSummary> {
        let records = ChartParser::new()
            .parse(input)
            .with_context(|| format!("Failed to parse chart {:?}", input))?;

        let directory = self.prepare_output()?;
        let expansion = ChartExpander::new(Layout::Chart)
            .with_rows_per_part(self.config.rows_per_part)
            .expand(&records, &output_name(input), &directory)
            .with_context(|| format!("Failed to expand chart {:?}", input))?;

        Ok(RunSummary {
            mode: Mode::Chart,
            output_dir: directory.path().to_path_buf(),
            cluster_files: Vec::new(),
            expansions: vec![expansion],
        })
    }

    fn run_cluster(&self, input: &Path) -> Result<RunSummary> {
        let blocks = ClusterParser::new()
            .parse(input)
            .with_context(|| format!("Failed to parse cluster report {:?}", input))?;

        info!("Found {} annotation clusters", blocks.len());

        let directory = self.prepare_output()?;
        let (cluster_files, expansions) = ClusterSplitter::new(self.config.rows_per_part)
            .split(&blocks, &directory)
            .with_context(|| format!("Failed to split cluster report {:?}", input))?;

        Ok(RunSummary {
            mode: Mode::Cluster,
            output_dir: directory.path().to_path_buf(),
            cluster_files,
            expansions,
        })
    }

    fn prepare_output(&self) -> Result<OutputDirectory> {
        OutputDirectory::prepare(&self.config.output_dir).with_context(|| {
            format!(
                "Failed to prepare output directory {:?}",
                self.config.output_dir
            )
        })
    }
}
