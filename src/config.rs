// ==============================================================================
// config.rs - Reformatter Configuration
// ==============================================================================
// Description: Output location and partition size settings for a run
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Directory all generated files are written to, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Data rows per part file
pub const DEFAULT_ROWS_PER_PART: usize = 50;

/// Errors raised for unusable settings
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rows per part must be at least 1, got {0}")]
    InvalidRowsPerPart(usize),

    #[error("output directory must not be empty")]
    EmptyOutputDir,
}

/// Settings shared by chart and cluster runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReformatterConfig {
    pub output_dir: PathBuf,
    pub rows_per_part: usize,
}

impl Default for ReformatterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            rows_per_part: DEFAULT_ROWS_PER_PART,
        }
    }
}

impl ReformatterConfig {
    /// Write into `output_dir` instead of the default directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_rows_per_part(mut self, rows_per_part: usize) -> Self {
        self.rows_per_part = rows_per_part;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows_per_part == 0 {
            return Err(ConfigError::InvalidRowsPerPart(self.rows_per_part));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }

        Ok(())
    }
}
