// ==============================================================================
// lib.rs - Enrichment Splitter Library
// ==============================================================================
// Description: Library interface for enrichment report reformatting modules
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod config;
pub mod models;
pub mod parsers;
pub mod output;
pub mod expander;
pub mod splitter;
pub mod processor;

pub use config::{ConfigError, ReformatterConfig};
pub use models::{ChartRecord, ClusterMetadata, Column, ExpandedRow, Layout, Mode};
pub use processor::{BatchReformatter, RunSummary};
