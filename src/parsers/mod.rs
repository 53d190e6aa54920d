// ==============================================================================
// parsers/mod.rs - Report parser modules
// ==============================================================================
// Description: Parsers for functional annotation chart and cluster reports
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod chart;
pub mod cluster;

pub use chart::{ChartParser, ParseError};
pub use cluster::{ClusterBlock, ClusterParser, ReportLine, StructuralError};
