// ==============================================================================
// expander.rs - Chart Row Expansion
// ==============================================================================
// Description: Expands multi-gene chart rows into one row per gene and writes
//              the complete file plus bounded-size part files
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::config::DEFAULT_ROWS_PER_PART;
use crate::models::{ChartRecord, ExpandedRow, Layout};
use crate::output::{serialize_row, OutputDirectory, PartWriter};

/// Significant digits used for the Enrichment column
const ENRICHMENT_DIGITS: usize = 12;

/// PValue that cannot be turned into an Enrichment value
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid PValue '{value}' at line {line}: expected a positive number")]
pub struct NumericError {
    /// 1-based line of the record in its chart file
    pub line: u64,
    pub value: String,
}

/// Result of expanding one chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionSummary {
    /// Output name the files are derived from
    pub name: String,
    pub complete_file: PathBuf,
    pub part_files: Vec<PathBuf>,
    /// Expanded (one gene per row) data rows written
    pub rows: usize,
}

/// Compute -log10(PValue)
///
/// # Arguments
/// * `p_value` - Raw PValue text from the chart
/// * `line` - Line of the record in its chart, used in the error
///
/// # Returns
/// * `Ok(f64)` - Enrichment value
/// * `Err(NumericError)` - PValue is not a finite positive number
pub fn enrichment(p_value: &str, line: u64) -> Result<f64, NumericError> {
    let invalid = || NumericError {
        line,
        value: p_value.to_string(),
    };

    let value: f64 = p_value.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }

    Ok(-value.log10())
}

/// Format an Enrichment value with 12 significant digits
///
/// Follows `%.12g`, then appends ".0" when the result has neither a
/// fractional part nor an exponent (2.0 -> "2.0", 1e-05 -> "1e-05").
pub fn format_enrichment(value: f64) -> String {
    if value == 0.0 {
        let zero = if value.is_sign_negative() { "-0.0" } else { "0.0" };
        return zero.to_string();
    }

    let precision = ENRICHMENT_DIGITS - 1;
    let scientific = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= ENRICHMENT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - exponent).max(0) as usize;
        let fixed = strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string();
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.0", fixed)
        }
    }
}

fn strip_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Expands chart records and partitions the expanded rows
#[derive(Debug, Clone)]
pub struct ChartExpander {
    layout: Layout,
    rows_per_part: usize,
}

impl Default for ChartExpander {
    fn default() -> Self {
        Self::new(Layout::Chart)
    }
}

impl ChartExpander {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            rows_per_part: DEFAULT_ROWS_PER_PART,
        }
    }

    pub fn with_rows_per_part(mut self, rows_per_part: usize) -> Self {
        self.rows_per_part = rows_per_part;
        self
    }

    /// File name of the complete file for `name`
    pub fn complete_file_name(name: &str) -> String {
        format!("complete_{}.txt", name)
    }

    /// Write `complete_<name>.txt` and the `<name>_part_<N>.txt` files
    ///
    /// Every PValue is validated (chart layout) before any file is opened, so
    /// a bad value aborts without partial output.
    pub fn expand(
        &self,
        records: &[ChartRecord],
        name: &str,
        directory: &OutputDirectory,
    ) -> Result<ExpansionSummary> {
        let enrichments = self.enrichment_values(records)?;
        let header = self.layout.header_line();

        let complete_name = Self::complete_file_name(name);
        let (complete_file, mut complete) = directory
            .create(&complete_name)
            .with_context(|| format!("Failed to create {}", complete_name))?;
        complete.write_all(header.as_bytes())?;

        let mut parts = PartWriter::new(directory, name, self.layout, self.rows_per_part);
        let mut rows = 0;

        for (record, enrichment) in records.iter().zip(&enrichments) {
            for row in ExpandedRow::expand(record, enrichment.as_deref()) {
                let line = serialize_row(&row, self.layout);
                complete.write_all(line.as_bytes())?;
                parts
                    .write_line(&line)
                    .with_context(|| format!("Failed to write part files for {}", name))?;
                rows += 1;
            }
        }

        complete
            .flush()
            .with_context(|| format!("Failed to write {}", complete_name))?;
        info!("Created the complete data file {:?} ({} rows)", complete_file, rows);

        let part_files = parts.finish()?;
        info!("Created {} split files for {}", part_files.len(), name);

        Ok(ExpansionSummary {
            name: name.to_string(),
            complete_file,
            part_files,
            rows,
        })
    }

    /// Formatted Enrichment per record, `None` for layouts without the column
    fn enrichment_values(
        &self,
        records: &[ChartRecord],
    ) -> Result<Vec<Option<String>>, NumericError> {
        records
            .iter()
            .map(|record| match self.layout {
                Layout::Chart => {
                    enrichment(&record.p_value, record.line).map(|value| Some(format_enrichment(value)))
                }
                Layout::Cluster => Ok(None),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_record;
    use tempfile::TempDir;

    fn data_rows(path: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_enrichment_of_one_percent() {
        let value = enrichment("0.01", 1).unwrap();
        assert!((value - 2.0).abs() < 1e-12, "Expected ~2.0, got {}", value);
    }

    #[test]
    fn test_enrichment_rejects_bad_values() {
        for bad in ["0", "-0.5", "abc", "", "NaN", "inf"] {
            let err = enrichment(bad, 4).unwrap_err();
            assert_eq!(err.line, 4);
            assert_eq!(err.value, bad);
        }
    }

    #[test]
    fn test_format_enrichment() {
        assert_eq!(format_enrichment(2.0), "2.0");
        assert_eq!(format_enrichment(-0.05f64.log10()), "1.30102999566");
        assert_eq!(format_enrichment(0.5), "0.5");
        assert_eq!(format_enrichment(0.00001), "1e-05");
        assert_eq!(format_enrichment(1.0e15), "1e+15");
        assert_eq!(format_enrichment(123456.0), "123456.0");
        assert_eq!(format_enrichment(-0.0), "-0.0");
    }

    #[test]
    fn test_expand_writes_complete_and_parts() {
        let temp_dir = TempDir::new().unwrap();
        let directory = OutputDirectory::prepare(temp_dir.path().join("output")).unwrap();

        // 2 records x 3 genes = 6 rows, 4 per part
        let records = vec![
            sample_record("0.01", "A, B, C"),
            sample_record("0.001", "D,E,F"),
        ];

        let summary = ChartExpander::new(Layout::Chart)
            .with_rows_per_part(4)
            .expand(&records, "chart", &directory)
            .unwrap();

        assert_eq!(summary.rows, 6);
        assert_eq!(summary.complete_file, directory.file("complete_chart.txt"));
        assert_eq!(summary.part_files.len(), 2);

        let complete = data_rows(&summary.complete_file);
        assert_eq!(complete.len(), 6);

        let rejoined: Vec<String> = summary
            .part_files
            .iter()
            .flat_map(|path| data_rows(path))
            .collect();
        assert_eq!(rejoined, complete);

        assert_eq!(data_rows(&summary.part_files[0]).len(), 4);
        assert_eq!(data_rows(&summary.part_files[1]).len(), 2);

        // Rows of one record differ only in the gene column
        let fields: Vec<Vec<&str>> = complete[..3].iter().map(|row| row.split('\t').collect()).collect();
        assert_eq!(fields[0][5], "A");
        assert_eq!(fields[1][5], "B");
        assert_eq!(fields[2][5], "C");
        for row in &fields {
            assert_eq!(row[13], "2.0");
            assert_eq!(row[..5], fields[0][..5]);
            assert_eq!(row[6..], fields[0][6..]);
        }
    }

    #[test]
    fn test_default_partition_size() {
        let temp_dir = TempDir::new().unwrap();
        let directory = OutputDirectory::prepare(temp_dir.path()).unwrap();

        let genes = (0..120).map(|n| format!("G{}", n)).collect::<Vec<_>>().join(",");
        let records = vec![sample_record("0.05", &genes)];

        let summary = ChartExpander::default()
            .expand(&records, "big", &directory)
            .unwrap();

        assert_eq!(summary.rows, 120);
        let sizes: Vec<usize> = summary.part_files.iter().map(|path| data_rows(path).len()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn test_bad_pvalue_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let directory = OutputDirectory::prepare(temp_dir.path()).unwrap();

        let mut bad = sample_record("n/a", "B");
        bad.line = 7;
        let records = vec![sample_record("0.01", "A"), bad];
        let err = ChartExpander::default()
            .expand(&records, "bad", &directory)
            .unwrap_err();

        let numeric = err.downcast_ref::<NumericError>().unwrap();
        assert_eq!(numeric.line, 7);
        assert_eq!(numeric.value, "n/a");
        assert_eq!(
            numeric.to_string(),
            "Invalid PValue 'n/a' at line 7: expected a positive number"
        );
        assert!(!directory.file("complete_bad.txt").exists());
    }

    #[test]
    fn test_cluster_layout_skips_enrichment() {
        let temp_dir = TempDir::new().unwrap();
        let directory = OutputDirectory::prepare(temp_dir.path()).unwrap();

        let mut record = sample_record("not-needed", "A,B");
        record.annotation_cluster = Some("1".to_string());
        record.enrichment_score = Some("4.12".to_string());

        let summary = ChartExpander::new(Layout::Cluster)
            .expand(&[record], "cluster_1", &directory)
            .unwrap();

        let contents = std::fs::read_to_string(&summary.complete_file).unwrap();
        assert!(contents.starts_with(&Layout::Cluster.header_line()));
        assert_eq!(data_rows(&summary.complete_file).len(), 2);
        assert!(contents.ends_with("\t1\t4.12\n"));
        assert_eq!(summary.part_files, vec![directory.file("cluster_1_part_0.txt")]);
    }
}
