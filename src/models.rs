// ==============================================================================
// models.rs - Enrichment Report Data Models
// ==============================================================================
// Description: Records, output layouts and expanded rows for chart reformatting
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use serde::Deserialize;

/// Kind of report being reformatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Flat functional annotation chart
    Chart,
    /// Multi-block annotation cluster report
    Cluster,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Chart => "chart",
            Mode::Cluster => "cluster",
        }
    }
}

/// One named output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Category,
    Term,
    Count,
    Percent,
    PValue,
    Gene,
    ListTotal,
    PopHits,
    PopTotal,
    FoldEnrichment,
    Bonferroni,
    Benjamini,
    Fdr,
    /// Derived -log10(PValue)
    Enrichment,
    AnnotationCluster,
    EnrichmentScore,
}

impl Column {
    /// Column name as it appears in input and output header lines
    pub fn header(&self) -> &'static str {
        match self {
            Column::Category => "Category",
            Column::Term => "Term",
            Column::Count => "Count",
            Column::Percent => "%",
            Column::PValue => "PValue",
            Column::Gene => "Genes",
            Column::ListTotal => "List Total",
            Column::PopHits => "Pop Hits",
            Column::PopTotal => "Pop Total",
            Column::FoldEnrichment => "Fold Enrichment",
            Column::Bonferroni => "Bonferroni",
            Column::Benjamini => "Benjamini",
            Column::Fdr => "FDR",
            Column::Enrichment => "Enrichment",
            Column::AnnotationCluster => "Annotation Cluster",
            Column::EnrichmentScore => "Enrichment Score",
        }
    }
}

const CHART_COLUMNS: [Column; 14] = [
    Column::Category,
    Column::Term,
    Column::Count,
    Column::Percent,
    Column::PValue,
    Column::Gene,
    Column::ListTotal,
    Column::PopHits,
    Column::PopTotal,
    Column::FoldEnrichment,
    Column::Bonferroni,
    Column::Benjamini,
    Column::Fdr,
    Column::Enrichment,
];

const CLUSTER_COLUMNS: [Column; 15] = [
    Column::Category,
    Column::Term,
    Column::Count,
    Column::Percent,
    Column::PValue,
    Column::Gene,
    Column::ListTotal,
    Column::PopHits,
    Column::PopTotal,
    Column::FoldEnrichment,
    Column::Bonferroni,
    Column::Benjamini,
    Column::Fdr,
    Column::AnnotationCluster,
    Column::EnrichmentScore,
];

/// Active output column list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Chart rows carry the derived Enrichment column
    Chart,
    /// Cluster rows carry the cluster number and its enrichment score
    Cluster,
}

impl Layout {
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Layout::Chart => &CHART_COLUMNS,
            Layout::Cluster => &CLUSTER_COLUMNS,
        }
    }

    /// Input column names a report must provide for this layout
    pub fn required_columns(&self) -> Vec<&'static str> {
        self.columns()
            .iter()
            .filter(|column| **column != Column::Enrichment)
            .map(|column| column.header())
            .collect()
    }

    /// Tab-joined header line, newline terminated
    pub fn header_line(&self) -> String {
        let mut line = self
            .columns()
            .iter()
            .map(|column| column.header())
            .collect::<Vec<_>>()
            .join("\t");
        line.push('\n');
        line
    }
}

/// One row of a functional annotation chart
///
/// Values are kept verbatim; only the gene list is trimmed, per gene, at
/// expansion time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartRecord {
    /// 1-based line of the record in its file, 0 when not read from a file
    #[serde(skip)]
    pub line: u64,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Term")]
    pub term: String,

    #[serde(rename = "Count")]
    pub count: String,

    #[serde(rename = "%")]
    pub percent: String,

    #[serde(rename = "PValue")]
    pub p_value: String,

    /// Comma-separated gene identifiers
    #[serde(rename = "Genes")]
    pub genes: String,

    #[serde(rename = "List Total")]
    pub list_total: String,

    #[serde(rename = "Pop Hits")]
    pub pop_hits: String,

    #[serde(rename = "Pop Total")]
    pub pop_total: String,

    #[serde(rename = "Fold Enrichment")]
    pub fold_enrichment: String,

    #[serde(rename = "Bonferroni")]
    pub bonferroni: String,

    #[serde(rename = "Benjamini")]
    pub benjamini: String,

    #[serde(rename = "FDR")]
    pub fdr: String,

    /// Present only in per-cluster files
    #[serde(rename = "Annotation Cluster", default)]
    pub annotation_cluster: Option<String>,

    /// Present only in per-cluster files
    #[serde(rename = "Enrichment Score", default)]
    pub enrichment_score: Option<String>,
}

/// Cluster-level metadata taken from a cluster block's first line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMetadata {
    /// Cluster identifier token (e.g. "1" from "Annotation Cluster 1")
    pub cluster: String,
    /// Enrichment score token (e.g. "4.12" from "Enrichment Score: 4.12")
    pub enrichment_score: String,
}

/// A record narrowed to a single gene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandedRow<'a> {
    pub record: &'a ChartRecord,
    pub gene: &'a str,
    /// Formatted Enrichment value, chart layout only
    pub enrichment: Option<&'a str>,
}

impl<'a> ExpandedRow<'a> {
    /// Lazily expand a record into one row per comma-separated gene
    pub fn expand(
        record: &'a ChartRecord,
        enrichment: Option<&'a str>,
    ) -> impl Iterator<Item = ExpandedRow<'a>> + 'a {
        record.genes.split(',').map(move |gene| ExpandedRow {
            record,
            gene: gene.trim(),
            enrichment,
        })
    }

    /// Value of the given column for this row
    pub fn field(&self, column: Column) -> &'a str {
        let record = self.record;
        match column {
            Column::Category => record.category.as_str(),
            Column::Term => record.term.as_str(),
            Column::Count => record.count.as_str(),
            Column::Percent => record.percent.as_str(),
            Column::PValue => record.p_value.as_str(),
            Column::Gene => self.gene,
            Column::ListTotal => record.list_total.as_str(),
            Column::PopHits => record.pop_hits.as_str(),
            Column::PopTotal => record.pop_total.as_str(),
            Column::FoldEnrichment => record.fold_enrichment.as_str(),
            Column::Bonferroni => record.bonferroni.as_str(),
            Column::Benjamini => record.benjamini.as_str(),
            Column::Fdr => record.fdr.as_str(),
            Column::Enrichment => self.enrichment.unwrap_or_default(),
            Column::AnnotationCluster => record.annotation_cluster.as_deref().unwrap_or_default(),
            Column::EnrichmentScore => record.enrichment_score.as_deref().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a chart record with the given PValue and gene list
    pub(crate) fn sample_record(p_value: &str, genes: &str) -> ChartRecord {
        ChartRecord {
            line: 0,
            category: "GOTERM_BP_FAT".to_string(),
            term: "GO:0006955~immune response".to_string(),
            count: "3".to_string(),
            percent: "2.5".to_string(),
            p_value: p_value.to_string(),
            genes: genes.to_string(),
            list_total: "110".to_string(),
            pop_hits: "1123".to_string(),
            pop_total: "13528".to_string(),
            fold_enrichment: "3.28".to_string(),
            bonferroni: "0.99".to_string(),
            benjamini: "0.82".to_string(),
            fdr: "12.6".to_string(),
            annotation_cluster: None,
            enrichment_score: None,
        }
    }

    #[test]
    fn test_header_lines() {
        assert_eq!(
            Layout::Chart.header_line(),
            "Category\tTerm\tCount\t%\tPValue\tGenes\tList Total\tPop Hits\tPop Total\t\
             Fold Enrichment\tBonferroni\tBenjamini\tFDR\tEnrichment\n"
        );
        assert!(Layout::Cluster
            .header_line()
            .ends_with("\tFDR\tAnnotation Cluster\tEnrichment Score\n"));
    }

    #[test]
    fn test_required_columns() {
        let chart = Layout::Chart.required_columns();
        assert_eq!(chart.len(), 13);
        assert!(!chart.contains(&"Enrichment"));

        let cluster = Layout::Cluster.required_columns();
        assert_eq!(cluster.len(), 15);
        assert!(cluster.contains(&"Annotation Cluster"));
        assert!(cluster.contains(&"Enrichment Score"));
    }

    #[test]
    fn test_expand_preserves_gene_order_and_trims() {
        let record = sample_record("0.01", "CD4, IL2 ,TNF");
        let rows: Vec<_> = ExpandedRow::expand(&record, Some("2.0")).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].gene, "CD4");
        assert_eq!(rows[1].gene, "IL2");
        assert_eq!(rows[2].gene, "TNF");

        // Everything except the gene is shared
        for row in &rows {
            assert_eq!(row.field(Column::Term), "GO:0006955~immune response");
            assert_eq!(row.field(Column::Enrichment), "2.0");
        }
    }

    #[test]
    fn test_trailing_comma_yields_empty_gene() {
        let record = sample_record("0.01", "CD4,");
        let genes: Vec<_> = ExpandedRow::expand(&record, None).map(|row| row.gene).collect();
        assert_eq!(genes, vec!["CD4", ""]);
    }

    #[test]
    fn test_mode_str() {
        assert_eq!(Mode::Chart.as_str(), "chart");
        assert_eq!(Mode::Cluster.as_str(), "cluster");
    }
}
