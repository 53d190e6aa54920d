// ==============================================================================
// output.rs - Output Directory and Row Writers
// ==============================================================================
// Description: Output directory handling, row serialization and part rotation
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{ExpandedRow, Layout};

/// Directory that receives every generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Create the directory if needed
    ///
    /// An existing directory is reused as is; files whose names collide with
    /// this run's output are overwritten.
    pub fn prepare(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();

        if path.is_dir() {
            info!(
                "Directory {:?} already exists, will probably overwrite the old data",
                path
            );
        } else {
            std::fs::create_dir_all(&path)?;
            debug!("Created output directory {:?}", path);
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Create (or truncate) a buffered file inside the directory
    pub fn create(&self, name: &str) -> io::Result<(PathBuf, BufWriter<File>)> {
        let path = self.file(name);
        let file = File::create(&path)?;
        Ok((path, BufWriter::new(file)))
    }
}

/// Base name used for files derived from `path`
///
/// The file name after the last `/` or `\`, cut at its first `.`
/// ("data/chart.v2.txt" -> "chart").
pub fn output_name(path: &Path) -> String {
    let path = path.to_string_lossy();
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or_default();
    file_name.split('.').next().unwrap_or_default().to_string()
}

/// Format one expanded row for the layout's column list, newline terminated
pub fn serialize_row(row: &ExpandedRow<'_>, layout: Layout) -> String {
    let mut line = layout
        .columns()
        .iter()
        .map(|column| row.field(*column))
        .collect::<Vec<_>>()
        .join("\t");
    line.push('\n');
    line
}

/// Writes rows into consecutive part files of bounded size
///
/// Holds the one open part file; when it is full the writer is flushed and
/// closed before the next part is created.
pub struct PartWriter<'a> {
    directory: &'a OutputDirectory,
    name: &'a str,
    header: String,
    rows_per_part: usize,
    current: Option<BufWriter<File>>,
    rows_in_current: usize,
    paths: Vec<PathBuf>,
}

impl<'a> PartWriter<'a> {
    pub fn new(
        directory: &'a OutputDirectory,
        name: &'a str,
        layout: Layout,
        rows_per_part: usize,
    ) -> Self {
        Self {
            directory,
            name,
            header: layout.header_line(),
            rows_per_part: rows_per_part.max(1),
            current: None,
            rows_in_current: 0,
            paths: Vec::new(),
        }
    }

    /// File name of part `index` for `name`
    pub fn part_file_name(name: &str, index: usize) -> String {
        format!("{}_part_{}.txt", name, index)
    }

    /// Append one serialized row, opening a new part first when needed
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        if self.current.is_none() || self.rows_in_current >= self.rows_per_part {
            self.rotate()?;
        }

        if let Some(writer) = self.current.as_mut() {
            writer.write_all(line.as_bytes())?;
            self.rows_in_current += 1;
        }

        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut previous) = self.current.take() {
            previous.flush()?;
        }

        let file_name = Self::part_file_name(self.name, self.paths.len());
        let (path, mut writer) = self.directory.create(&file_name)?;
        writer.write_all(self.header.as_bytes())?;

        debug!("Opened part file {:?}", path);

        self.current = Some(writer);
        self.rows_in_current = 0;
        self.paths.push(path);

        Ok(())
    }

    /// Flush the open part and return every part path in creation order
    pub fn finish(mut self) -> io::Result<Vec<PathBuf>> {
        if let Some(mut last) = self.current.take() {
            last.flush()?;
        }
        Ok(self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_record;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("output");

        let first = OutputDirectory::prepare(&path).unwrap();
        std::fs::write(first.file("keep.txt"), "old").unwrap();

        let second = OutputDirectory::prepare(&path).unwrap();
        assert_eq!(first, second);
        assert!(second.file("keep.txt").exists());
    }

    #[test]
    fn test_prepare_fails_on_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("output");
        std::fs::write(&path, "not a directory").unwrap();

        assert!(OutputDirectory::prepare(&path).is_err());
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name(Path::new("chart.txt")), "chart");
        assert_eq!(output_name(Path::new("data/run1/chart.v2.txt")), "chart");
        assert_eq!(output_name(Path::new("C:\\reports\\cluster.txt")), "cluster");
        assert_eq!(output_name(Path::new("output/cluster_3.txt")), "cluster_3");
        assert_eq!(output_name(Path::new("noext")), "noext");
    }

    #[test]
    fn test_serialize_chart_row() {
        let record = sample_record("0.01", "CD4");
        let row = ExpandedRow::expand(&record, Some("2.0")).next().unwrap();

        assert_eq!(
            serialize_row(&row, Layout::Chart),
            "GOTERM_BP_FAT\tGO:0006955~immune response\t3\t2.5\t0.01\tCD4\t110\t1123\t13528\t3.28\t0.99\t0.82\t12.6\t2.0\n"
        );
    }

    #[test]
    fn test_serialize_cluster_row() {
        let mut record = sample_record("0.01", "CD4");
        record.annotation_cluster = Some("3".to_string());
        record.enrichment_score = Some("1.75".to_string());
        let row = ExpandedRow::expand(&record, None).next().unwrap();

        let line = serialize_row(&row, Layout::Cluster);
        assert!(line.ends_with("\t12.6\t3\t1.75\n"));
        assert_eq!(line.matches('\t').count(), 14);
    }

    #[test]
    fn test_part_writer_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let directory = OutputDirectory::prepare(temp_dir.path().join("output")).unwrap();

        let mut parts = PartWriter::new(&directory, "chart", Layout::Chart, 2);
        for row in ["a\n", "b\n", "c\n", "d\n", "e\n"] {
            parts.write_line(row).unwrap();
        }
        let paths = parts.finish().unwrap();

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], directory.file("chart_part_0.txt"));
        assert_eq!(paths[2], directory.file("chart_part_2.txt"));

        let header = Layout::Chart.header_line();
        assert_eq!(std::fs::read_to_string(&paths[0]).unwrap(), format!("{header}a\nb\n"));
        assert_eq!(std::fs::read_to_string(&paths[1]).unwrap(), format!("{header}c\nd\n"));
        assert_eq!(std::fs::read_to_string(&paths[2]).unwrap(), format!("{header}e\n"));
    }

    #[test]
    fn test_part_writer_without_rows() {
        let temp_dir = TempDir::new().unwrap();
        let directory = OutputDirectory::prepare(temp_dir.path()).unwrap();

        let parts = PartWriter::new(&directory, "empty", Layout::Chart, 50);
        assert!(parts.finish().unwrap().is_empty());
        assert!(!directory.file("empty_part_0.txt").exists());
    }
}
