//! Persistence for datasets - save/load JSON snapshots.
//!
//! Snapshots store the standardized table column by column, together with the
//! mapping, summary and standardization report, so a dataset can be reopened
//! without re-running the mapper.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SignificanceCutoffs;
use crate::error::{DegscopeError, Result};
use crate::input::{SourceMetadata, Table, Value};
use crate::mapping::ColumnMapping;
use crate::schema::DatasetKind;
use crate::transform::StandardizeReport;

use super::model::{Dataset, DatasetSummary};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct DatasetSnapshot {
    version: u32,
    name: String,
    kind: DatasetKind,
    mapping: ColumnMapping,
    summary: DatasetSummary,
    report: StandardizeReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<SourceMetadata>,
    saved_at: DateTime<Utc>,
    columns: Vec<SnapshotColumn>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotColumn {
    name: String,
    values: Vec<Value>,
}

impl DatasetSnapshot {
    fn capture(dataset: &Dataset) -> Self {
        let columns = dataset
            .table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| SnapshotColumn {
                name: name.clone(),
                values: dataset.table.column_values(idx).cloned().collect(),
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            name: dataset.name.clone(),
            kind: dataset.kind,
            mapping: dataset.mapping.clone(),
            summary: dataset.summary,
            report: dataset.report.clone(),
            source: dataset.source.clone(),
            saved_at: Utc::now(),
            columns,
        }
    }

    fn restore(self) -> Result<Dataset> {
        if self.version != SNAPSHOT_VERSION {
            return Err(DegscopeError::Persistence(format!(
                "Unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }

        let row_count = self.columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = self.columns.iter().find(|c| c.values.len() != row_count) {
            return Err(DegscopeError::Persistence(format!(
                "Column '{}' has {} values, expected {}",
                bad.name,
                bad.values.len(),
                row_count
            )));
        }

        let headers: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
        let mut rows: Vec<Vec<Value>> = (0..row_count)
            .map(|_| Vec::with_capacity(headers.len()))
            .collect();
        for column in self.columns {
            for (row, value) in rows.iter_mut().zip(column.values) {
                row.push(value);
            }
        }

        let mut dataset = Dataset::from_parts(
            self.name,
            self.kind,
            Table::new(headers, rows),
            self.mapping,
            self.report,
            SignificanceCutoffs::default(),
        )
        .map_err(|e| DegscopeError::Persistence(format!("Snapshot is not a valid dataset: {}", e)))?;

        // Keep the summary as saved; it may have been computed with non-default cutoffs
        dataset.summary = self.summary;
        dataset.source = self.source;
        Ok(dataset)
    }
}

impl Dataset {
    /// Save the dataset to a JSON snapshot.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use degscope::Dataset;
    /// # fn example(dataset: &Dataset) -> degscope::Result<()> {
    /// dataset.save("treated.dataset.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    DegscopeError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            DegscopeError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, &DatasetSnapshot::capture(self)).map_err(|e| {
            DegscopeError::Persistence(format!("Failed to serialize dataset '{}': {}", self.name, e))
        })?;

        log::debug!("Saved dataset '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Load a dataset from a JSON snapshot written by [`Dataset::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            DegscopeError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let reader = BufReader::new(file);
        let snapshot: DatasetSnapshot = serde_json::from_reader(reader).map_err(|e| {
            DegscopeError::Persistence(format!(
                "Failed to parse dataset snapshot '{}': {}",
                path.display(),
                e
            ))
        })?;

        snapshot.restore()
    }
}

/// Generate a snapshot path for a data file.
///
/// # Example
///
/// ```
/// use degscope::dataset::snapshot_path;
///
/// let path = snapshot_path("data/treated_vs_ctrl.csv");
/// assert_eq!(path.to_string_lossy(), "data/treated_vs_ctrl.dataset.json");
/// ```
pub fn snapshot_path(data_path: impl AsRef<Path>) -> std::path::PathBuf {
    let path = data_path.as_ref();
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let parent = path.parent().unwrap_or(Path::new("."));

    parent.join(format!("{}.dataset.json", stem))
}
