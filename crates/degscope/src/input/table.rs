//! In-memory tabular data.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DegscopeError, Result};

use super::value::Value;

/// Represents parsed tabular data.
///
/// Columns keep their load order. Duplicate or blank headers are allowed here;
/// lookups by name resolve to the first matching column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    /// Row data (row-major order), every row as wide as `columns`.
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a new table. Short rows are padded with `Missing`, long rows truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a table from raw string cells, keeping each as source text.
    pub fn from_strings<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> Self {
        Self::new(
            headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| Value::parse(c.as_ref())).collect())
                .collect(),
        )
    }

    /// Column headers in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&Value::Missing))
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.get(row, col)
    }

    /// Replace the values of `name`, appending the column if it does not exist.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(DegscopeError::Validation(format!(
                "Column '{}' has {} values but the table has {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Rename every header in one step. The new header list must be as wide as the table.
    pub(crate) fn with_columns(mut self, columns: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), self.columns.len());
        self.columns = columns;
        self
    }

    /// Append a row, padding or truncating it to the table width.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    /// Keep the rows for which `predicate` holds, in their original order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(usize, &[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, row)| predicate(*i, row))
            .map(|(_, row)| row.clone())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Write the table as delimited text.
    pub fn to_writer<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush().map_err(|e| DegscopeError::Io {
            path: "<writer>".into(),
            source: e,
        })?;
        Ok(())
    }

    /// Write the table to a CSV/TSV file.
    pub fn write_delimited(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| DegscopeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.to_writer(file, delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_strings(
            &["gene", "lfc"],
            &[vec!["A", "1.5"], vec!["B", "-2"], vec!["C", "NA"]],
        )
    }

    #[test]
    fn test_new_pads_short_rows() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::from("x")]],
        );
        assert_eq!(table.get(0, 1), Some(&Value::Missing));
    }

    #[test]
    fn test_set_column_appends_and_overwrites() {
        let mut table = sample();
        table
            .set_column("flag", vec![true.into(), false.into(), true.into()])
            .unwrap();
        assert_eq!(table.columns(), &["gene", "lfc", "flag"]);

        table
            .set_column("lfc", vec![Value::Number(0.0); 3])
            .unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.value(2, "lfc"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn test_set_column_rejects_wrong_length() {
        let mut table = sample();
        assert!(table.set_column("x", vec![Value::Missing]).is_err());
    }

    #[test]
    fn test_filter_rows_keeps_order() {
        let table = sample();
        let filtered = table.filter_rows(|_, row| !row[1].is_missing());
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(filtered.value(1, "gene"), Some(&Value::from("B")));
    }

    #[test]
    fn test_to_writer_tsv() {
        let table = sample();
        let mut out = Vec::new();
        table.to_writer(&mut out, b'\t').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "gene\tlfc\nA\t1.5\nB\t-2\nC\t\n");
    }
}
