//! CSV/TSV loader with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DegscopeError, Result};

use super::source::SourceMetadata;
use super::table::Table;
use super::value::Value;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads delimited result tables exported by analysis pipelines.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the raw table and its metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| DegscopeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| DegscopeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents, self.config.quote)?,
        };

        let table = self.parse_with_delimiter(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        log::debug!(
            "Loaded {} ({} rows x {} columns, {})",
            path.display(),
            table.row_count(),
            table.column_count(),
            format
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse in-memory bytes, detecting the delimiter unless one is configured.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes, self.config.quote)?,
        };
        self.parse_with_delimiter(bytes, delimiter)
    }

    fn parse_with_delimiter(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        if !delimiter.is_ascii() || delimiter == self.config.quote {
            return Err(DegscopeError::InvalidDelimiter(format!(
                "{:?}",
                delimiter as char
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        // Headers are kept verbatim; blank and duplicate names are resolved at standardization.
        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() {
            return Err(DegscopeError::EmptyData("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            // Fully blank lines are spreadsheet padding, not data
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            // Trailing empty fields are tolerated; data past the last header is not
            if let Some(offset) = record
                .iter()
                .skip(headers.len())
                .position(|cell| !cell.trim().is_empty())
            {
                return Err(DegscopeError::Parse {
                    row: row_idx + 1,
                    column: headers.len() + offset + 1,
                    message: format!(
                        "{} fields but the header has {}",
                        record.len(),
                        headers.len()
                    ),
                });
            }
            rows.push(record.iter().map(Value::parse).collect());
        }

        if rows.is_empty() {
            return Err(DegscopeError::EmptyData("No data rows found".to_string()));
        }

        Ok(Table::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Records sampled when detecting the delimiter, header included.
const DETECT_SAMPLE: usize = 10;

/// Pick the delimiter whose header splits into the most columns that the sampled
/// rows agree with.
///
/// Candidates must split the header into at least two columns. Ranking is by the
/// number of rows as wide as the header, then by header width; tab wins ties.
/// Quoted fields are honoured, so commas inside GO term descriptions do not count.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(DegscopeError::EmptyData("No lines to analyze".to_string()));
    }

    let ranked = DELIMITERS.iter().filter_map(|&delim| {
        let widths = sample_widths(bytes, delim, quote);
        let (&header, rows) = widths.split_first()?;
        if header < 2 {
            return None;
        }
        let agreeing = rows.iter().filter(|&&w| w == header).count();
        Some(((agreeing, header, delim == b'\t'), delim))
    });

    Ok(ranked
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, delim)| delim)
        .unwrap_or(b','))
}

/// Field counts of the first non-blank records when split on `delimiter`.
fn sample_widths(bytes: &[u8], delimiter: u8, quote: u8) -> Vec<usize> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes)
        .records()
        .map_while(|record| record.ok())
        .filter(|record| record.iter().any(|cell| !cell.trim().is_empty()))
        .take(DETECT_SAMPLE)
        .map(|record| record.len())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = b"ID\tDescription\tp.adjust\nGO:1\t\"cell cycle, mitotic\"\t0.01\n";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_semicolon_with_decimal_commas() {
        let data = b"gene;log2FC;padj\nTP53;2,5;0,001\nMYC;-1,25;0,2\n";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_needs_content() {
        assert!(matches!(
            detect_delimiter(b" \n\n", b'"'),
            Err(DegscopeError::EmptyData(_))
        ));
    }

    #[test]
    fn test_parse_deseq2_csv() {
        let parser = Parser::new();
        let data = b",baseMean,log2FoldChange,padj\nENSG1,100.5,2.1,0.001\nENSG2,20,-0.3,NA";
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.columns(), &["", "baseMean", "log2FoldChange", "padj"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&Value::from("ENSG1")));
        assert_eq!(table.get(0, 2), Some(&Value::from("2.1")));
        assert_eq!(table.get(1, 3), Some(&Value::Missing));
    }

    #[test]
    fn test_parse_pads_ragged_rows() {
        let parser = Parser::new();
        let data = b"a,b,c\n1,2\n3,4,5,\n";
        let table = parser.parse_bytes(data).unwrap();
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[1].len(), 3);
        assert_eq!(table.get(0, 2), Some(&Value::Missing));
    }

    #[test]
    fn test_data_past_last_header_is_error() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(b','),
            ..Default::default()
        });
        let result = parser.parse_bytes(b"a,b\n1,2\n3,4,5\n");
        match result {
            Err(DegscopeError::Parse { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, 3);
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let parser = Parser::new();
        let result = parser.parse_bytes(b"gene,log2fc\n");
        assert!(matches!(result, Err(DegscopeError::EmptyData(_))));
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..Default::default()
        });
        let table = parser.parse_bytes(b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.row_count(), 1);
    }
}
