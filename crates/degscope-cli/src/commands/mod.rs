//! CLI command implementations.

pub mod compare;
pub mod filter;
pub mod fisher;
pub mod gsea;
pub mod map;
pub mod overlap;
pub mod summary;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use degscope::dataset::split_gene_list;
use degscope::{ColumnMapping, Dataset, Degscope, SignificanceCutoffs, Table, Value};

use crate::cli::{CutoffArgs, DatasetArgs, OutputFormat};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Collect `--map canonical=source` overrides.
pub fn parse_overrides(overrides: &[String]) -> Result<ColumnMapping, Box<dyn std::error::Error>> {
    let mut mapping = ColumnMapping::new();
    for pair in overrides {
        let (canonical, source) = ColumnMapping::parse_override(pair)?;
        mapping.insert(canonical, source);
    }
    Ok(mapping)
}

fn is_snapshot(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

/// Load a dataset from a result table, or restore it from a JSON snapshot.
pub fn load_dataset(
    engine: &Degscope,
    args: &DatasetArgs,
) -> Result<Dataset, Box<dyn std::error::Error>> {
    if is_snapshot(&args.file) {
        let dataset = Dataset::load(&args.file)?;
        if dataset.kind() != args.kind {
            log::warn!(
                "{} holds a {} dataset; ignoring --kind {}",
                args.file.display(),
                dataset.kind(),
                args.kind
            );
        }
        return Ok(dataset);
    }

    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let overrides = parse_overrides(&args.overrides)?;
    let dataset = engine.load_dataset(&args.file, args.name.as_deref(), args.kind, &overrides)?;
    Ok(dataset)
}

/// Read a gene list from a file (one gene per line) or a comma-separated string.
pub fn read_gene_list(arg: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let path = PathBuf::from(arg);
    let text = if path.is_file() {
        fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read gene list {}: {}", path.display(), e))?
    } else {
        arg.to_string()
    };

    let mut genes = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        genes.extend(split_gene_list(line).map(str::to_string));
    }

    if genes.is_empty() {
        return Err("Gene list is empty".into());
    }
    Ok(genes)
}

/// Fill unset cutoff flags from the engine configuration.
pub fn resolve_cutoffs(engine: &Degscope, args: CutoffArgs) -> SignificanceCutoffs {
    let defaults = engine.cutoffs();
    SignificanceCutoffs::new(
        args.padj.unwrap_or(defaults.adj_pvalue_max),
        args.lfc.unwrap_or(defaults.abs_log2fc_min),
    )
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Missing => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
    }
}

/// Table rows as an array of JSON objects keyed by column name.
pub fn table_to_json(table: &Table) -> serde_json::Value {
    let records = table
        .rows()
        .iter()
        .map(|row| {
            let record: serde_json::Map<String, serde_json::Value> = table
                .columns()
                .iter()
                .zip(row)
                .map(|(column, value)| (column.clone(), value_to_json(value)))
                .collect();
            serde_json::Value::Object(record)
        })
        .collect();
    serde_json::Value::Array(records)
}

/// Write a table to `output`, or to stdout when no path is given.
pub fn write_table(table: &Table, output: Option<&Path>, format: OutputFormat) -> CommandResult {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            fs::File::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Tsv => table.to_writer(writer, b'\t')?,
        OutputFormat::Csv => table.to_writer(writer, b',')?,
        OutputFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &table_to_json(table))?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Format a statistic, spelling out the NaN sentinel.
pub fn fmt_stat(value: f64) -> String {
    if value.is_nan() {
        "NA".to_string()
    } else if value.is_infinite() {
        "Inf".to_string()
    } else if value != 0.0 && value.abs() < 1e-3 {
        format!("{:.3e}", value)
    } else {
        format!("{:.4}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inline_gene_list() {
        let genes = read_gene_list("TP53, MDM2,,CDKN1A").unwrap();
        assert_eq!(genes, vec!["TP53", "MDM2", "CDKN1A"]);
    }

    #[test]
    fn test_read_gene_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genes.txt");
        fs::write(&path, "# header\nTP53\n\nMDM2\n").unwrap();
        let genes = read_gene_list(path.to_str().unwrap()).unwrap();
        assert_eq!(genes, vec!["TP53", "MDM2"]);
    }

    #[test]
    fn test_empty_gene_list_is_error() {
        assert!(read_gene_list(" , ").is_err());
    }

    #[test]
    fn test_parse_overrides() {
        let mapping = parse_overrides(&["log2fc=LFC".to_string()]).unwrap();
        assert_eq!(mapping.get(degscope::StandardColumn::Log2fc), Some("LFC"));
        assert!(parse_overrides(&["nonsense".to_string()]).is_err());
    }

    #[test]
    fn test_table_to_json_nulls_missing() {
        let table = Table::from_strings(&["gene", "lfc"], &[vec!["A", "NA"]]);
        let json = table_to_json(&table);
        assert_eq!(json[0]["gene"], "A");
        assert!(json[0]["lfc"].is_null());
    }

    #[test]
    fn test_fmt_stat_sentinels() {
        assert_eq!(fmt_stat(f64::NAN), "NA");
        assert_eq!(fmt_stat(0.5), "0.5000");
    }
}
