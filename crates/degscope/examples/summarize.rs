//! Example: Standardize a result table and print what was mapped.
//!
//! Usage:
//!   cargo run --example summarize -- <file_path> [deg|go]
//!
//! Example:
//!   cargo run --example summarize -- deseq2_results.csv deg

use std::env;
use std::path::Path;

use degscope::{ColumnMapping, DatasetKind, Degscope};

fn main() -> degscope::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example summarize -- <file_path> [deg|go]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let kind = args
        .get(2)
        .and_then(|k| DatasetKind::from_name(k))
        .unwrap_or(DatasetKind::DifferentialExpression);

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Degscope: {} ({})", path.display(), kind);
    println!("{}", separator);
    println!();

    let engine = Degscope::new();
    let (table, _) = engine.load_table(path)?;
    let proposal = engine.map_columns(table.columns(), kind);

    println!("## Mapping");
    for m in &proposal.matches {
        println!(
            "  {:14} <- {:24} {:?} ({:.2})",
            m.canonical.as_str(),
            m.source,
            m.method,
            m.method.confidence()
        );
    }
    for column in &proposal.unmapped_required {
        println!("  {:14} <- (unresolved, required)", column.as_str());
    }
    println!();

    if !proposal.is_complete() {
        eprintln!("Cannot standardize until the required columns are mapped.");
        std::process::exit(2);
    }

    let dataset = engine.load_dataset(path, None, kind, &ColumnMapping::new())?;
    let summary = dataset.summary();

    println!("## Summary");
    println!("  Rows: {}", summary.row_count);
    println!("  Genes: {}", summary.gene_count);
    if let Some(significant) = summary.significant_count {
        println!(
            "  Significant: {} ({} up, {} down)",
            significant,
            summary.up_count.unwrap_or(0),
            summary.down_count.unwrap_or(0)
        );
    }
    println!("  Values set to missing: {}", dataset.report().values_coerced());

    Ok(())
}
