//! Summary command - standardize a table and report its summary.

use std::path::PathBuf;

use colored::Colorize;
use degscope::{DatasetKind, Degscope};

use super::{load_dataset, CommandResult};
use crate::cli::DatasetArgs;

pub fn run(
    engine: &Degscope,
    args: DatasetArgs,
    save: Option<PathBuf>,
    json_output: bool,
) -> CommandResult {
    let dataset = load_dataset(engine, &args)?;

    if let Some(path) = &save {
        dataset.save(path)?;
        log::info!("Saved snapshot to {}", path.display());
    }

    let summary = dataset.summary();

    if json_output {
        let status = serde_json::json!({
            "name": dataset.name(),
            "kind": dataset.kind(),
            "summary": summary,
            "mapping": dataset.mapping(),
            "values_coerced": dataset.report().values_coerced(),
            "source": dataset.source(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Dataset".cyan().bold(),
        dataset.name().white().bold(),
        dataset.kind()
    );
    if let Some(source) = dataset.source() {
        println!("  Source: {} ({})", source.file, source.format);
    }
    println!();

    println!("  Rows:  {}", summary.row_count.to_string().white().bold());
    let gene_label = match dataset.kind() {
        DatasetKind::DifferentialExpression => "Genes:",
        DatasetKind::GOAnalysis => "Genes in terms:",
    };
    println!("  {} {}", gene_label, summary.gene_count.to_string().white().bold());

    if let Some(significant) = summary.significant_count {
        let cutoffs = engine.cutoffs();
        println!(
            "  Significant (padj <= {}, |log2FC| >= {}): {}",
            cutoffs.adj_pvalue_max,
            cutoffs.abs_log2fc_min,
            significant.to_string().green().bold()
        );
        if let (Some(up), Some(down)) = (summary.up_count, summary.down_count) {
            println!(
                "    {} up, {} down",
                up.to_string().red(),
                down.to_string().blue()
            );
        }
    }

    let coerced = dataset.report().values_coerced();
    if coerced > 0 {
        println!();
        println!(
            "{} {} non-numeric values set to missing",
            "Note:".yellow().bold(),
            coerced
        );
    }

    if let Some(path) = save {
        println!();
        println!("{} {}", "Saved".green().bold(), path.display());
    }

    Ok(())
}
