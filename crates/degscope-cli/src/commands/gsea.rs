//! GSEA command - summarize the fold changes of a gene list.

use colored::Colorize;
use degscope::{Degscope, EnrichmentDirection};

use super::{fmt_stat, load_dataset, read_gene_list, CommandResult};
use crate::cli::DatasetArgs;

pub fn run(engine: &Degscope, args: DatasetArgs, genes: String, json_output: bool) -> CommandResult {
    let genes = read_gene_list(&genes)?;
    let dataset = load_dataset(engine, &args)?;

    let result = engine.gsea_lite(&genes, &dataset);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {} genes in {}",
        "GSEA-lite:".cyan().bold(),
        genes.len(),
        dataset.name().white().bold()
    );
    println!();
    println!("  Genes used:    {} ({} values)", result.genes_used, result.values_used);
    println!("  Mean log2FC:   {}", fmt_stat(result.mean_log2fc));
    println!("  Median log2FC: {}", fmt_stat(result.median_log2fc));

    let direction = match result.enrichment_direction {
        EnrichmentDirection::Up => "up".red().bold(),
        EnrichmentDirection::Down => "down".blue().bold(),
        EnrichmentDirection::None => "none".dimmed(),
    };
    println!("  Direction:     {}", direction);

    if !result.genes_not_found.is_empty() {
        println!();
        println!(
            "{} {} genes not in the dataset",
            "Note:".yellow().bold(),
            result.genes_not_found.len()
        );
    }

    Ok(())
}
