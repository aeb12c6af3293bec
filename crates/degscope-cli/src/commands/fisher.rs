//! Fisher command - test a gene list for over-representation among significant genes.

use colored::Colorize;
use degscope::Degscope;

use super::{fmt_stat, load_dataset, read_gene_list, resolve_cutoffs, CommandResult};
use crate::cli::{CutoffArgs, DatasetArgs};

pub fn run(
    engine: &Degscope,
    args: DatasetArgs,
    genes: String,
    cutoffs: CutoffArgs,
    json_output: bool,
) -> CommandResult {
    let genes = read_gene_list(&genes)?;
    let dataset = load_dataset(engine, &args)?;
    let cutoffs = resolve_cutoffs(engine, cutoffs);

    let result = engine.fisher_exact_test(&genes, &dataset, cutoffs)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let table = &result.contingency;
    println!(
        "{} {} genes against {}",
        "Fisher's exact test:".cyan().bold(),
        genes.len(),
        dataset.name().white().bold()
    );
    println!();
    println!("  {:<16} {:>12} {:>16}", "", "significant", "not significant");
    println!(
        "  {:<16} {:>12} {:>16}",
        "in list", table.in_list_significant, table.in_list_not_significant
    );
    println!(
        "  {:<16} {:>12} {:>16}",
        "not in list", table.not_in_list_significant, table.not_in_list_not_significant
    );
    println!();
    println!("  Odds ratio: {}", fmt_stat(result.odds_ratio));

    let verdict = if result.significant {
        "significant".green().bold()
    } else {
        "not significant".yellow()
    };
    println!("  p-value:    {} ({})", fmt_stat(result.pvalue), verdict);

    if !result.genes_not_found.is_empty() {
        println!();
        println!(
            "{} {} genes not in the dataset: {}",
            "Note:".yellow().bold(),
            result.genes_not_found.len(),
            result.genes_not_found.join(", ")
        );
    }

    Ok(())
}
