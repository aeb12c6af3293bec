//! Overlap command - hypergeometric test of two gene sets.

use colored::Colorize;
use degscope::Degscope;

use super::{fmt_stat, read_gene_list, CommandResult};

pub fn run(
    engine: &Degscope,
    set_a: String,
    set_b: String,
    background: usize,
    json_output: bool,
) -> CommandResult {
    let a = read_gene_list(&set_a)?;
    let b = read_gene_list(&set_b)?;

    let result = engine.overlap_significance(a, b, background)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", "Gene set overlap".cyan().bold());
    println!();
    println!(
        "  Set A: {}   Set B: {}   Background: {}",
        result.set_a_size, result.set_b_size, result.background_size
    );
    println!(
        "  Overlap: {} (expected {})",
        result.overlap_size.to_string().white().bold(),
        fmt_stat(result.expected)
    );
    println!("  Fold enrichment: {}", fmt_stat(result.fold_enrichment));
    println!("  p-value: {}", fmt_stat(result.pvalue));

    Ok(())
}
