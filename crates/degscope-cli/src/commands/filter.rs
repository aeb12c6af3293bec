//! Filter command - keep rows matching every criterion and export them.

use std::path::PathBuf;

use colored::Colorize;
use degscope::{Degscope, FilterCriteria};

use super::{load_dataset, read_gene_list, write_table, CommandResult};
use crate::cli::{DatasetArgs, OutputFormat};

pub fn run(
    engine: &Degscope,
    args: DatasetArgs,
    criteria: FilterCriteria,
    genes: Option<String>,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> CommandResult {
    let criteria = match genes {
        Some(genes) => criteria.with_gene_list(read_gene_list(&genes)?),
        None => criteria,
    };

    let dataset = load_dataset(engine, &args)?;
    let kept = engine.filter_dataset(&dataset, &criteria)?;

    write_table(&kept, output.as_deref(), format)?;

    // Keep stdout clean for piping; the tally goes to stderr
    eprintln!(
        "{} {} of {} rows from {}",
        "Kept".green().bold(),
        kept.row_count().to_string().white().bold(),
        dataset.summary().row_count,
        dataset.name()
    );
    if let Some(path) = output {
        eprintln!("{} {}", "Wrote".cyan().bold(), path.display());
    }

    Ok(())
}
