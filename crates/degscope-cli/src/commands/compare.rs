//! Compare command - gene-level comparison across datasets.

use std::collections::HashSet;
use std::path::PathBuf;

use colored::Colorize;
use degscope::{spawn_task, DatasetKind, Degscope, Milestone};

use super::{load_dataset, read_gene_list, resolve_cutoffs, write_table, CommandResult};
use crate::cli::{CutoffArgs, DatasetArgs, OutputFormat};

pub struct CompareArgs {
    pub files: Vec<PathBuf>,
    pub kind: DatasetKind,
    pub overrides: Vec<String>,
    pub genes: Option<String>,
    pub cutoffs: CutoffArgs,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub json: bool,
}

pub fn run(engine: &Degscope, args: CompareArgs, verbose: bool) -> CommandResult {
    let gene_list: Option<HashSet<String>> = match &args.genes {
        Some(genes) => Some(read_gene_list(genes)?.into_iter().collect()),
        None => None,
    };
    let cutoffs = resolve_cutoffs(engine, args.cutoffs);

    let mut datasets = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let dataset_args = DatasetArgs {
            file: file.clone(),
            kind: args.kind,
            name: None,
            overrides: args.overrides.clone(),
        };
        datasets.push(load_dataset(engine, &dataset_args)?);
    }

    let worker = engine.clone();
    let handle = spawn_task(move |progress| {
        worker.compare_datasets_with_progress(&datasets, gene_list.as_ref(), cutoffs, progress)
    });

    let report = |milestone: Milestone| {
        if verbose {
            eprintln!("{} {}", "..".dimmed(), milestone);
        }
    };
    let result = handle.wait_with(&report)?;

    if let Some(path) = &args.output {
        write_table(&result.comparison_table, Some(path), args.format)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Compared".cyan().bold(),
        result.dataset_names.join(", ").white()
    );
    println!();
    println!(
        "  Genes in comparison: {}",
        result.comparison_table.row_count().to_string().white().bold()
    );
    println!(
        "  Common to all:       {}",
        result.common_genes.len().to_string().green().bold()
    );
    for (name, unique) in &result.unique_genes {
        println!("  Unique to {:<10} {}", format!("{}:", name), unique.len());
    }

    if let Some(path) = args.output {
        println!();
        println!("{} {}", "Wrote".green().bold(), path.display());
    }

    Ok(())
}
