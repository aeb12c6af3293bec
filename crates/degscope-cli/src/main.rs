//! Degscope CLI - standardize and compare RNA-Seq result tables.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use degscope::{Degscope, DegscopeConfig, FilterCriteria};

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn build_engine(cli: &Cli) -> Result<Degscope, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => DegscopeConfig::load(path)?,
        None => DegscopeConfig::default(),
    };
    Ok(Degscope::with_config(config))
}

fn run(cli: Cli) -> commands::CommandResult {
    let engine = build_engine(&cli)?;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Map { dataset, json } => commands::map::run(&engine, dataset, json),

        Commands::Summary {
            dataset,
            save,
            json,
        } => commands::summary::run(&engine, dataset, save, json),

        Commands::Filter {
            dataset,
            padj,
            lfc,
            pvalue,
            base_mean,
            fdr,
            gene_count,
            genes,
            output,
            format,
        } => {
            let criteria = FilterCriteria {
                adj_pvalue_max: padj,
                log2fc_min: lfc,
                pvalue_max: pvalue,
                base_mean_min: base_mean,
                fdr_max: fdr,
                gene_count_min: gene_count,
                gene_list: None,
            };
            commands::filter::run(&engine, dataset, criteria, genes, output, format)
        }

        Commands::Fisher {
            dataset,
            genes,
            cutoffs,
            json,
        } => commands::fisher::run(&engine, dataset, genes, cutoffs, json),

        Commands::Gsea {
            dataset,
            genes,
            json,
        } => commands::gsea::run(&engine, dataset, genes, json),

        Commands::Overlap {
            set_a,
            set_b,
            background,
            json,
        } => commands::overlap::run(&engine, set_a, set_b, background, json),

        Commands::Compare {
            files,
            kind,
            overrides,
            genes,
            cutoffs,
            output,
            format,
            json,
        } => commands::compare::run(
            &engine,
            commands::compare::CompareArgs {
                files,
                kind,
                overrides,
                genes,
                cutoffs,
                output,
                format,
                json,
            },
            verbose,
        ),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
