//! Map command - propose a canonical column mapping for a result table.

use colored::Colorize;
use degscope::Degscope;

use super::{parse_overrides, CommandResult};
use crate::cli::DatasetArgs;

pub fn run(engine: &Degscope, args: DatasetArgs, json_output: bool) -> CommandResult {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let (table, source) = engine.load_table(&args.file)?;
    let mut proposal = engine.map_columns(table.columns(), args.kind);

    let overrides = parse_overrides(&args.overrides)?;
    if !overrides.is_empty() {
        proposal.mapping.merge(&overrides);
        proposal.unmapped_required = proposal.mapping.missing_required(args.kind);
        proposal
            .unmapped_optional
            .retain(|c| !overrides.contains(*c));
        proposal
            .unused_sources
            .retain(|s| !overrides.iter().any(|(_, source)| source == s));
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&proposal)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Column mapping for".cyan().bold(),
        source.file.white(),
        args.kind
    );
    println!();

    for (canonical, source_column) in proposal.mapping.iter() {
        let how = if overrides.contains(canonical) {
            "override".to_string()
        } else {
            proposal
                .matches
                .iter()
                .find(|m| m.canonical == canonical)
                .map(|m| format!("{:?}", m.method).to_lowercase())
                .unwrap_or_default()
        };
        println!(
            "  {:<14} {} {:<24} {}",
            canonical.as_str().green(),
            "<-".dimmed(),
            source_column,
            how.dimmed()
        );
    }

    if !proposal.unmapped_required.is_empty() {
        println!();
        println!("{}", "Required columns without a source:".red().bold());
        for column in &proposal.unmapped_required {
            println!("  {} ({})", column.as_str().red(), column.display_label());
        }
        println!(
            "Resolve with {}",
            "--map canonical=source".cyan()
        );
    }

    if !proposal.unmapped_optional.is_empty() {
        let names: Vec<_> = proposal.unmapped_optional.iter().map(|c| c.as_str()).collect();
        println!();
        println!("{} {}", "Optional, unmapped:".yellow(), names.join(", "));
    }

    if !proposal.unused_sources.is_empty() {
        println!("{} {}", "Unused source columns:".dimmed(), proposal.unused_sources.join(", "));
    }

    Ok(())
}
