//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use degscope::DatasetKind;
use std::path::PathBuf;

/// Degscope: standardize and compare RNA-Seq result tables
#[derive(Parser)]
#[command(name = "degscope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// A result table to load, or a saved `.dataset.json` snapshot.
#[derive(Args, Clone, Debug)]
pub struct DatasetArgs {
    /// Path to the result table (CSV/TSV) or dataset snapshot
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Table kind: deg (differential expression) or go (GO/KEGG enrichment)
    #[arg(short, long, default_value = "deg", value_parser = parse_kind)]
    pub kind: DatasetKind,

    /// Dataset name (default: file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Mapping override as canonical=source, e.g. gene_id=Geneid (repeatable)
    #[arg(short = 'm', long = "map", value_name = "CANONICAL=SOURCE")]
    pub overrides: Vec<String>,
}

/// Significance cutoffs; unset values come from the configuration.
#[derive(Args, Clone, Copy, Debug)]
pub struct CutoffArgs {
    /// Adjusted p-value cutoff
    #[arg(long)]
    pub padj: Option<f64>,

    /// Absolute log2 fold-change cutoff
    #[arg(long)]
    pub lfc: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Propose a column mapping for a result table
    Map {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Standardize a table and print its summary
    Summary {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Save the standardized dataset as a JSON snapshot
        #[arg(long, value_name = "SNAPSHOT")]
        save: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter a dataset and export the kept rows
    Filter {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Keep rows with adj_pvalue <= VALUE
        #[arg(long)]
        padj: Option<f64>,

        /// Keep rows with |log2fc| >= VALUE
        #[arg(long)]
        lfc: Option<f64>,

        /// Keep rows with pvalue <= VALUE
        #[arg(long)]
        pvalue: Option<f64>,

        /// Keep rows with base_mean >= VALUE
        #[arg(long)]
        base_mean: Option<f64>,

        /// Keep rows with fdr <= VALUE
        #[arg(long)]
        fdr: Option<f64>,

        /// Keep rows with gene_count >= VALUE
        #[arg(long)]
        gene_count: Option<f64>,

        /// Gene list: comma-separated genes or a file with one gene per line
        #[arg(short, long)]
        genes: Option<String>,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "tsv")]
        format: OutputFormat,
    },

    /// Fisher's exact test of a gene list against the significant genes
    Fisher {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Gene list: comma-separated genes or a file with one gene per line
        #[arg(short, long)]
        genes: String,

        #[command(flatten)]
        cutoffs: CutoffArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mean and median log2 fold change of a gene list
    Gsea {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Gene list: comma-separated genes or a file with one gene per line
        #[arg(short, long)]
        genes: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hypergeometric significance of the overlap between two gene sets
    Overlap {
        /// First gene set: comma-separated genes or a file
        #[arg(short = 'a', long)]
        set_a: String,

        /// Second gene set: comma-separated genes or a file
        #[arg(short = 'b', long)]
        set_b: String,

        /// Total number of genes in the universe
        #[arg(long)]
        background: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the genes of two or more datasets
    Compare {
        /// Result tables or dataset snapshots
        #[arg(value_name = "FILE", num_args = 2.., required = true)]
        files: Vec<PathBuf>,

        /// Table kind for all files: deg or go
        #[arg(short, long, default_value = "deg", value_parser = parse_kind)]
        kind: DatasetKind,

        /// Mapping override applied to every result table, e.g. gene_id=Unnamed: 0
        /// (repeatable; snapshots keep their own mapping)
        #[arg(short = 'm', long = "map", value_name = "CANONICAL=SOURCE")]
        overrides: Vec<String>,

        /// Restrict each dataset to these genes
        #[arg(short, long)]
        genes: Option<String>,

        #[command(flatten)]
        cutoffs: CutoffArgs,

        /// Write the comparison table here (default: print a summary only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format for the comparison table
        #[arg(short, long, default_value = "tsv")]
        format: OutputFormat,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_kind(s: &str) -> Result<DatasetKind, String> {
    DatasetKind::from_name(s).ok_or_else(|| format!("Unknown table kind: {}. Use deg or go.", s))
}

#[derive(Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
