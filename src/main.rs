use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use strfinder_rust::pipeline;

#[derive(Parser, Debug)]
#[command(name = "strfinder-rust", author, version, about = "Reference-guided donor reconstruction and variant calling", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline: map reads, call SNPs/INDELs, rebuild the donor, report STRs
    Run {
        /// Reference sequence file (header line + sequence lines)
        reference: PathBuf,
        /// Paired-end reads file (header line + "read1,read2" lines)
        reads: PathBuf,
        /// Output report path
        #[arg(short, long, default_value = "variants.txt")]
        out: PathBuf,
        /// Directory for stage caches (created if missing)
        #[arg(long = "cache-dir", default_value = "cache")]
        cache_dir: PathBuf,
        /// Dataset name used to key the cache files (defaults to the reads file stem)
        #[arg(long)]
        dataset: Option<String>,
    },
    /// Detect STRs directly on the reference, leaving the other sections empty
    Baseline {
        /// Reference sequence file
        reference: PathBuf,
        /// Output report path
        #[arg(short, long, default_value = "baseline.txt")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { reference, reads, out, cache_dir, dataset } => {
            run_pipeline(&reference, &reads, &out, &cache_dir, dataset.as_deref())
        }
        Commands::Baseline { reference, out } => pipeline::run_baseline(&reference, &out),
    }
}

fn run_pipeline(
    reference: &Path,
    reads: &Path,
    out: &Path,
    cache_dir: &Path,
    dataset: Option<&str>,
) -> Result<()> {
    let dataset = match dataset {
        Some(name) => name.to_string(),
        None => reads
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("cannot derive dataset name from '{}'", reads.display()))?,
    };

    std::fs::create_dir_all(cache_dir).map_err(|e| {
        anyhow::anyhow!("cannot create cache directory '{}': {}", cache_dir.display(), e)
    })?;

    let caches = pipeline::CacheLayout::new(cache_dir, &dataset);
    pipeline::run(reference, reads, &caches, out)
}
