use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

use locusalign::logging::{self, Verbosity};
use locusalign::{
    AlignerKind, AssumeAnswer, Confirm, JobConfig, NamingScheme, OutputFormat, Pipeline,
    PipelineError, RunConfig, RunSummary, StdinConfirm, StdoutProgress,
};

/// Parse a fraction in [0, 1]
fn parse_fraction(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", value))?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(format!("{} is not between 0 and 1", value));
    }
    Ok(parsed)
}

/// Align records in a file of per-locus reads
#[derive(Debug, Parser)]
#[command(name = "locusalign", author, version, about)]
struct Cli {
    /// The FASTA file containing reads associated with loci
    infile: PathBuf,

    /// A directory for the output
    outdir: PathBuf,

    /// Number of species expected in each alignment
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    species: u32,

    /// The aligner to use
    #[arg(long, value_enum, default_value = "mafft")]
    aligner: AlignerKind,

    /// Path to the aligner binary (default: looked up on PATH)
    #[arg(long = "aligner-path", value_name = "PATH")]
    aligner_path: Option<PathBuf>,

    /// Take faircloth+stephens probe names
    #[arg(long)]
    faircloth: bool,

    /// Allow alignments containing not all species
    #[arg(long = "incomplete-matrix")]
    incomplete_matrix: bool,

    /// Do not trim alignments
    #[arg(long)]
    notrim: bool,

    /// Sliding window size for trimming
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    window: u32,

    /// The proportion of taxa required to have sequence at alignment ends
    #[arg(long, default_value_t = 0.65, value_parser = parse_fraction)]
    proportion: f64,

    /// The proportion of residues required across the window in proportion of taxa
    #[arg(long, default_value_t = 0.65, value_parser = parse_fraction)]
    threshold: f64,

    /// The max proportion of sequence divergence allowed between any row of the alignment
    /// and the alignment consensus
    #[arg(
        long = "max-divergence",
        alias = "max_divergence",
        default_value_t = 0.20,
        value_parser = parse_fraction
    )]
    max_divergence: f64,

    /// Allow reads in alignments containing N-bases
    #[arg(long)]
    ambiguous: bool,

    /// Use multiple cores for alignment
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    cores: u32,

    /// Format of the output alignments
    #[arg(long = "output-format", value_enum, default_value = "nexus")]
    output_format: OutputFormat,

    /// Directory for temporary per-locus files (default: system temp dir)
    #[arg(long = "temp-dir", value_name = "DIR")]
    temp_dir: Option<PathBuf>,

    /// Remove an existing output directory without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// The logging level to use
    #[arg(long, value_enum, default_value = "INFO")]
    verbosity: Verbosity,

    /// The path to a directory to hold logs
    #[arg(long = "log-path", value_name = "DIR")]
    log_path: Option<PathBuf>,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.infile, &self.outdir, self.species as usize);
        config.naming = if self.faircloth {
            NamingScheme::Faircloth
        } else {
            NamingScheme::Standard
        };
        config.incomplete_matrix = self.incomplete_matrix;
        config.job = JobConfig {
            window_size: self.window as usize,
            end_proportion: self.proportion,
            column_threshold: self.threshold,
            max_divergence: self.max_divergence,
            trim_enabled: !self.notrim,
            allow_ambiguous: self.ambiguous,
        };
        config.cores = self.cores as usize;
        config.format = self.output_format;
        if let Some(dir) = &self.temp_dir {
            config.temp_dir = dir.clone();
        }
        config
    }
}

/// A declined overwrite ends the run quietly; `None` means nothing was done
fn finished(result: locusalign::error::Result<RunSummary>) -> Result<Option<RunSummary>> {
    match result {
        Ok(summary) => Ok(Some(summary)),
        Err(PipelineError::OutputDirExists(path)) => {
            log::warn!("Keeping existing output directory {}, exiting", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_path {
        if !dir.is_dir() {
            return Err(anyhow!("Log path {} is not a directory", dir.display()));
        }
    }
    logging::init(cli.verbosity, cli.log_path.as_deref()).context("Failed to set up logging")?;
    log::info!("{}", logging::banner("Starting locusalign"));

    let config = cli.run_config();
    let aligner = cli.aligner.build(cli.aligner_path.clone());
    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeAnswer(true))
    } else {
        Box::new(StdinConfirm)
    };

    let result = Pipeline::new(&config, aligner.as_ref())
        .run(confirm.as_mut(), &StdoutProgress);
    let Some(summary) = finished(result)
        .with_context(|| format!("Failed to align loci from {}", config.infile.display()))?
    else {
        return Ok(());
    };

    log::info!(
        "Read {} records ({} skipped); kept {} loci, dropped {}",
        summary.records_read,
        summary.records_skipped,
        summary.loci_kept,
        summary.loci_dropped
    );
    log::info!(
        "Wrote {} alignments, dropped {} after trimming",
        summary.alignments_written,
        summary.alignments_dropped
    );
    log::info!("{}", logging::banner("Completed locusalign"));
    Ok(())
}
