use std::path::PathBuf;

use crate::align::{Aligner, OutputFormat};
use crate::error::{PipelineError, Result};
use crate::job::{Dispatcher, ExecutionStrategy, JobConfig, Progress, build_jobs};
use crate::locus::{CoveragePolicy, NamingScheme, Partitioner};
use crate::output::{Confirm, prepare_output_dir, write_results};
use crate::record::read_records;

/// Everything one run needs, fixed for its whole duration
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub infile: PathBuf,
    pub outdir: PathBuf,
    pub species: usize,
    pub naming: NamingScheme,
    pub incomplete_matrix: bool,
    pub job: JobConfig,
    pub cores: usize,
    pub format: OutputFormat,
    /// Directory for per-job FASTA files
    pub temp_dir: PathBuf,
}

impl RunConfig {
    pub fn new(infile: impl Into<PathBuf>, outdir: impl Into<PathBuf>, species: usize) -> Self {
        Self {
            infile: infile.into(),
            outdir: outdir.into(),
            species,
            naming: NamingScheme::default(),
            incomplete_matrix: false,
            job: JobConfig::default(),
            cores: 1,
            format: OutputFormat::default(),
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Reject settings no run can satisfy
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(PipelineError::InvalidConfig(message));
        if self.species == 0 {
            return invalid("species must be at least 1".to_string());
        }
        if self.cores == 0 {
            return invalid("cores must be at least 1".to_string());
        }
        if self.job.window_size == 0 {
            return invalid("window must be at least 1".to_string());
        }
        for (name, value) in [
            ("proportion", self.job.end_proportion),
            ("threshold", self.job.column_threshold),
            ("max divergence", self.job.max_divergence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{} {} is not between 0 and 1", name, value));
            }
        }
        Ok(())
    }

    pub fn coverage(&self) -> CoveragePolicy {
        CoveragePolicy::new(self.species, self.incomplete_matrix)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records_read: usize,
    pub records_skipped: usize,
    pub loci_kept: usize,
    pub loci_dropped: usize,
    pub alignments_written: usize,
    pub alignments_dropped: usize,
}

/// Partition, filter, align and write one input file
pub struct Pipeline<'a> {
    config: &'a RunConfig,
    aligner: &'a dyn Aligner,
    available_cores: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a RunConfig, aligner: &'a dyn Aligner) -> Self {
        Self {
            config,
            aligner,
            available_cores: num_cpus::get(),
        }
    }

    /// Override the detected host concurrency
    pub fn with_available_cores(mut self, available: usize) -> Self {
        self.available_cores = available;
        self
    }

    /// Run the whole pipeline. Every fatal precondition (core count, aligner presence,
    /// readable input, output directory consent) is checked before any job starts.
    pub fn run(&self, confirm: &mut dyn Confirm, progress: &dyn Progress) -> Result<RunSummary> {
        let config = self.config;
        config.validate()?;
        let strategy = ExecutionStrategy::from_cores(config.cores, self.available_cores)?;
        self.aligner
            .check_available()
            .map_err(PipelineError::AlignerUnavailable)?;

        log::info!("Building the locus dictionary");
        let records = read_records(&config.infile).map_err(|source| PipelineError::Input {
            path: config.infile.clone(),
            source,
        })?;
        let mut summary = RunSummary {
            records_read: records.len(),
            ..RunSummary::default()
        };

        let partition = Partitioner::new(config.naming, config.job.allow_ambiguous)
            .partition(records)?;
        summary.records_skipped = partition.skipped.len();

        let filtered = config.coverage().filter(partition.groups);
        summary.loci_kept = filtered.kept.len();
        summary.loci_dropped = filtered.dropped.len();

        prepare_output_dir(&config.outdir, confirm)?;

        let jobs = build_jobs(filtered.kept, config.job);
        log::info!("Aligning with {}", self.aligner.name().to_uppercase());
        log::info!(
            "Alignment begins: {} loci on {} worker(s)",
            jobs.len(),
            strategy.workers()
        );
        let results = Dispatcher::new(self.aligner, &config.temp_dir, progress)
            .dispatch(&jobs, strategy)?;
        log::info!("Alignment ends");

        let written = write_results(&results, &config.outdir, config.format)?;
        summary.alignments_written = written.written;
        summary.alignments_dropped = written.dropped;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::Alignment;
    use crate::error::AlignError;
    use crate::job::SilentProgress;
    use crate::output::AssumeAnswer;
    use std::path::Path;

    fn config() -> RunConfig {
        RunConfig::new("reads.fasta", "out", 4)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_settings_are_rejected() {
        let mut zero_species = config();
        zero_species.species = 0;
        let mut zero_cores = config();
        zero_cores.cores = 0;
        let mut zero_window = config();
        zero_window.job.window_size = 0;
        let mut high_proportion = config();
        high_proportion.job.end_proportion = 1.5;
        let mut negative_divergence = config();
        negative_divergence.job.max_divergence = -0.1;
        let mut nan_threshold = config();
        nan_threshold.job.column_threshold = f64::NAN;

        for bad in [
            zero_species,
            zero_cores,
            zero_window,
            high_proportion,
            negative_divergence,
            nan_threshold,
        ] {
            assert!(matches!(bad.validate(), Err(PipelineError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_invalid_config_fails_before_reading_input() {
        struct Unused;
        impl Aligner for Unused {
            fn name(&self) -> &str {
                "unused"
            }
            fn align(&self, _fasta: &Path) -> std::result::Result<Alignment, AlignError> {
                panic!("no job should run");
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let outdir = dir.path().join("out");
        let mut config = RunConfig::new(dir.path().join("missing.fasta"), &outdir, 0);
        config.temp_dir = dir.path().to_path_buf();
        let err = Pipeline::new(&config, &Unused)
            .run(&mut AssumeAnswer(true), &SilentProgress)
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
        assert!(!outdir.exists());
    }
}
