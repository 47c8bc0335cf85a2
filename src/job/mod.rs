pub mod dispatch;

use std::io::Write;
use std::path::Path;

use crate::align::{Aligner, Alignment, AlignmentRun, RunningParams, TrimMethod};
use crate::locus::LocusGroups;
use crate::record::{Record, write_records};

pub use dispatch::{Dispatcher, ExecutionStrategy};

/// Trimming and alignment options shared read-only by every job of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobConfig {
    pub window_size: usize,
    pub end_proportion: f64,
    pub column_threshold: f64,
    pub max_divergence: f64,
    pub trim_enabled: bool,
    pub allow_ambiguous: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        let running = RunningParams::default();
        Self {
            window_size: running.window_size,
            end_proportion: running.end_proportion,
            column_threshold: running.column_threshold,
            max_divergence: running.max_divergence,
            trim_enabled: true,
            allow_ambiguous: false,
        }
    }
}

impl JobConfig {
    pub fn trim_method(&self) -> TrimMethod {
        if self.trim_enabled {
            TrimMethod::Running(RunningParams {
                window_size: self.window_size,
                end_proportion: self.end_proportion,
                column_threshold: self.column_threshold,
                max_divergence: self.max_divergence,
            })
        } else {
            TrimMethod::NoTrim
        }
    }
}

/// One locus worth of alignment work
#[derive(Debug, Clone)]
pub struct Job {
    pub locus: String,
    pub sequences: Vec<Record>,
    pub config: JobConfig,
}

/// Outcome of one job. `trimmed == None` means the locus is dropped from output.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub locus: String,
    pub trimmed: Option<Alignment>,
    /// Set when the aligner itself failed, as opposed to trimming finding nothing
    pub error: Option<String>,
}

impl JobResult {
    pub fn is_trimmed(&self) -> bool {
        self.trimmed.is_some()
    }
}

/// Build one job per surviving locus, in mapping order
pub fn build_jobs(groups: LocusGroups, config: JobConfig) -> Vec<Job> {
    groups
        .into_iter()
        .map(|group| Job {
            locus: group.locus,
            sequences: group.records,
            config,
        })
        .collect()
}

/// Receives one tick per finished job
pub trait Progress: Sync {
    fn tick(&self, result: &JobResult);

    fn finish(&self) {}
}

/// Progress character for a finished job: `.` trimmed, `X` dropped
pub fn mark(result: &JobResult) -> u8 {
    if result.is_trimmed() { b'.' } else { b'X' }
}

/// Writes one [`mark`] per finished job to stdout
pub struct StdoutProgress;

impl Progress for StdoutProgress {
    fn tick(&self, result: &JobResult) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(&[mark(result)]);
        let _ = stdout.flush();
    }

    fn finish(&self) {
        println!();
    }
}

/// Discards progress; used when nobody is watching
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn tick(&self, _result: &JobResult) {}
}

/// Align and trim a single job in its own temporary FASTA file
pub fn run_job(job: &Job, aligner: &dyn Aligner, temp_dir: &Path) -> JobResult {
    let mut result = JobResult {
        locus: job.locus.clone(),
        trimmed: None,
        error: None,
    };

    let temp = tempfile::Builder::new()
        .prefix("locusalign-")
        .suffix(".fasta")
        .tempfile_in(temp_dir)
        .and_then(|mut file| {
            write_records(file.as_file_mut(), &job.sequences)?;
            Ok(file)
        });
    let temp = match temp {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Could not write sequences for {}: {}", job.locus, e);
            result.error = Some(e.to_string());
            return result;
        }
    };

    let mut run = AlignmentRun::new(aligner, temp.path());
    if let Err(e) = run.run_alignment() {
        log::warn!("{} failed to align {}: {}", aligner.name(), job.locus, e);
        result.error = Some(e.to_string());
        return result;
    }
    run.trim_alignment(&job.config.trim_method());
    result.trimmed = run.trimmed.take().map(|aln| aln.reorder_like(&job.sequences));
    result
}
