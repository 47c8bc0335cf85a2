use rayon::prelude::*;
use std::path::{Path, PathBuf};

use super::{Job, JobResult, Progress, run_job};
use crate::align::Aligner;
use crate::error::{PipelineError, Result};

/// How jobs are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// One job after another on the calling thread
    Sequential,
    /// A fixed-size worker pool; results still come back in submission order
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    /// Pick a strategy for `cores`, refusing more workers than the host provides
    pub fn from_cores(cores: usize, available: usize) -> Result<Self> {
        if cores == 0 {
            return Err(PipelineError::InvalidConfig(
                "at least one core is required".to_string(),
            ));
        }
        if cores > available {
            return Err(PipelineError::InsufficientCores {
                requested: cores,
                available,
            });
        }
        Ok(if cores == 1 {
            ExecutionStrategy::Sequential
        } else {
            ExecutionStrategy::Parallel { workers: cores }
        })
    }

    pub fn workers(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { workers } => *workers,
        }
    }
}

/// Runs jobs against a single aligner, each in its own temporary file
pub struct Dispatcher<'a> {
    aligner: &'a dyn Aligner,
    temp_dir: PathBuf,
    progress: &'a dyn Progress,
}

impl<'a> Dispatcher<'a> {
    pub fn new(aligner: &'a dyn Aligner, temp_dir: &Path, progress: &'a dyn Progress) -> Self {
        Self {
            aligner,
            temp_dir: temp_dir.to_path_buf(),
            progress,
        }
    }

    fn execute(&self, job: &Job) -> JobResult {
        let result = run_job(job, self.aligner, &self.temp_dir);
        self.progress.tick(&result);
        result
    }

    /// Run every job. Results are returned in the order of `jobs`.
    pub fn dispatch(&self, jobs: &[Job], strategy: ExecutionStrategy) -> Result<Vec<JobResult>> {
        let results: Vec<JobResult> = match strategy {
            ExecutionStrategy::Sequential => jobs.iter().map(|job| self.execute(job)).collect(),
            ExecutionStrategy::Parallel { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|idx| format!("locusalign-worker-{}", idx))
                    .build()?;
                pool.install(|| jobs.par_iter().map(|job| self.execute(job)).collect())
            }
        };
        self.progress.finish();
        Ok(results)
    }
}
