use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::align::OutputFormat;
use crate::error::{PipelineError, Result};
use crate::job::JobResult;

/// Answers a yes/no question before a destructive action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Reads the answer from stdin; only `Y`/`y` counts as consent
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "Y" | "y")
    }
}

/// Fixed answer, for `--yes` and for tests
pub struct AssumeAnswer(pub bool);

impl Confirm for AssumeAnswer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Create an empty output directory. An existing one is only removed with consent;
/// without it nothing on disk is touched.
pub fn prepare_output_dir(path: &Path, confirm: &mut dyn Confirm) -> Result<()> {
    log::info!("Creating output directory {}", path.display());
    if path.exists() {
        if !confirm.confirm("Output directory exists, remove [Y/n]? ") {
            return Err(PipelineError::OutputDirExists(path.to_path_buf()));
        }
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Path of the output file for a locus
pub fn output_path(outdir: &Path, locus: &str, format: OutputFormat) -> PathBuf {
    outdir.join(format!("{}{}", locus, format.extension()))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub dropped: usize,
}

/// Write one file per trimmed locus; untrimmed loci are logged and skipped
pub fn write_results(
    results: &[JobResult],
    outdir: &Path,
    format: OutputFormat,
) -> Result<WriteSummary> {
    log::info!("Writing output files");
    let mut summary = WriteSummary::default();
    for result in results {
        match &result.trimmed {
            Some(alignment) => {
                fs::write(
                    output_path(outdir, &result.locus, format),
                    format.render(alignment),
                )?;
                summary.written += 1;
            }
            None => {
                log::warn!("DROPPED {} from output", result.locus);
                summary.dropped += 1;
            }
        }
    }
    Ok(summary)
}
