use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::AlignError;

pub mod dialign;
pub mod mafft;
pub mod muscle;

pub use dialign::DialignAligner;
pub use mafft::MafftAligner;
pub use muscle::MuscleAligner;

/// Longest stderr excerpt carried into an error message
const STDERR_TAIL: usize = 400;

/// Location of an external aligner binary
#[derive(Debug, Clone)]
pub struct ToolBinary {
    tool: &'static str,
    path: PathBuf,
}

impl ToolBinary {
    pub fn new(tool: &'static str, default_binary: &str, binary: Option<PathBuf>) -> Self {
        Self {
            tool,
            path: binary.unwrap_or_else(|| PathBuf::from(default_binary)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the binary on PATH (or as given)
    pub fn check(&self) -> Result<PathBuf, AlignError> {
        which::which(&self.path).map_err(|_| AlignError::ToolNotFound {
            tool: self.path.display().to_string(),
        })
    }

    /// Run the tool to completion and return its stdout
    pub fn run<I, S>(&self, args: I) -> Result<Vec<u8>, AlignError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AlignError::ToolNotFound {
                    tool: self.path.display().to_string(),
                },
                _ => AlignError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let trimmed = stderr.trim();
            let tail_start = trimmed
                .char_indices()
                .rev()
                .nth(STDERR_TAIL)
                .map(|(idx, _)| idx)
                .unwrap_or(0);
            return Err(AlignError::ToolFailed {
                tool: self.tool.to_string(),
                status: output.status.to_string(),
                stderr: trimmed[tail_start..].to_string(),
            });
        }
        Ok(output.stdout)
    }
}
