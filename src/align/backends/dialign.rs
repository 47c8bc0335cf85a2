use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::ToolBinary;
use crate::align::{Aligner, Alignment};
use crate::error::AlignError;

/// DIALIGN 2 writes its FASTA alignment next to the input as `<input>.fa`
pub struct DialignAligner {
    binary: ToolBinary,
}

impl DialignAligner {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: ToolBinary::new("dialign", "dialign2-2", binary),
        }
    }

    /// `<input><suffix>`, the naming dialign uses for every file it writes
    fn sibling(fasta: &Path, suffix: &str) -> PathBuf {
        let mut name = fasta.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

impl Aligner for DialignAligner {
    fn name(&self) -> &str {
        "dialign"
    }

    fn check_available(&self) -> Result<(), AlignError> {
        self.binary.check().map(|_| ())
    }

    fn align(&self, fasta: &Path) -> Result<Alignment, AlignError> {
        let output = Self::sibling(fasta, ".fa");
        let result = self
            .binary
            .run([OsStr::new("-n"), OsStr::new("-fa"), fasta.as_os_str()])
            .and_then(|_| std::fs::read(&output).map_err(AlignError::from))
            .and_then(|bytes| Alignment::from_fasta(&bytes));
        // dialign also leaves a plain-text report beside the input
        let _ = std::fs::remove_file(&output);
        let _ = std::fs::remove_file(Self::sibling(fasta, ".ali"));
        result
    }
}
