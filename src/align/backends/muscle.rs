use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::ToolBinary;
use crate::align::{Aligner, Alignment};
use crate::error::AlignError;

/// MUSCLE (v3 command line); FASTA alignment on stdout
pub struct MuscleAligner {
    binary: ToolBinary,
}

impl MuscleAligner {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: ToolBinary::new("muscle", "muscle", binary),
        }
    }
}

impl Aligner for MuscleAligner {
    fn name(&self) -> &str {
        "muscle"
    }

    fn check_available(&self) -> Result<(), AlignError> {
        self.binary.check().map(|_| ())
    }

    fn align(&self, fasta: &Path) -> Result<Alignment, AlignError> {
        let stdout = self
            .binary
            .run([OsStr::new("-quiet"), OsStr::new("-in"), fasta.as_os_str()])?;
        Alignment::from_fasta(&stdout)
    }
}
