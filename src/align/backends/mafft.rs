use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::ToolBinary;
use crate::align::{Aligner, Alignment};
use crate::error::AlignError;

/// MAFFT in iterative global-pair mode; the alignment is read from stdout
pub struct MafftAligner {
    binary: ToolBinary,
}

impl MafftAligner {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: ToolBinary::new("mafft", "mafft", binary),
        }
    }
}

impl Aligner for MafftAligner {
    fn name(&self) -> &str {
        "mafft"
    }

    fn check_available(&self) -> Result<(), AlignError> {
        self.binary.check().map(|_| ())
    }

    fn align(&self, fasta: &Path) -> Result<Alignment, AlignError> {
        let stdout = self.binary.run([
            OsStr::new("--globalpair"),
            OsStr::new("--maxiterate"),
            OsStr::new("1000"),
            OsStr::new("--quiet"),
            fasta.as_os_str(),
        ])?;
        Alignment::from_fasta(&stdout)
    }
}
