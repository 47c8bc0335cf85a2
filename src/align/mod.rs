pub mod alignment;
pub mod backends;
pub mod format;
pub mod trim;

use clap::ValueEnum;
use std::path::{Path, PathBuf};

use crate::error::AlignError;

pub use alignment::{AlignedSequence, Alignment};
pub use format::OutputFormat;
pub use trim::{RunningParams, TrimMethod};

use backends::{DialignAligner, MafftAligner, MuscleAligner};

/// Common trait for all alignment back-ends
pub trait Aligner: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Verify the back-end can run at all. Called once, before any job is scheduled.
    fn check_available(&self) -> Result<(), AlignError> {
        Ok(())
    }

    /// Align the sequences of a FASTA file
    fn align(&self, fasta: &Path) -> Result<Alignment, AlignError>;

    /// Trim an alignment; `None` when no trimmed alignment meets the thresholds
    fn trim(&self, alignment: &Alignment, method: &TrimMethod) -> Option<Alignment> {
        trim::trim(alignment, method)
    }
}

/// Available alignment back-ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlignerKind {
    #[default]
    #[value(name = "mafft")]
    Mafft,
    #[value(name = "muscle")]
    Muscle,
    #[value(name = "dialign")]
    Dialign,
}

impl AlignerKind {
    /// Canonical name of the back-end
    pub fn name(&self) -> &'static str {
        match self {
            AlignerKind::Mafft => "mafft",
            AlignerKind::Muscle => "muscle",
            AlignerKind::Dialign => "dialign",
        }
    }

    /// Build the back-end, optionally overriding the binary location
    pub fn build(&self, binary: Option<PathBuf>) -> Box<dyn Aligner> {
        match self {
            AlignerKind::Mafft => Box::new(MafftAligner::new(binary)),
            AlignerKind::Muscle => Box::new(MuscleAligner::new(binary)),
            AlignerKind::Dialign => Box::new(DialignAligner::new(binary)),
        }
    }
}

/// Alignment state for one locus file: align first, then trim
pub struct AlignmentRun<'a> {
    aligner: &'a dyn Aligner,
    input: &'a Path,
    pub alignment: Option<Alignment>,
    pub trimmed: Option<Alignment>,
}

impl<'a> AlignmentRun<'a> {
    pub fn new(aligner: &'a dyn Aligner, input: &'a Path) -> Self {
        Self {
            aligner,
            input,
            alignment: None,
            trimmed: None,
        }
    }

    pub fn run_alignment(&mut self) -> Result<&Alignment, AlignError> {
        let alignment = self.aligner.align(self.input)?;
        Ok(&*self.alignment.insert(alignment))
    }

    /// Populate `trimmed`. A run whose alignment step has not succeeded stays untrimmed.
    pub fn trim_alignment(&mut self, method: &TrimMethod) -> Option<&Alignment> {
        self.trimmed = self
            .alignment
            .as_ref()
            .and_then(|alignment| self.aligner.trim(alignment, method));
        self.trimmed.as_ref()
    }
}
