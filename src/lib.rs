pub mod align;
pub mod error;
pub mod job;
pub mod locus;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod record;

// Re-export main types for public API
pub use align::{
    AlignedSequence, Aligner, AlignerKind, Alignment, AlignmentRun, OutputFormat, RunningParams,
    TrimMethod,
};
pub use error::{AlignError, PipelineError};
pub use job::{
    Dispatcher, ExecutionStrategy, Job, JobConfig, JobResult, Progress, SilentProgress,
    StdoutProgress, build_jobs, run_job,
};
pub use locus::{
    CoveragePolicy, DropReason, DroppedLocus, FilterOutcome, LocusGroup, LocusGroups,
    NamingScheme, Partition, Partitioner,
};
pub use output::{
    AssumeAnswer, Confirm, StdinConfirm, WriteSummary, prepare_output_dir, write_results,
};
pub use pipeline::{Pipeline, RunConfig, RunSummary};
pub use record::{Record, read_records, write_records};
