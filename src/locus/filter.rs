use std::fmt;

use super::{LocusGroup, LocusGroups};

/// Minimum number of taxa for any alignment, whatever the policy
pub const MIN_RELAXED_TAXA: usize = 3;

/// Taxon coverage requirement for a locus to be aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoveragePolicy {
    /// Every locus must contain all `species` taxa
    Strict { species: usize },
    /// Incomplete matrix: any locus with at least three taxa
    Relaxed,
}

impl CoveragePolicy {
    pub fn new(species: usize, incomplete_matrix: bool) -> Self {
        if incomplete_matrix {
            CoveragePolicy::Relaxed
        } else {
            CoveragePolicy::Strict { species }
        }
    }

    /// `None` when the group satisfies the policy
    pub fn check(&self, group: &LocusGroup) -> Option<DropReason> {
        let count = group.taxon_count();
        if self.accepts(count) {
            return None;
        }
        match *self {
            CoveragePolicy::Strict { species } if count >= MIN_RELAXED_TAXA => {
                Some(DropReason::MissingTaxa {
                    count,
                    required: species,
                })
            }
            _ => Some(DropReason::TooFewTaxa { count }),
        }
    }

    fn accepts(&self, count: usize) -> bool {
        match *self {
            CoveragePolicy::Strict { species } => count >= species,
            CoveragePolicy::Relaxed => count >= MIN_RELAXED_TAXA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    TooFewTaxa { count: usize },
    MissingTaxa { count: usize, required: usize },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::TooFewTaxa { .. } => {
                write!(f, "Too few taxa (N < {}).", MIN_RELAXED_TAXA)
            }
            DropReason::MissingTaxa { required, .. } => {
                write!(f, "Alignment does not contain all {} taxa.", required)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedLocus {
    pub locus: String,
    pub reason: DropReason,
}

#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub kept: LocusGroups,
    pub dropped: Vec<DroppedLocus>,
}

impl CoveragePolicy {
    /// Split groups into survivors and drops. The input is consumed and a new mapping
    /// is built, so no group is touched while the scan is in progress.
    pub fn filter(&self, groups: LocusGroups) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for group in groups {
            match self.check(&group) {
                None => outcome.kept.push_group(group),
                Some(reason) => {
                    log::warn!("DROPPED locus {}. {}", group.locus, reason);
                    outcome.dropped.push(DroppedLocus {
                        locus: group.locus,
                        reason,
                    });
                }
            }
        }
        outcome
    }
}
