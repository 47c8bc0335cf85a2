pub mod filter;
pub mod partition;

use clap::ValueEnum;
use std::collections::HashMap;
use std::fmt;

use crate::record::Record;

pub use filter::{CoveragePolicy, DropReason, DroppedLocus, FilterOutcome, MIN_RELAXED_TAXA};
pub use partition::{Partition, Partitioner};

/// How the locus name is encoded in a record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NamingScheme {
    /// `sample|locus|...` - the locus is the second pipe field
    #[default]
    #[value(name = "standard")]
    Standard,
    /// `sample_suffix|locus_suffix` - sample joined with the locus prefix
    #[value(name = "faircloth")]
    Faircloth,
}

impl NamingScheme {
    /// Derive the locus key for an identifier, `None` when the locus field is missing
    pub fn locus_key(&self, identifier: &str) -> Option<String> {
        let mut fields = identifier.split('|');
        let first = fields.next()?;
        let second = fields.next()?;
        match self {
            NamingScheme::Standard => Some(second.to_string()),
            NamingScheme::Faircloth => {
                let prefix = second.split('_').next().unwrap_or(second);
                Some(format!("{}_{}", first, prefix))
            }
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingScheme::Standard => write!(f, "standard"),
            NamingScheme::Faircloth => write!(f, "faircloth"),
        }
    }
}

/// Records of one locus, in read order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusGroup {
    pub locus: String,
    pub records: Vec<Record>,
}

impl LocusGroup {
    /// Number of taxa represented, one per record
    pub fn taxon_count(&self) -> usize {
        self.records.len()
    }
}

/// Locus key -> records mapping that iterates in first-seen key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocusGroups {
    groups: Vec<LocusGroup>,
    positions: HashMap<String, usize>,
}

impl LocusGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its locus, creating the group on first use
    pub fn push(&mut self, locus: String, record: Record) {
        match self.positions.get(&locus) {
            Some(&idx) => self.groups[idx].records.push(record),
            None => {
                self.positions.insert(locus.clone(), self.groups.len());
                self.groups.push(LocusGroup {
                    locus,
                    records: vec![record],
                });
            }
        }
    }

    /// Append a whole group, merging with an existing group of the same locus
    pub(crate) fn push_group(&mut self, group: LocusGroup) {
        let LocusGroup { locus, records } = group;
        for record in records {
            self.push(locus.clone(), record);
        }
    }

    pub fn get(&self, locus: &str) -> Option<&LocusGroup> {
        self.positions.get(locus).map(|&idx| &self.groups[idx])
    }

    pub fn contains(&self, locus: &str) -> bool {
        self.positions.contains_key(locus)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocusGroup> {
        self.groups.iter()
    }

    /// Total records across all loci
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(LocusGroup::taxon_count).sum()
    }
}

impl IntoIterator for LocusGroups {
    type Item = LocusGroup;
    type IntoIter = std::vec::IntoIter<LocusGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl FromIterator<LocusGroup> for LocusGroups {
    fn from_iter<I: IntoIterator<Item = LocusGroup>>(iter: I) -> Self {
        let mut groups = LocusGroups::new();
        for group in iter {
            groups.push_group(group);
        }
        groups
    }
}
