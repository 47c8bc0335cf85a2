use memchr::memchr2;

use super::{LocusGroups, NamingScheme};
use crate::error::{PipelineError, Result};
use crate::record::Record;

/// Result of grouping a record stream by locus
#[derive(Debug, Default)]
pub struct Partition {
    pub groups: LocusGroups,
    /// Identifiers of records dropped for containing ambiguous bases
    pub skipped: Vec<String>,
}

/// Groups records by locus key, optionally discarding ambiguous reads
#[derive(Debug, Clone, Copy, Default)]
pub struct Partitioner {
    scheme: NamingScheme,
    allow_ambiguous: bool,
}

/// Locus keys name output files, so they must stay a single path component
fn is_file_stem(key: &str) -> bool {
    !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\'])
}

/// True when the sequence holds an undetermined base (`N`/`n`)
pub fn has_ambiguous_bases(sequence: &str) -> bool {
    memchr2(b'N', b'n', sequence.as_bytes()).is_some()
}

impl Partitioner {
    pub fn new(scheme: NamingScheme, allow_ambiguous: bool) -> Self {
        Self {
            scheme,
            allow_ambiguous,
        }
    }

    /// Partition records into locus groups. Duplicate identifiers coexist in their group.
    pub fn partition<I>(&self, records: I) -> Result<Partition>
    where
        I: IntoIterator<Item = Record>,
    {
        if self.allow_ambiguous {
            log::info!("NOT removing sequences with ambiguous bases...");
        } else {
            log::info!("Removing ALL sequences with ambiguous bases...");
        }

        let mut partition = Partition::default();
        for record in records {
            let locus = self
                .scheme
                .locus_key(&record.identifier)
                .filter(|key| is_file_stem(key))
                .ok_or_else(|| PipelineError::InvalidIdentifier {
                    identifier: record.identifier.clone(),
                    scheme: self.scheme,
                })?;

            if !self.allow_ambiguous && has_ambiguous_bases(&record.sequence) {
                log::warn!(
                    "Skipping {} because it contains ambiguous bases",
                    record.identifier
                );
                partition.skipped.push(record.identifier);
                continue;
            }
            partition.groups.push(locus, record);
        }
        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new("t1|uce-1", "ACGT"),
            Record::new("t2|uce-1", "ACNT"),
            Record::new("t1|uce-2", "GGGG"),
            Record::new("t3|uce-1", "ACGA"),
            Record::new("t4|uce-2", "ggnn"),
        ]
    }

    #[test]
    fn test_ambiguous_records_are_skipped_by_default() {
        let partition = Partitioner::new(NamingScheme::Standard, false)
            .partition(records())
            .unwrap();

        assert_eq!(partition.skipped, vec!["t2|uce-1", "t4|uce-2"]);
        let uce1: Vec<&str> = partition
            .groups
            .get("uce-1")
            .unwrap()
            .records
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        assert_eq!(uce1, vec!["t1|uce-1", "t3|uce-1"]);
        assert_eq!(partition.groups.get("uce-2").unwrap().taxon_count(), 1);
    }

    #[test]
    fn test_ambiguous_records_kept_when_allowed() {
        let partition = Partitioner::new(NamingScheme::Standard, true)
            .partition(records())
            .unwrap();

        assert!(partition.skipped.is_empty());
        assert_eq!(partition.groups.record_count(), 5);
        assert_eq!(partition.groups.get("uce-1").unwrap().taxon_count(), 3);
    }

    #[test]
    fn test_ambiguous_record_present_iff_allowed() {
        for allow in [false, true] {
            let partition = Partitioner::new(NamingScheme::Standard, allow)
                .partition(records())
                .unwrap();
            for record in records() {
                let present = partition
                    .groups
                    .iter()
                    .flat_map(|g| g.records.iter())
                    .any(|r| r == &record);
                if has_ambiguous_bases(&record.sequence) {
                    assert_eq!(present, allow);
                } else {
                    assert!(present);
                }
            }
        }
    }

    #[test]
    fn test_duplicate_identifiers_coexist() {
        let partition = Partitioner::default()
            .partition(vec![
                Record::new("t1|uce-9", "AAAA"),
                Record::new("t1|uce-9", "AAAA"),
            ])
            .unwrap();
        assert_eq!(partition.groups.get("uce-9").unwrap().taxon_count(), 2);
    }

    #[test]
    fn test_identifier_without_locus_is_rejected() {
        let err = Partitioner::default()
            .partition(vec![Record::new("orphan", "ACGT")])
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_locus_keys_that_are_not_file_names_are_rejected() {
        for identifier in ["t0|../escaped", "t0|bad/one", "t0|a\\b", "t0|", "t0|.", "t0|.."] {
            let err = Partitioner::default()
                .partition(vec![
                    Record::new("t0|good", "ACGT"),
                    Record::new(identifier, "ACGT"),
                ])
                .unwrap_err();
            assert!(
                matches!(err, PipelineError::InvalidIdentifier { .. }),
                "{} accepted",
                identifier
            );
        }
        assert!(
            Partitioner::new(NamingScheme::Faircloth, false)
                .partition(vec![Record::new("dir/chr1|uce_p1", "ACGT")])
                .is_err()
        );
    }

    #[test]
    fn test_faircloth_scheme_groups_by_sample_and_probe() {
        let partition = Partitioner::new(NamingScheme::Faircloth, false)
            .partition(vec![
                Record::new("chr2_88|uce_p1", "ACGT"),
                Record::new("chr2_88|uce_p2", "ACGT"),
            ])
            .unwrap();
        assert_eq!(partition.groups.len(), 1);
        assert!(partition.groups.contains("chr2_88_uce"));
    }
}
