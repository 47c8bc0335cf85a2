use bio::io::fasta;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// A single input read: FASTA header text plus its sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub identifier: String,
    pub sequence: String,
}

impl Record {
    pub fn new(identifier: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            sequence: sequence.into(),
        }
    }

    fn from_fasta(record: &fasta::Record) -> Self {
        let identifier = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        };
        Self {
            identifier,
            sequence: String::from_utf8_lossy(record.seq()).into_owned(),
        }
    }
}

/// Read every record of a FASTA file, in file order
pub fn read_records<P: AsRef<Path>>(path: P) -> io::Result<Vec<Record>> {
    let reader = fasta::Reader::new(File::open(path)?);
    reader
        .records()
        .map(|record| record.map(|r| Record::from_fasta(&r)))
        .collect()
}

/// Write records as FASTA. The identifier is written verbatim as the header.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> io::Result<()> {
    let mut writer = fasta::Writer::new(writer);
    for record in records {
        writer.write(&record.identifier, None, record.sequence.as_bytes())?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_keeps_description_in_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fasta");
        std::fs::write(
            &path,
            ">taxon_a|uce-1 |contig-9\nACGT\nACGT\n>taxon_b|uce-1\nTTTT\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "taxon_a|uce-1 |contig-9");
        assert_eq!(records[0].sequence, "ACGTACGT");
        assert_eq!(records[1].identifier, "taxon_b|uce-1");
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let records = vec![
            Record::new("b|locus1", "ACGT"),
            Record::new("a|locus1", "AC-T"),
        ];
        let mut buffer = Vec::new();
        write_records(&mut buffer, &records).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            ">b|locus1\nACGT\n>a|locus1\nAC-T\n"
        );
    }
}
