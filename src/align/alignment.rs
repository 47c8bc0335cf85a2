use bio::io::fasta;
use std::ops::Range;

use crate::error::AlignError;
use crate::record::Record;

/// One row of a multiple sequence alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSequence {
    pub id: String,
    pub residues: Vec<u8>,
}

impl AlignedSequence {
    pub fn new(id: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            residues: residues.into(),
        }
    }
}

/// Rows of equal, non-zero length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    rows: Vec<AlignedSequence>,
    length: usize,
}

/// Gap and missing-data symbols
pub fn is_gap(residue: u8) -> bool {
    matches!(residue, b'-' | b'?' | b'.')
}

impl Alignment {
    pub fn new(rows: Vec<AlignedSequence>) -> Result<Self, AlignError> {
        let first = rows.first().ok_or(AlignError::Empty)?;
        let length = first.residues.len();
        if length == 0 {
            return Err(AlignError::Empty);
        }
        if let Some(row) = rows.iter().find(|row| row.residues.len() != length) {
            return Err(AlignError::Ragged {
                id: row.id.clone(),
                found: row.residues.len(),
                expected: length,
            });
        }
        Ok(Self { rows, length })
    }

    /// Parse aligner FASTA output. Residues are upper-cased.
    pub fn from_fasta(bytes: &[u8]) -> Result<Self, AlignError> {
        let mut rows = Vec::new();
        for record in fasta::Reader::new(bytes).records() {
            let record = record?;
            let id = match record.desc() {
                Some(desc) => format!("{} {}", record.id(), desc),
                None => record.id().to_string(),
            };
            rows.push(AlignedSequence::new(id, record.seq().to_ascii_uppercase()));
        }
        Self::new(rows)
    }

    pub fn rows(&self) -> &[AlignedSequence] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(move |row| row.residues[col])
    }

    /// Fraction of rows holding a residue in `col`
    pub fn occupancy(&self, col: usize) -> f64 {
        let filled = self.column(col).filter(|&r| !is_gap(r)).count();
        filled as f64 / self.rows.len() as f64
    }

    /// Keep only the columns in `range`
    pub fn slice_columns(&self, range: Range<usize>) -> Result<Self, AlignError> {
        let rows = self
            .rows
            .iter()
            .map(|row| AlignedSequence::new(row.id.clone(), &row.residues[range.clone()]))
            .collect();
        Self::new(rows)
    }

    /// Reorder rows to follow the order of `records`. Aligners such as muscle emit
    /// rows grouped by similarity; rows with no matching record keep their relative
    /// order at the end.
    pub fn reorder_like(self, records: &[Record]) -> Self {
        let mut remaining: Vec<Option<AlignedSequence>> = self.rows.into_iter().map(Some).collect();
        let mut rows = Vec::with_capacity(remaining.len());
        for record in records {
            let found = remaining.iter_mut().find(|slot| {
                slot.as_ref()
                    .is_some_and(|row| row.id == record.identifier)
            });
            if let Some(row) = found.and_then(Option::take) {
                rows.push(row);
            }
        }
        rows.extend(remaining.into_iter().flatten());
        Self {
            rows,
            length: self.length,
        }
    }
}
