use bio::io::fasta;
use clap::ValueEnum;
use std::fmt::Write;

use super::alignment::{Alignment, is_gap};

const BLOCK_WIDTH: usize = 50;

/// Serialization formats for trimmed alignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[value(name = "clustal")]
    Clustal,
    #[value(name = "emboss")]
    Emboss,
    #[value(name = "fasta")]
    Fasta,
    #[default]
    #[value(name = "nexus")]
    Nexus,
    #[value(name = "phylip")]
    Phylip,
    #[value(name = "stockholm")]
    Stockholm,
}

impl OutputFormat {
    /// File extension, including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Clustal => ".clw",
            OutputFormat::Emboss => ".emboss",
            OutputFormat::Fasta => ".fa",
            OutputFormat::Nexus => ".nex",
            OutputFormat::Phylip => ".phylip",
            OutputFormat::Stockholm => ".stockholm",
        }
    }

    pub fn all() -> Vec<OutputFormat> {
        vec![
            OutputFormat::Clustal,
            OutputFormat::Emboss,
            OutputFormat::Fasta,
            OutputFormat::Nexus,
            OutputFormat::Phylip,
            OutputFormat::Stockholm,
        ]
    }

    pub fn render(&self, alignment: &Alignment) -> String {
        match self {
            OutputFormat::Clustal => clustal(alignment),
            OutputFormat::Emboss => emboss(alignment),
            OutputFormat::Fasta => fasta(alignment),
            OutputFormat::Nexus => nexus(alignment),
            OutputFormat::Phylip => phylip(alignment),
            OutputFormat::Stockholm => stockholm(alignment),
        }
    }
}

fn text(residues: &[u8]) -> &str {
    std::str::from_utf8(residues).unwrap_or("")
}

fn name_width(alignment: &Alignment) -> usize {
    alignment
        .rows()
        .iter()
        .map(|row| row.id.len())
        .max()
        .unwrap_or(0)
}

/// One line per row; the header is the row id
fn fasta(alignment: &Alignment) -> String {
    let mut buffer = Vec::new();
    {
        let mut writer = fasta::Writer::new(&mut buffer);
        for row in alignment.rows() {
            let _ = writer.write(&row.id, None, &row.residues);
        }
        let _ = writer.flush();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

fn clustal(alignment: &Alignment) -> String {
    let width = name_width(alignment).max(35) + 1;
    let mut out = String::from("CLUSTAL X (1.81) multiple sequence alignment\n\n\n");
    for start in (0..alignment.len()).step_by(BLOCK_WIDTH) {
        let end = (start + BLOCK_WIDTH).min(alignment.len());
        for row in alignment.rows() {
            let _ = writeln!(out, "{:<width$}{}", row.id, text(&row.residues[start..end]));
        }
        let conservation: String = (start..end)
            .map(|col| {
                let mut column = alignment.column(col);
                let first = column.next().unwrap_or(b'-');
                if !is_gap(first) && column.all(|r| r == first) {
                    '*'
                } else {
                    ' '
                }
            })
            .collect();
        let _ = writeln!(out, "{:<width$}{}\n", "", conservation);
    }
    out
}

fn emboss(alignment: &Alignment) -> String {
    let mut out = String::from("########################################\n");
    out.push_str("# Program: locusalign\n");
    out.push_str("# Report_file: stdout\n");
    out.push_str("########################################\n");
    out.push_str("#=======================================\n#\n");
    let _ = writeln!(out, "# Aligned_sequences: {}", alignment.num_rows());
    for (idx, row) in alignment.rows().iter().enumerate() {
        let _ = writeln!(out, "# {}: {}", idx + 1, row.id);
    }
    let _ = writeln!(out, "# Length: {}", alignment.len());
    out.push_str("#\n#=======================================\n\n");

    let width = name_width(alignment).max(13) + 1;
    let mut positions = vec![0usize; alignment.num_rows()];
    for start in (0..alignment.len()).step_by(BLOCK_WIDTH) {
        let end = (start + BLOCK_WIDTH).min(alignment.len());
        for (row, position) in alignment.rows().iter().zip(positions.iter_mut()) {
            let chunk = &row.residues[start..end];
            let first = *position + 1;
            *position += chunk.iter().filter(|&&r| !is_gap(r)).count();
            let _ = writeln!(
                out,
                "{:<width$}{:>6} {} {:>6}",
                row.id,
                first,
                text(chunk),
                *position
            );
        }
        out.push('\n');
    }
    out.push_str("\n#---------------------------------------\n");
    out.push_str("#---------------------------------------\n");
    out
}

fn nexus_name(id: &str) -> String {
    let plain = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if plain {
        id.to_string()
    } else {
        format!("'{}'", id.replace('\'', "''"))
    }
}

fn nexus(alignment: &Alignment) -> String {
    let names: Vec<String> = alignment.rows().iter().map(|r| nexus_name(&r.id)).collect();
    let width = names.iter().map(String::len).max().unwrap_or(0) + 1;

    let mut out = String::from("#NEXUS\nbegin data;\n");
    let _ = writeln!(
        out,
        "dimensions ntax={} nchar={};",
        alignment.num_rows(),
        alignment.len()
    );
    out.push_str("format datatype=dna missing=? gap=-;\nmatrix\n");
    for (name, row) in names.iter().zip(alignment.rows()) {
        let _ = writeln!(out, "{:<width$}{}", name, text(&row.residues));
    }
    out.push_str(";\nend;\n");
    out
}

/// Relaxed sequential PHYLIP: names are kept whole, spaces become underscores
fn phylip(alignment: &Alignment) -> String {
    let names: Vec<String> = alignment
        .rows()
        .iter()
        .map(|r| r.id.replace(char::is_whitespace, "_"))
        .collect();
    let width = names.iter().map(String::len).max().unwrap_or(0).max(10) + 1;

    let mut out = format!(" {} {}\n", alignment.num_rows(), alignment.len());
    for (name, row) in names.iter().zip(alignment.rows()) {
        let _ = writeln!(out, "{:<width$}{}", name, text(&row.residues));
    }
    out
}

fn stockholm(alignment: &Alignment) -> String {
    let names: Vec<String> = alignment
        .rows()
        .iter()
        .map(|r| r.id.replace(char::is_whitespace, "_"))
        .collect();
    let width = names.iter().map(String::len).max().unwrap_or(0) + 1;

    let mut out = String::from("# STOCKHOLM 1.0\n");
    let _ = writeln!(out, "#=GF SQ {}", alignment.num_rows());
    for (name, row) in names.iter().zip(alignment.rows()) {
        let _ = writeln!(out, "{:<width$}{}", name, text(&row.residues));
    }
    out.push_str("//\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::alignment::AlignedSequence;

    fn sample() -> Alignment {
        Alignment::new(vec![
            AlignedSequence::new("taxon_a", "ACGT-A"),
            AlignedSequence::new("taxon b|uce-1", "ACGTTA"),
        ])
        .unwrap()
    }

    #[test]
    fn test_extensions() {
        let extensions: Vec<&str> = OutputFormat::all().iter().map(|f| f.extension()).collect();
        assert_eq!(
            extensions,
            vec![".clw", ".emboss", ".fa", ".nex", ".phylip", ".stockholm"]
        );
    }

    #[test]
    fn test_fasta_keeps_each_row_on_one_line() {
        let long = "A".repeat(70);
        let aln = Alignment::new(vec![
            AlignedSequence::new("x", long.as_bytes()),
            AlignedSequence::new("y|uce-1", long.as_bytes()),
        ])
        .unwrap();
        let rendered = OutputFormat::Fasta.render(&aln);
        assert_eq!(rendered, format!(">x\n{0}\n>y|uce-1\n{0}\n", long));
    }

    #[test]
    fn test_nexus_quotes_unusual_names() {
        let rendered = OutputFormat::Nexus.render(&sample());
        assert!(rendered.starts_with("#NEXUS\nbegin data;\ndimensions ntax=2 nchar=6;\n"));
        assert!(rendered.contains("taxon_a         ACGT-A\n"));
        assert!(rendered.contains("'taxon b|uce-1' ACGTTA\n"));
        assert!(rendered.ends_with(";\nend;\n"));
    }

    #[test]
    fn test_phylip_header_and_rows() {
        let rendered = OutputFormat::Phylip.render(&sample());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], " 2 6");
        assert_eq!(lines[2], "taxon_b|uce-1 ACGTTA");
    }

    #[test]
    fn test_clustal_marks_conserved_columns() {
        let rendered = OutputFormat::Clustal.render(&sample());
        let conservation = rendered.lines().nth(5).unwrap();
        assert_eq!(conservation.trim_start(), "**** *");
    }

    #[test]
    fn test_stockholm_terminator() {
        let rendered = OutputFormat::Stockholm.render(&sample());
        assert!(rendered.starts_with("# STOCKHOLM 1.0\n#=GF SQ 2\n"));
        assert!(rendered.ends_with("//\n"));
    }

    #[test]
    fn test_emboss_positions_skip_gaps() {
        let rendered = OutputFormat::Emboss.render(&sample());
        assert!(rendered.contains("# Aligned_sequences: 2"));
        assert!(rendered.contains("taxon_a            1 ACGT-A      5"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        for format in OutputFormat::all() {
            assert_eq!(format.render(&sample()), format.render(&sample()));
        }
    }
}
