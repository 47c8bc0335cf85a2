use super::alignment::{Alignment, is_gap};

/// Parameters of the sliding-window trimmer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningParams {
    pub window_size: usize,
    /// Fraction of taxa that must have a residue at a trimmed end
    pub end_proportion: f64,
    /// Fraction of window columns that must meet `end_proportion`
    pub column_threshold: f64,
    /// Largest tolerated per-row divergence from the window consensus
    pub max_divergence: f64,
}

impl Default for RunningParams {
    fn default() -> Self {
        Self {
            window_size: 20,
            end_proportion: 0.65,
            column_threshold: 0.65,
            max_divergence: 0.20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimMethod {
    NoTrim,
    Running(RunningParams),
}

/// Trim an alignment; `None` means no acceptable trimmed alignment exists
pub fn trim(alignment: &Alignment, method: &TrimMethod) -> Option<Alignment> {
    match method {
        TrimMethod::NoTrim => Some(alignment.clone()),
        TrimMethod::Running(params) => running(alignment, params),
    }
}

fn is_comparable(residue: u8) -> bool {
    !is_gap(residue) && residue != b'N'
}

/// Most frequent residue per column, ignoring gaps and `N`. Ties go to the smaller byte.
pub fn consensus(alignment: &Alignment) -> Vec<Option<u8>> {
    (0..alignment.len())
        .map(|col| {
            let mut counts = [0usize; 256];
            for residue in alignment.column(col).filter(|&r| is_comparable(r)) {
                counts[residue as usize] += 1;
            }
            counts
                .iter()
                .enumerate()
                .filter(|&(_, &n)| n > 0)
                .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
                .map(|(byte, _)| byte as u8)
        })
        .collect()
}

struct Scanner<'a> {
    alignment: &'a Alignment,
    params: &'a RunningParams,
    occupancy: Vec<f64>,
    consensus: Vec<Option<u8>>,
}

impl Scanner<'_> {
    fn is_covered(&self, col: usize) -> bool {
        self.occupancy[col] >= self.params.end_proportion
    }

    fn window_passes(&self, start: usize) -> bool {
        let window = start..start + self.params.window_size;
        let covered = window.clone().filter(|&col| self.is_covered(col)).count();
        if (covered as f64 / self.params.window_size as f64) < self.params.column_threshold {
            return false;
        }

        self.alignment.rows().iter().all(|row| {
            let mut compared = 0usize;
            let mut mismatches = 0usize;
            for col in window.clone() {
                let residue = row.residues[col];
                if let (true, Some(base)) = (is_comparable(residue), self.consensus[col]) {
                    compared += 1;
                    if residue != base {
                        mismatches += 1;
                    }
                }
            }
            compared == 0
                || (mismatches as f64 / compared as f64) <= self.params.max_divergence
        })
    }
}

fn running(alignment: &Alignment, params: &RunningParams) -> Option<Alignment> {
    let width = params.window_size;
    if width == 0 || alignment.len() < width {
        return None;
    }

    let scanner = Scanner {
        alignment,
        params,
        occupancy: (0..alignment.len()).map(|c| alignment.occupancy(c)).collect(),
        consensus: consensus(alignment),
    };

    let last_start = alignment.len() - width;
    let start = (0..=last_start).find(|&s| scanner.is_covered(s) && scanner.window_passes(s))?;
    let end = (width..=alignment.len())
        .rev()
        .find(|&e| scanner.is_covered(e - 1) && scanner.window_passes(e - width))?;

    if end <= start {
        return None;
    }
    alignment.slice_columns(start..end).ok()
}
