//! Relative span and terminus detection.
//!
//! The relative span of an atom is its eccentricity divided by the
//! molecule's diameter. Molecule termini sit at exactly 1.0; branch termini
//! are local maxima of span within a three-bond window.

use crate::distance::DistanceMatrix;

/// Atoms closer than this many bonds compete for branch-terminus status.
pub const BRANCH_WINDOW: u32 = 4;

/// Which terminus set drove a fragment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminusKind {
    Molecule,
    Branch,
}

impl TerminusKind {
    /// Column prefix used in reports.
    pub fn prefix(self) -> &'static str {
        match self {
            TerminusKind::Molecule => "Mol",
            TerminusKind::Branch => "Branch",
        }
    }
}

/// Per-atom relative span in `[0, 1]`.
///
/// A molecule without any bond (one atom, or isolated atoms only) has
/// diameter 0; every atom then spans the whole molecule and gets 1.0.
pub fn relative_spans(dm: &DistanceMatrix) -> Vec<f64> {
    let diameter = dm.diameter();
    (0..dm.len())
        .map(|i| {
            if diameter == 0 {
                1.0
            } else {
                f64::from(dm.eccentricity(i)) / f64::from(diameter)
            }
        })
        .collect()
}

/// Atoms whose span is exactly 1.0.
pub fn molecule_termini(spans: &[f64]) -> Vec<bool> {
    spans.iter().map(|&s| s == 1.0).collect()
}

/// Atoms with no strictly larger span among atoms fewer than
/// [`BRANCH_WINDOW`] bonds away.
pub fn branch_termini(dm: &DistanceMatrix, spans: &[f64]) -> Vec<bool> {
    (0..dm.len())
        .map(|i| {
            !(0..dm.len()).any(|j| {
                j != i
                    && dm.get(i, j).is_some_and(|d| d < BRANCH_WINDOW)
                    && spans[j] > spans[i]
            })
        })
        .collect()
}

/// Termini for the given pass.
pub fn termini(kind: TerminusKind, dm: &DistanceMatrix, spans: &[f64]) -> Vec<bool> {
    match kind {
        TerminusKind::Molecule => molecule_termini(spans),
        TerminusKind::Branch => branch_termini(dm, spans),
    }
}
