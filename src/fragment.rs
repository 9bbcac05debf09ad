//! Tip fragments: the part of a molecule between an atom and its nearest
//! terminus.
//!
//! For every source atom the extractor finds the closest terminus, collects
//! the atoms lying between the two and copies them out as an induced
//! subgraph. Equidistant termini of a different symmetry class yield
//! alternative fragments, and the best one is kept by [`select_best_fragment`].
//! The source atom stays in the copy while candidates are compared so that
//! bonds at the boundary are seen; it is removed from the fragment that is
//! finally returned.

use std::cmp::Ordering;

use log::{trace, warn};
use petgraph::graph::NodeIndex;

use crate::distance::{DistanceMatrix, UNREACHABLE};
use crate::mol::Molecule;
use crate::properties::molecular_weight;
use crate::rotatable::count_rotatable_bonds;

/// What candidate fragments are compared on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentScore {
    pub atom_count: usize,
    pub rotatable_bonds: usize,
    pub weight: f64,
}

impl FragmentScore {
    /// `Less` when `self` is the better fragment: fewer atoms, then more
    /// rotatable bonds, then lower weight.
    pub fn compare(&self, other: &FragmentScore) -> Ordering {
        self.atom_count
            .cmp(&other.atom_count)
            .then_with(|| other.rotatable_bonds.cmp(&self.rotatable_bonds))
            .then_with(|| self.weight.total_cmp(&other.weight))
    }
}

/// Index of the winning candidate; the earliest one wins a full tie.
///
/// `None` only for an empty slice.
pub fn select_best_fragment(scores: &[FragmentScore]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, score) in scores.iter().enumerate() {
        match best {
            Some(b) if score.compare(&scores[b]) != Ordering::Less => {}
            _ => best = Some(i),
        }
    }
    best
}

/// A fragment with its source atom already removed.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub source: NodeIndex,
    /// The terminus the fragment leads to; `None` when the source is a
    /// terminus itself or no terminus is reachable.
    pub terminus: Option<NodeIndex>,
    /// Topological distance from the source to the terminus.
    pub bonds_to_end: u32,
    /// Rotatable bonds counted with the source still attached.
    pub rotatable_bonds: usize,
    /// Parent-molecule indices of the fragment atoms.
    pub atoms: Vec<NodeIndex>,
    pub mol: Molecule,
}

impl Fragment {
    fn empty(source: NodeIndex) -> Self {
        Fragment {
            source,
            terminus: None,
            bonds_to_end: 0,
            rotatable_bonds: 0,
            atoms: Vec::new(),
            mol: Molecule::new(),
        }
    }

    pub fn atom_count(&self) -> usize {
        self.mol.atom_count()
    }

    pub fn is_empty(&self) -> bool {
        self.mol.is_empty()
    }
}

struct Candidate {
    terminus: usize,
    keep: Vec<bool>,
    score: FragmentScore,
}

/// Fragment extraction over one molecule and one terminus set.
///
/// Everything it reads is computed once per molecule and borrowed.
pub struct FragmentExtractor<'a> {
    mol: &'a Molecule,
    dm: &'a DistanceMatrix,
    spans: &'a [f64],
    classes: &'a [usize],
    termini: &'a [bool],
    max_alternatives: usize,
}

impl<'a> FragmentExtractor<'a> {
    pub fn new(
        mol: &'a Molecule,
        dm: &'a DistanceMatrix,
        spans: &'a [f64],
        classes: &'a [usize],
        termini: &'a [bool],
    ) -> Self {
        FragmentExtractor {
            mol,
            dm,
            spans,
            classes,
            termini,
            max_alternatives: 4,
        }
    }

    /// Cap on equidistant termini of a different class examined per atom.
    pub fn with_max_alternatives(mut self, max_alternatives: usize) -> Self {
        self.max_alternatives = max_alternatives;
        self
    }

    /// Nearest terminus of `source` and the alternatives tied with it.
    ///
    /// Termini are scanned in atom order. A strictly closer terminus
    /// replaces the current one and discards the alternatives collected so
    /// far; an equally close terminus whose symmetry class differs from the
    /// current one's becomes an alternative.
    pub fn nearest_termini(&self, source: usize) -> Option<(usize, Vec<usize>)> {
        let mut shortest = UNREACHABLE;
        let mut closest: Option<usize> = None;
        let mut alternatives = Vec::new();
        for t in (0..self.termini.len()).filter(|&t| self.termini[t]) {
            let d = self.dm.raw(source, t);
            if d == UNREACHABLE {
                continue;
            }
            match closest {
                Some(_) if d > shortest => {}
                Some(c) if d == shortest => {
                    if self.classes[t] != self.classes[c] && alternatives.len() < self.max_alternatives
                    {
                        alternatives.push(t);
                    }
                }
                _ => {
                    shortest = d;
                    closest = Some(t);
                    alternatives.clear();
                }
            }
        }
        closest.map(|c| (c, alternatives))
    }

    /// Whether atom `x` belongs to the fragment from `source` towards
    /// `target`.
    ///
    /// `x` must lie on the way to `target`: strictly closer to it than the
    /// source and no farther from the source than the target is, or level
    /// with the source but with a larger relative span. It is rejected when
    /// another terminus is nearer to it, unless it sits as far from the
    /// source as the target does.
    pub fn is_member(&self, source: usize, target: usize, x: usize) -> bool {
        if x == source {
            return false;
        }
        let dm = self.dm;
        let to_target = dm.raw(source, target);
        let x_target = dm.raw(x, target);
        let x_source = dm.raw(x, source);
        if x_target > to_target {
            return false;
        }
        let on_path = (x_target < to_target && (x_source <= to_target || x == target))
            || (x_target == to_target && self.spans[x] > self.spans[source]);
        if !on_path {
            return false;
        }
        let on_other_branch = (0..self.termini.len()).any(|u| {
            self.termini[u]
                && u != target
                && x_target > dm.raw(x, u)
                && x_source != dm.raw(target, source)
        });
        !on_other_branch
    }

    /// Atoms kept for the scaffold towards `target`: the members strictly
    /// between source and target, plus the source itself.
    fn scaffold_atoms(&self, source: usize, target: usize) -> Vec<bool> {
        (0..self.mol.atom_count())
            .map(|x| x == source || (x != target && self.is_member(source, target, x)))
            .collect()
    }

    fn candidate(&self, source: usize, target: usize) -> Candidate {
        let keep = self.scaffold_atoms(source, target);
        let scaffold = self.mol.induced_subgraph(&keep);
        let score = FragmentScore {
            atom_count: scaffold.atom_count(),
            rotatable_bonds: count_rotatable_bonds(&scaffold),
            weight: molecular_weight(&scaffold),
        };
        Candidate {
            terminus: target,
            keep,
            score,
        }
    }

    /// The fragment for `source`, already stripped of the source atom.
    pub fn extract(&self, source: NodeIndex) -> Fragment {
        let s = source.index();
        if self.termini[s] {
            return Fragment::empty(source);
        }
        let Some((closest, alternatives)) = self.nearest_termini(s) else {
            warn!(
                "atom {} has no reachable terminus, using an empty fragment",
                s + 1
            );
            return Fragment::empty(source);
        };

        let mut candidates = vec![self.candidate(s, closest)];
        candidates.extend(alternatives.iter().map(|&t| self.candidate(s, t)));
        let scores: Vec<FragmentScore> = candidates.iter().map(|c| c.score).collect();
        let best = select_best_fragment(&scores).unwrap_or(0);
        trace!(
            "atom {}: {} candidate(s) {:?}, picked terminus {}",
            s + 1,
            candidates.len(),
            scores,
            candidates[best].terminus + 1
        );
        let Candidate {
            terminus,
            mut keep,
            score,
        } = candidates.swap_remove(best);

        keep[s] = false;
        let atoms = keep
            .iter()
            .enumerate()
            .filter(|(_, &k)| k)
            .map(|(i, _)| NodeIndex::new(i))
            .collect();
        Fragment {
            source,
            terminus: Some(NodeIndex::new(terminus)),
            bonds_to_end: self.dm.raw(s, terminus),
            rotatable_bonds: score.rotatable_bonds,
            atoms,
            mol: self.mol.induced_subgraph(&keep),
        }
    }

    /// Fragments for every atom, in atom order.
    pub fn extract_all(&self) -> Vec<Fragment> {
        self.mol.atoms().map(|a| self.extract(a)).collect()
    }
}
