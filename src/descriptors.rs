//! Per-atom positional descriptors.
//!
//! [`MoleculeAnalysis::run`] builds the distance matrix once and drives two
//! fragment passes over it, one towards the molecule termini and one towards
//! the branch termini.

use log::{debug, warn};
use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::distance::DistanceMatrix;
use crate::fragment::{Fragment, FragmentExtractor};
use crate::mol::Molecule;
use crate::properties::{PropertyCalculator, StandardProperties};
use crate::span::{self, TerminusKind};
use crate::symmetry::{equivalence_classes, representatives, symmetric_site_counts};

/// Descriptors of one atom's fragment in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassDescriptors {
    pub bonds_to_end: u32,
    pub rotatable_bonds: usize,
    pub atom_count: usize,
    pub tpsa: f64,
    /// TPSA divided by the atom count, 0 for an empty fragment.
    pub tpsa_per_atom: f64,
    pub volume: f64,
    pub h_acceptors: usize,
    pub h_donors: usize,
    pub pi_system_size: usize,
    /// Kept with the fragment; not part of the report.
    pub logp: f64,
}

impl PassDescriptors {
    pub fn from_fragment<P>(fragment: &Fragment, calc: &P) -> Self
    where
        P: PropertyCalculator<Atom, Bond>,
    {
        let mol = &fragment.mol;
        let atom_count = mol.atom_count();
        let tpsa = calc.tpsa(mol);
        let tpsa_per_atom = if atom_count == 0 {
            0.0
        } else {
            tpsa / atom_count as f64
        };
        PassDescriptors {
            bonds_to_end: fragment.bonds_to_end,
            rotatable_bonds: fragment.rotatable_bonds,
            atom_count,
            tpsa,
            tpsa_per_atom,
            volume: calc.volume(mol),
            h_acceptors: calc.h_acceptors(mol),
            h_donors: calc.h_donors(mol),
            pi_system_size: calc.largest_pi_system(mol),
            logp: calc.logp(mol),
        }
    }
}

/// Everything computed for one atom.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomDescriptors {
    pub index: NodeIndex,
    /// `<symbol>.<display id>`, e.g. `O.3`.
    pub label: String,
    pub relative_span: f64,
    pub symmetry_class: usize,
    /// Atoms in the same symmetry class, this one included.
    pub symmetric_sites: usize,
    /// First atom of its symmetry class.
    pub is_representative: bool,
    pub is_molecule_terminus: bool,
    pub is_branch_terminus: bool,
    pub mol: PassDescriptors,
    pub branch: PassDescriptors,
}

impl AtomDescriptors {
    pub fn pass(&self, kind: TerminusKind) -> &PassDescriptors {
        match kind {
            TerminusKind::Molecule => &self.mol,
            TerminusKind::Branch => &self.branch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Cap on alternative equidistant termini examined per atom.
    pub max_alternatives: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            max_alternatives: 4,
        }
    }
}

/// Descriptors for every atom of one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeAnalysis {
    pub atoms: Vec<AtomDescriptors>,
}

impl MoleculeAnalysis {
    /// Analyse a prepared molecule with the standard property calculators.
    pub fn run(mol: &Molecule, options: &AnalysisOptions) -> Self {
        Self::run_with(mol, options, &StandardProperties)
    }

    pub fn run_with<P>(mol: &Molecule, options: &AnalysisOptions, calc: &P) -> Self
    where
        P: PropertyCalculator<Atom, Bond>,
    {
        let dm = DistanceMatrix::build(mol);
        if !dm.is_connected() {
            warn!(
                "molecule with {} atoms is disconnected; distances across components are ignored",
                mol.atom_count()
            );
        }
        let spans = span::relative_spans(&dm);
        let classes = equivalence_classes(mol);
        let sites = symmetric_site_counts(&classes);
        let reps = representatives(&classes);
        let mol_termini = span::termini(TerminusKind::Molecule, &dm, &spans);
        let branch_termini = span::termini(TerminusKind::Branch, &dm, &spans);
        debug!(
            "{} atoms, {} molecule termini, {} branch termini",
            mol.atom_count(),
            mol_termini.iter().filter(|&&t| t).count(),
            branch_termini.iter().filter(|&&t| t).count()
        );

        let pass = |termini: &[bool]| -> Vec<PassDescriptors> {
            FragmentExtractor::new(mol, &dm, &spans, &classes, termini)
                .with_max_alternatives(options.max_alternatives)
                .extract_all()
                .iter()
                .map(|f| PassDescriptors::from_fragment(f, calc))
                .collect()
        };
        let mol_pass = pass(&mol_termini);
        let branch_pass = pass(&branch_termini);

        let atoms = mol
            .atoms()
            .zip(mol_pass.into_iter().zip(branch_pass))
            .map(|(idx, (mol_desc, branch_desc))| {
                let i = idx.index();
                AtomDescriptors {
                    index: idx,
                    label: mol.atom(idx).label(),
                    relative_span: spans[i],
                    symmetry_class: classes[i],
                    symmetric_sites: sites[i],
                    is_representative: reps[i],
                    is_molecule_terminus: mol_termini[i],
                    is_branch_terminus: branch_termini[i],
                    mol: mol_desc,
                    branch: branch_desc,
                }
            })
            .collect();
        MoleculeAnalysis { atoms }
    }

    /// Atoms to report: all of them, or one per symmetry class.
    pub fn retained(&self, suppress_symmetric: bool) -> impl Iterator<Item = &AtomDescriptors> + '_ {
        self.atoms
            .iter()
            .filter(move |a| !suppress_symmetric || a.is_representative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;

    fn analyse(smi: &str) -> MoleculeAnalysis {
        MoleculeAnalysis::run(&from_smiles(smi).unwrap(), &AnalysisOptions::default())
    }

    fn assert_empty(d: &PassDescriptors) {
        assert_eq!(d.bonds_to_end, 0);
        assert_eq!(d.atom_count, 0);
        assert_eq!(d.rotatable_bonds, 0);
        assert_eq!(d.tpsa, 0.0);
        assert_eq!(d.volume, 0.0);
        assert_eq!(d.pi_system_size, 0);
    }

    #[test]
    fn three_atom_chain() {
        let a = analyse("CCO");
        assert_eq!(a.atoms.len(), 3);
        let middle = &a.atoms[1];
        assert_eq!(middle.label, "C.2");
        assert_eq!(middle.mol.bonds_to_end, 1);
        assert_eq!(middle.mol.atom_count, 0);
        assert_eq!(middle.mol.tpsa_per_atom, 0.0);
        assert_eq!(middle.mol.volume, 0.0);
        assert!(a.atoms[0].is_molecule_terminus);
        assert_empty(&a.atoms[2].mol);
        assert_empty(&a.atoms[2].branch);
    }

    #[test]
    fn tied_ends_keep_the_first() {
        // 1-butanol: the middle carbon is two bonds from either end
        let a = analyse("CCCCO");
        let d = &a.atoms[2];
        assert_eq!(d.mol.bonds_to_end, 2);
        assert_eq!(d.mol.atom_count, 1);
        assert_eq!(d.mol.rotatable_bonds, 1);
        assert_eq!(d.mol.tpsa, 0.0);
        assert_eq!(d.mol.h_donors, 0);
        assert_eq!(d.branch, d.mol);
    }

    #[test]
    fn lighter_alternative_wins() {
        // C.5 of hexanoic acid reaches both oxygens in two bonds; the
        // fragment towards the hydroxyl is the lighter carbonyl side
        let a = analyse("CCCCCC(=O)O");
        let d = &a.atoms[4];
        assert_eq!(d.mol.bonds_to_end, 2);
        assert_eq!(d.mol.atom_count, 2);
        assert!((d.mol.tpsa - 17.07).abs() < 1e-9);
        assert!((d.mol.tpsa_per_atom - 17.07 / 2.0).abs() < 1e-9);
        assert_eq!(d.mol.h_acceptors, 1);
        assert_eq!(d.mol.h_donors, 0);
        assert_eq!(d.mol.pi_system_size, 2);
    }

    #[test]
    fn single_atom_molecule() {
        let a = analyse("C");
        assert_eq!(a.atoms.len(), 1);
        assert_eq!(a.atoms[0].relative_span, 1.0);
        assert_empty(&a.atoms[0].mol);
        assert!((a.atoms[0].mol.logp - 1.46).abs() < 1e-9);
    }

    #[test]
    fn symmetric_suppression() {
        let a = analyse("CC(C)C");
        assert_eq!(a.retained(false).count(), 4);
        let kept: Vec<&str> = a.retained(true).map(|d| d.label.as_str()).collect();
        assert_eq!(kept, vec!["C.1", "C.2"]);
        assert_eq!(a.atoms[0].symmetric_sites, 3);
    }

    #[test]
    fn repeatable() {
        let smi = "CC(C)Cc1ccc(cc1)C(C)C(=O)O";
        assert_eq!(analyse(smi), analyse(smi));
    }
}
