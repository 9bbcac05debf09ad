//! Aggregate chemical properties of a (fragment) molecule.
//!
//! Every calculator works on whatever graph it is handed: neighbour counts
//! and ring perception are local to that graph, while hydrogen counts and
//! atom types are the ones the atoms carried over from their parent.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;

use crate::atom::AtomType;
use crate::bond::BondOrder;
use crate::element::Element;
use crate::mol::Mol;
use crate::rings::RingInfo;
use crate::traits::{
    HasAromaticity, HasAtomType, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount,
};

const HYDROGEN_WEIGHT: f64 = 1.008;
const HYDROGEN_VOLUME: f64 = 7.24;
const VABC_BOND_CORRECTION: f64 = 5.92;
const VABC_AROMATIC_RING_CORRECTION: f64 = 14.7;
const VABC_ALIPHATIC_RING_CORRECTION: f64 = 3.8;

/// Seam for the property calculations attached to every fragment.
pub trait PropertyCalculator<A, B> {
    /// Topological polar surface area in square angstroms.
    fn tpsa(&self, mol: &Mol<A, B>) -> f64;
    /// Van der Waals volume in cubic angstroms.
    fn volume(&self, mol: &Mol<A, B>) -> f64;
    fn h_acceptors(&self, mol: &Mol<A, B>) -> usize;
    fn h_donors(&self, mol: &Mol<A, B>) -> usize;
    /// Atom count of the largest conjugated pi system.
    fn largest_pi_system(&self, mol: &Mol<A, B>) -> usize;
    fn molecular_weight(&self, mol: &Mol<A, B>) -> f64;
    fn logp(&self, mol: &Mol<A, B>) -> f64;
}

/// The calculators defined in this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardProperties;

impl<A, B> PropertyCalculator<A, B> for StandardProperties
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount + HasAromaticity + HasAtomType,
    B: HasBondOrder,
{
    fn tpsa(&self, mol: &Mol<A, B>) -> f64 {
        tpsa(mol)
    }

    fn volume(&self, mol: &Mol<A, B>) -> f64 {
        vabc_volume(mol)
    }

    fn h_acceptors(&self, mol: &Mol<A, B>) -> usize {
        h_bond_acceptors(mol)
    }

    fn h_donors(&self, mol: &Mol<A, B>) -> usize {
        h_bond_donors(mol)
    }

    fn largest_pi_system(&self, mol: &Mol<A, B>) -> usize {
        largest_pi_system(mol)
    }

    fn molecular_weight(&self, mol: &Mol<A, B>) -> f64 {
        molecular_weight(mol)
    }

    fn logp(&self, mol: &Mol<A, B>) -> f64 {
        mannhold_logp(mol)
    }
}

#[derive(Default)]
struct BondTally {
    singles: u8,
    doubles: u8,
    triples: u8,
    aromatic: u8,
}

fn bond_tally<A, B: HasBondOrder>(mol: &Mol<A, B>, idx: NodeIndex) -> BondTally {
    let mut tally = BondTally::default();
    for edge in mol.bonds_of(idx) {
        match mol.bond(edge).bond_order() {
            BondOrder::Single => tally.singles += 1,
            BondOrder::Double => tally.doubles += 1,
            BondOrder::Triple => tally.triples += 1,
            BondOrder::Aromatic => tally.aromatic += 1,
        }
    }
    tally
}

/// Polar surface area from Ertl's N and O fragment contributions.
pub fn tpsa<A, B>(mol: &Mol<A, B>) -> f64
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount + HasAromaticity,
    B: HasBondOrder,
{
    mol.atoms().map(|idx| tpsa_contribution(mol, idx)).sum()
}

fn tpsa_contribution<A, B>(mol: &Mol<A, B>, idx: NodeIndex) -> f64
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount + HasAromaticity,
    B: HasBondOrder,
{
    let atom = mol.atom(idx);
    let h = atom.hydrogen_count();
    let charge = atom.formal_charge();
    let t = bond_tally(mol, idx);

    match atom.atomic_num() {
        7 if t.aromatic > 0 => match charge {
            1.. => match (h, t.aromatic, t.singles) {
                (1.., _, _) => 14.14,
                (_, 2, 1) => 3.88,
                _ => 4.10,
            },
            _ => match (h, t.aromatic, t.singles, t.doubles) {
                (1.., _, _, _) => 15.79,
                (_, 3, _, _) => 4.41,
                (_, 2, 1, _) => 4.93,
                (_, 2, _, 1) => 8.39,
                _ => 12.89,
            },
        },
        7 => match charge {
            1.. => match (h, t.singles, t.doubles, t.triples) {
                (0, 4, 0, 0) => 0.0,
                (0, 2, 1, 0) => 3.01,
                (0, 1, 0, 1) => 4.36,
                (1, 3, 0, 0) => 4.44,
                (1, 1, 1, 0) => 13.97,
                (2, 2, 0, 0) => 16.61,
                (2, 0, 1, 0) => 25.59,
                (3, 1, 0, 0) => 27.64,
                _ => 0.0,
            },
            _ => match (h, t.singles, t.doubles, t.triples) {
                (0, 3, 0, 0) => 3.24,
                (0, 1, 1, 0) => 12.36,
                (0, 0, 0, 1) => 23.79,
                (0, 1, 2, 0) => 11.68,
                (0, 0, 1, 1) => 13.60,
                (1, 2, 0, 0) => 12.03,
                (1, 0, 1, 0) => 23.85,
                (2, 1, 0, 0) => 26.02,
                (2.., _, _, _) => 26.02,
                (1, _, _, _) => 12.03,
                _ => 3.24,
            },
        },
        8 if t.aromatic > 0 => 13.14,
        8 => {
            if charge < 0 {
                23.06
            } else if h > 0 {
                20.23
            } else if t.doubles > 0 {
                17.07
            } else {
                9.23
            }
        }
        _ => 0.0,
    }
}

/// VABC volume (Zhao, Abraham & Zissimos 2003).
///
/// Atoms of elements without a tabulated volume contribute nothing.
pub fn vabc_volume<A, B>(mol: &Mol<A, B>) -> f64
where
    A: HasAtomicNum + HasHydrogenCount,
    B: HasBondOrder,
{
    if mol.is_empty() {
        return 0.0;
    }
    let mut volume = 0.0;
    let mut hydrogens = 0usize;
    for idx in mol.atoms() {
        let atom = mol.atom(idx);
        volume += Element::from_atomic_num(atom.atomic_num())
            .and_then(Element::vabc_volume)
            .unwrap_or(0.0);
        volume += f64::from(atom.hydrogen_count()) * HYDROGEN_VOLUME;
        hydrogens += usize::from(atom.hydrogen_count());
    }

    let rings = RingInfo::sssr(mol);
    let aromatic_rings = rings
        .ring_edges(mol)
        .iter()
        .filter(|edges| edges.iter().all(|&e| mol.bond(e).bond_order() == BondOrder::Aromatic))
        .count();
    let aliphatic_rings = rings.num_rings() - aromatic_rings;

    let bonds = mol.bond_count() + hydrogens;
    volume
        - VABC_BOND_CORRECTION * bonds as f64
        - VABC_AROMATIC_RING_CORRECTION * aromatic_rings as f64
        - VABC_ALIPHATIC_RING_CORRECTION * aliphatic_rings as f64
}

/// Oxygens and nitrogens with a free lone pair.
///
/// Amide and thioamide nitrogens, pyrrole-type aromatic nitrogens and
/// cations are not counted.
pub fn h_bond_acceptors<A, B>(mol: &Mol<A, B>) -> usize
where
    A: HasAtomicNum + HasFormalCharge + HasAromaticity + HasAtomType,
{
    mol.atoms()
        .filter(|&idx| {
            let atom = mol.atom(idx);
            if atom.formal_charge() > 0 {
                return false;
            }
            match atom.atomic_num() {
                8 => true,
                7 => !matches!(atom.atom_type(), AtomType::NAmide | AtomType::NThioamide)
                    && !(atom.is_aromatic() && atom.atom_type() == AtomType::NPlanar3),
                _ => false,
            }
        })
        .count()
}

/// Nitrogens and oxygens carrying at least one hydrogen.
pub fn h_bond_donors<A, B>(mol: &Mol<A, B>) -> usize
where
    A: HasAtomicNum + HasHydrogenCount,
{
    mol.atoms()
        .filter(|&idx| {
            let atom = mol.atom(idx);
            matches!(atom.atomic_num(), 7 | 8) && atom.hydrogen_count() > 0
        })
        .count()
}

/// Size of the largest connected set of pi atoms.
///
/// Pi atoms carry a double, triple or aromatic bond; uncharged N, O and S
/// single-bonded to one of them join through their lone pair.
pub fn largest_pi_system<A, B>(mol: &Mol<A, B>) -> usize
where
    A: HasAtomicNum + HasFormalCharge,
    B: HasBondOrder,
{
    let n = mol.atom_count();
    let mut in_pi: Vec<bool> = mol
        .atoms()
        .map(|idx| {
            mol.bonds_of(idx)
                .any(|e| mol.bond(e).bond_order() != BondOrder::Single)
        })
        .collect();
    let lone_pair_donors: Vec<NodeIndex> = mol
        .atoms()
        .filter(|&idx| {
            let atom = mol.atom(idx);
            !in_pi[idx.index()]
                && atom.formal_charge() <= 0
                && matches!(atom.atomic_num(), 7 | 8 | 16)
                && mol.neighbors(idx).any(|nb| in_pi[nb.index()])
        })
        .collect();
    for idx in lone_pair_donors {
        in_pi[idx.index()] = true;
    }

    let mut seen = vec![false; n];
    let mut largest = 0;
    for start in mol.atoms() {
        if !in_pi[start.index()] || seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        let mut size = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(cur) = queue.pop_front() {
            size += 1;
            for nb in mol.neighbors(cur) {
                if in_pi[nb.index()] && !seen[nb.index()] {
                    seen[nb.index()] = true;
                    queue.push_back(nb);
                }
            }
        }
        largest = largest.max(size);
    }
    largest
}

/// Average molecular weight including implicit hydrogens.
pub fn molecular_weight<A, B>(mol: &Mol<A, B>) -> f64
where
    A: HasAtomicNum + HasHydrogenCount,
{
    mol.atoms()
        .map(|idx| {
            let atom = mol.atom(idx);
            let heavy = Element::from_atomic_num(atom.atomic_num()).map_or(0.0, Element::atomic_weight);
            heavy + f64::from(atom.hydrogen_count()) * HYDROGEN_WEIGHT
        })
        .sum()
}

/// Mannhold logP: `1.46 + 0.11 * carbons - 0.11 * heteroatoms`.
pub fn mannhold_logp<A, B>(mol: &Mol<A, B>) -> f64
where
    A: HasAtomicNum,
{
    let (mut carbons, mut hetero) = (0usize, 0usize);
    for idx in mol.atoms() {
        match mol.atom(idx).atomic_num() {
            6 => carbons += 1,
            1 => {}
            _ => hetero += 1,
        }
    }
    1.46 + 0.11 * carbons as f64 - 0.11 * hetero as f64
}
