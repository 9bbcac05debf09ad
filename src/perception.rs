//! Molecule preparation: everything the descriptor engine expects to be
//! settled before it looks at a molecule.
//!
//! [`prepare`] consumes a raw graph from one of the readers and returns it
//! with explicit hydrogens folded away, ring and aromatic flags set, heavy
//! degrees and atom types assigned, and display ids numbered from 1.

use log::trace;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::aromaticity::set_aromaticity;
use crate::atom::AtomType;
use crate::bond::BondOrder;
use crate::element::Element;
use crate::mol::Molecule;
use crate::rings::RingInfo;
use crate::valence::{check_valence, ValenceError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PerceptionError {
    #[error("atom {atom}: unsupported atomic number {atomic_num}")]
    UnknownElement { atom: usize, atomic_num: u8 },
    #[error("{}", join_valence_errors(.0))]
    Valence(Vec<ValenceError>),
}

fn join_valence_errors(errors: &[ValenceError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn prepare(mol: Molecule) -> Result<Molecule, PerceptionError> {
    if let Some(idx) = mol
        .atoms()
        .find(|&a| Element::from_atomic_num(mol.atom(a).atomic_num).is_none())
    {
        return Err(PerceptionError::UnknownElement {
            atom: idx.index() + 1,
            atomic_num: mol.atom(idx).atomic_num,
        });
    }

    let mut mol = fold_hydrogens(mol);

    let rings = RingInfo::sssr(&mol);
    let flags = rings.ring_bond_flags(&mol);
    let edges: Vec<_> = mol.bonds().collect();
    for edge in edges {
        mol.bond_mut(edge).in_ring = flags[edge.index()];
    }
    set_aromaticity(&mut mol, &rings);

    check_valence(&mol).map_err(PerceptionError::Valence)?;

    let atoms: Vec<NodeIndex> = mol.atoms().collect();
    for &idx in &atoms {
        let heavy = mol
            .neighbors(idx)
            .filter(|&nb| mol.atom(nb).atomic_num != 1)
            .count();
        mol.atom_mut(idx).heavy_degree = heavy.min(u8::MAX as usize) as u8;
    }

    let types: Vec<AtomType> = atoms.iter().map(|&idx| perceive_type(&mol, idx)).collect();
    for (&idx, atom_type) in atoms.iter().zip(types) {
        let atom = mol.atom_mut(idx);
        atom.atom_type = atom_type;
        atom.id = idx.index() as u32 + 1;
    }

    trace!(
        "prepared molecule: {} atoms, {} bonds, {} rings",
        mol.atom_count(),
        mol.bond_count(),
        rings.num_rings()
    );
    Ok(mol)
}

/// Remove neutral hydrogens hanging off exactly one heavy atom and add them
/// to that atom's implicit count.
fn fold_hydrogens(mut mol: Molecule) -> Molecule {
    let mut keep = vec![true; mol.atom_count()];
    let mut owners = Vec::new();
    for idx in mol.atoms() {
        let atom = mol.atom(idx);
        if atom.atomic_num != 1 || atom.formal_charge != 0 || atom.hydrogen_count != 0 {
            continue;
        }
        let mut nbs = mol.neighbors(idx);
        if let (Some(owner), None) = (nbs.next(), nbs.next()) {
            if mol.atom(owner).atomic_num != 1 {
                keep[idx.index()] = false;
                owners.push(owner);
            }
        }
    }
    if owners.is_empty() {
        return mol;
    }
    for owner in owners {
        let atom = mol.atom_mut(owner);
        atom.hydrogen_count = atom.hydrogen_count.saturating_add(1);
    }
    mol.induced_subgraph(&keep)
}

fn count_orders(mol: &Molecule, idx: NodeIndex, order: BondOrder) -> usize {
    mol.neighbor_bonds(idx).filter(|(_, b)| b.order == order).count()
}

/// Terminal atoms of `element` attached to `idx` by a double bond.
fn terminal_double_partners(mol: &Molecule, idx: NodeIndex, element: Element) -> usize {
    mol.neighbor_bonds(idx)
        .filter(|&(nb, b)| {
            b.order == BondOrder::Double
                && mol.atom(nb).atomic_num == element.atomic_num()
                && mol.degree(nb) == 1
        })
        .count()
}

fn is_sulfonyl(mol: &Molecule, idx: NodeIndex) -> bool {
    mol.atom(idx).atomic_num == Element::S.atomic_num()
        && mol.degree(idx) == 4
        && terminal_double_partners(mol, idx, Element::O) == 2
}

fn is_sulfinyl(mol: &Molecule, idx: NodeIndex) -> bool {
    mol.atom(idx).atomic_num == Element::S.atomic_num()
        && mol.degree(idx) == 3
        && terminal_double_partners(mol, idx, Element::O) == 1
}

/// Carbon double-bonded to a terminal atom of `element` (C=O, C=S).
fn is_carbonyl_like(mol: &Molecule, idx: NodeIndex, element: Element) -> bool {
    mol.atom(idx).atomic_num == Element::C.atomic_num()
        && terminal_double_partners(mol, idx, element) > 0
}

fn perceive_type(mol: &Molecule, idx: NodeIndex) -> AtomType {
    let atom = mol.atom(idx);
    let Some(element) = Element::from_atomic_num(atom.atomic_num) else {
        return AtomType::Other;
    };
    let doubles = count_orders(mol, idx, BondOrder::Double);
    let triples = count_orders(mol, idx, BondOrder::Triple);

    match element {
        Element::H => AtomType::Hydrogen,
        Element::C => {
            if triples > 0 || doubles >= 2 {
                AtomType::CSp
            } else if doubles == 1 || atom.is_aromatic || atom.formal_charge > 0 {
                AtomType::CSp2
            } else {
                AtomType::CSp3
            }
        }
        Element::N => {
            let neighbors: Vec<NodeIndex> = mol.neighbors(idx).collect();
            if atom.formal_charge > 0 {
                AtomType::NPlus
            } else if triples > 0 {
                AtomType::NSp1
            } else if atom.is_aromatic {
                if atom.hydrogen_count > 0 || atom.heavy_degree == 3 {
                    AtomType::NPlanar3
                } else {
                    AtomType::NSp2
                }
            } else if doubles > 0 {
                AtomType::NSp2
            } else if neighbors.iter().any(|&nb| is_sulfonyl(mol, nb)) {
                AtomType::NSp3
            } else if neighbors.iter().any(|&nb| is_carbonyl_like(mol, nb, Element::O)) {
                AtomType::NAmide
            } else if neighbors.iter().any(|&nb| is_carbonyl_like(mol, nb, Element::S)) {
                AtomType::NThioamide
            } else if neighbors.iter().any(|&nb| mol.atom(nb).is_aromatic) {
                AtomType::NPlanar3
            } else {
                AtomType::NSp3
            }
        }
        Element::O => {
            if atom.formal_charge < 0 {
                AtomType::OMinus
            } else if doubles > 0 {
                AtomType::OSp2
            } else if atom.is_aromatic {
                AtomType::OPlanar3
            } else {
                AtomType::OSp3
            }
        }
        Element::S => {
            if is_sulfonyl(mol, idx) {
                AtomType::SOnyl
            } else if is_sulfinyl(mol, idx) {
                AtomType::SInyl
            } else if doubles > 0 {
                AtomType::S2
            } else {
                AtomType::S3
            }
        }
        Element::P => {
            if terminal_double_partners(mol, idx, Element::O) > 0 {
                AtomType::PAte
            } else {
                AtomType::PIne
            }
        }
        e if e.is_halogen() => AtomType::Halogen,
        _ => AtomType::Other,
    }
}
