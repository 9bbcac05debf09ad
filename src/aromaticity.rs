use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::mol::{Mol, Molecule};
use crate::rings::RingInfo;
use crate::traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount, HasRingFlag,
};

const SP2_CAPABLE: [u8; 9] = [
    5,  // B
    6,  // C
    7,  // N
    8,  // O
    15, // P
    16, // S
    33, // As
    34, // Se
    52, // Te
];

/// Hückel aromaticity over the SSSR rings.
///
/// A ring whose atoms are all flagged aromatic already is taken as written.
/// Other rings are tested on their Kekulé bond orders; ring bond flags must
/// be set beforehand.
pub fn find_aromatic_rings<A, B>(mol: &Mol<A, B>, rings: &RingInfo) -> Vec<bool>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount + HasAromaticity,
    B: HasBondOrder + HasRingFlag,
{
    rings
        .rings()
        .iter()
        .map(|ring| {
            ring.iter().all(|&a| mol.atom(a).is_aromatic()) || is_huckel_ring(mol, ring)
        })
        .collect()
}

/// Marks atoms and bonds of aromatic rings and clears aromatic flags that
/// ended up outside any ring.
pub fn set_aromaticity(mol: &mut Molecule, rings: &RingInfo) {
    let aromatic_rings = find_aromatic_rings(mol, rings);
    let ring_edges = rings.ring_edges(mol);

    let mut atom_flags = vec![false; mol.atom_count()];
    let mut bond_flags = vec![false; mol.bond_count()];
    for ((ring, edges), _) in rings
        .rings()
        .iter()
        .zip(&ring_edges)
        .zip(&aromatic_rings)
        .filter(|(_, &aromatic)| aromatic)
    {
        for &a in ring {
            atom_flags[a.index()] = true;
        }
        for &e in edges {
            bond_flags[e.index()] = true;
        }
    }

    let atoms: Vec<NodeIndex> = mol.atoms().collect();
    for idx in atoms {
        mol.atom_mut(idx).is_aromatic = atom_flags[idx.index()];
    }
    let bonds: Vec<_> = mol.bonds().collect();
    for edge in bonds {
        let bond = mol.bond_mut(edge);
        if bond_flags[edge.index()] {
            bond.order = BondOrder::Aromatic;
        } else if bond.order == BondOrder::Aromatic {
            bond.order = BondOrder::Single;
        }
    }
}

fn is_huckel_ring<A, B>(mol: &Mol<A, B>, ring: &[NodeIndex]) -> bool
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder + HasRingFlag,
{
    if ring.len() < 3 {
        return false;
    }
    if ring
        .iter()
        .any(|&a| !SP2_CAPABLE.contains(&mol.atom(a).atomic_num()))
    {
        return false;
    }

    let mut pi_total: u8 = 0;
    for &atom_idx in ring {
        match pi_electrons(mol, atom_idx) {
            Some(e) => pi_total = pi_total.saturating_add(e),
            None => return false,
        }
    }
    is_huckel(pi_total)
}

fn pi_electrons<A, B>(mol: &Mol<A, B>, atom_idx: NodeIndex) -> Option<u8>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder + HasRingFlag,
{
    let atom = mol.atom(atom_idx);
    let charge = atom.formal_charge();
    let ring_pi = mol.bonds_of(atom_idx).any(|e| {
        let b = mol.bond(e);
        b.in_ring() && matches!(b.bond_order(), BondOrder::Double | BondOrder::Aromatic)
    });
    let exo_hetero_double = mol.neighbor_bonds(atom_idx).any(|(nb, b)| {
        !b.in_ring()
            && b.bond_order() == BondOrder::Double
            && matches!(mol.atom(nb).atomic_num(), 7 | 8 | 16)
    });
    let has_triple = mol
        .bonds_of(atom_idx)
        .any(|e| mol.bond(e).bond_order() == BondOrder::Triple);
    if has_triple {
        return None;
    }
    let total_degree = mol.degree(atom_idx) as u8 + atom.hydrogen_count();

    match atom.atomic_num() {
        6 => match charge {
            _ if ring_pi => Some(1),
            0 | 1 if exo_hetero_double => Some(0),
            -1 => Some(2),
            1 => Some(0),
            _ => None,
        },
        7 | 15 | 33 => match charge {
            _ if ring_pi => Some(1),
            0 if total_degree <= 3 => Some(2),
            _ => None,
        },
        8 | 16 | 34 | 52 => {
            if ring_pi {
                Some(1)
            } else if total_degree == 2 {
                Some(2)
            } else {
                None
            }
        }
        5 => Some(if ring_pi { 1 } else { 0 }),
        _ => None,
    }
}

fn is_huckel(pi_electrons: u8) -> bool {
    pi_electrons >= 2 && (pi_electrons - 2) % 4 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::prepare;
    use crate::smiles::parse_smiles;

    fn aromatic(smi: &str) -> Vec<bool> {
        let mol = prepare(parse_smiles(smi).unwrap()).unwrap();
        mol.atoms().map(|a| mol.atom(a).is_aromatic).collect()
    }

    #[test]
    fn written_aromatic_rings_stay_aromatic() {
        for smi in ["c1ccccc1", "c1ccncc1", "[nH]1cccc1", "o1cccc1", "s1cccc1", "c1ccc2ccccc2c1"] {
            assert!(aromatic(smi).iter().all(|&a| a), "{smi}");
        }
    }

    #[test]
    fn kekule_rings_are_perceived() {
        assert!(aromatic("C1=CC=CC=C1").iter().all(|&a| a));
        assert!(aromatic("C1=CC=C2C=CC=CC2=C1").iter().all(|&a| a));
        assert!(aromatic("N1C=CC=C1").iter().all(|&a| a));
        assert!(aromatic("[C-]1C=CC=C1").iter().all(|&a| a));
    }

    #[test]
    fn non_aromatic_rings() {
        assert!(aromatic("C1CCCCC1").iter().all(|&a| !a));
        assert!(aromatic("C1=CCC=C1").iter().all(|&a| !a));
        assert!(aromatic("C1=CC=CC=CC=C1").iter().all(|&a| !a));
    }

    #[test]
    fn substituents_are_not_aromatic() {
        let flags = aromatic("Oc1ccccc1");
        assert!(!flags[0]);
        assert!(flags[1..].iter().all(|&a| a));
    }

    #[test]
    fn exocyclic_aromatic_bond_demoted() {
        let mol = prepare(parse_smiles("c1ccccc1:c1ccccc1").unwrap()).unwrap();
        let link = mol
            .bond_between(NodeIndex::new(5), NodeIndex::new(6))
            .unwrap();
        assert_eq!(mol.bond(link).order, BondOrder::Single);
    }

    #[test]
    fn pyridone_carbonyl_ring() {
        let flags = aromatic("O=C1C=CC=CN1");
        assert!(!flags[0]);
        assert!(flags[1..].iter().all(|&a| a));
    }

    #[test]
    fn huckel_rule() {
        assert!(!is_huckel(0));
        assert!(is_huckel(2));
        assert!(!is_huckel(4));
        assert!(is_huckel(6));
        assert!(!is_huckel(8));
        assert!(is_huckel(10));
    }
}
