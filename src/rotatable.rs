use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::AtomType;
use crate::bond::BondOrder;
use crate::mol::Mol;
use crate::traits::{HasAtomType, HasBondOrder, HasHeavyDegree, HasRingFlag};

/// Amide, thioamide and sulfonamide links, in either atom order.
fn is_excluded_linkage(a: AtomType, b: AtomType) -> bool {
    const LINKS: [(AtomType, AtomType); 3] = [
        (AtomType::CSp2, AtomType::NAmide),
        (AtomType::CSp2, AtomType::NThioamide),
        (AtomType::NSp3, AtomType::SOnyl),
    ];
    LINKS
        .iter()
        .any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
}

fn max_bond_order<A, B: HasBondOrder>(mol: &Mol<A, B>, idx: NodeIndex) -> BondOrder {
    mol.bonds_of(idx)
        .map(|e| mol.bond(e).bond_order())
        .max()
        .unwrap_or_default()
}

/// Whether `edge` counts as a rotatable bond of `mol`.
///
/// Bond orders and ring flags are read from `mol` itself, which is usually a
/// fragment; heavy-atom degrees come from the atoms' parent molecule.
pub fn is_rotatable<A, B>(mol: &Mol<A, B>, edge: EdgeIndex) -> bool
where
    A: HasAtomType + HasHeavyDegree,
    B: HasBondOrder + HasRingFlag,
{
    let bond = mol.bond(edge);
    if bond.bond_order() != BondOrder::Single || bond.in_ring() {
        return false;
    }
    let Some((a, b)) = mol.bond_endpoints(edge) else {
        return false;
    };
    if max_bond_order(mol, a) == BondOrder::Triple || max_bond_order(mol, b) == BondOrder::Triple {
        return false;
    }
    let (atom_a, atom_b) = (mol.atom(a), mol.atom(b));
    if atom_a.heavy_degree() <= 1 || atom_b.heavy_degree() <= 1 {
        return false;
    }
    !is_excluded_linkage(atom_a.atom_type(), atom_b.atom_type())
}

pub fn count_rotatable_bonds<A, B>(mol: &Mol<A, B>) -> usize
where
    A: HasAtomType + HasHeavyDegree,
    B: HasBondOrder + HasRingFlag,
{
    mol.bonds().filter(|&e| is_rotatable(mol, e)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mol::Molecule;
    use crate::smiles::from_smiles;

    fn count(smi: &str) -> usize {
        count_rotatable_bonds(&from_smiles(smi).unwrap())
    }

    fn bond(mol: &Molecule, a: usize, b: usize) -> EdgeIndex {
        mol.bond_between(NodeIndex::new(a), NodeIndex::new(b)).unwrap()
    }

    #[test]
    fn alkanes() {
        assert_eq!(count("CC"), 0);
        assert_eq!(count("CCCC"), 1);
        assert_eq!(count("CCCCCC"), 3);
        assert_eq!(count("CC(C)(C)C"), 0);
    }

    #[test]
    fn biaryl_bond_rotates_ring_bonds_do_not() {
        let mol = from_smiles("c1ccccc1-c1ccccc1").unwrap();
        assert!(is_rotatable(&mol, bond(&mol, 5, 6)));
        assert!(!is_rotatable(&mol, bond(&mol, 0, 1)));
        assert_eq!(count_rotatable_bonds(&mol), 1);
        assert_eq!(count("C1CCCCC1"), 0);
    }

    #[test]
    fn amide_bond_never_rotates() {
        let mol = from_smiles("CCC(=O)NCC").unwrap();
        assert!(!is_rotatable(&mol, bond(&mol, 2, 4)));
        // C-C(=O) and N-C still count, terminal bonds do not
        assert_eq!(count_rotatable_bonds(&mol), 2);
        assert_eq!(count("CC(=S)NC"), 0);
    }

    #[test]
    fn sulfonamide_bond_never_rotates() {
        let mol = from_smiles("CCS(=O)(=O)NCC").unwrap();
        assert!(!is_rotatable(&mol, bond(&mol, 2, 5)));
        assert!(is_rotatable(&mol, bond(&mol, 1, 2)));
        assert!(is_rotatable(&mol, bond(&mol, 5, 6)));
    }

    #[test]
    fn bonds_next_to_triple_bonds() {
        assert_eq!(count("CCC#CC"), 0);
        assert_eq!(count("CCCC#N"), 1);
    }

    #[test]
    fn heavy_degree_comes_from_the_parent() {
        let mol = from_smiles("CCCC").unwrap();
        let frag = mol.induced_subgraph(&[false, true, true, false]);
        // both atoms keep heavy degree 2 from the parent
        assert_eq!(count_rotatable_bonds(&frag), 1);
    }

    #[test]
    fn linkage_table_is_symmetric() {
        assert!(is_excluded_linkage(AtomType::NAmide, AtomType::CSp2));
        assert!(is_excluded_linkage(AtomType::SOnyl, AtomType::NSp3));
        assert!(!is_excluded_linkage(AtomType::CSp3, AtomType::NAmide));
    }
}
