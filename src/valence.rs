use petgraph::graph::NodeIndex;

use crate::element::Element;
use crate::mol::Mol;
use crate::traits::{HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValenceError {
    pub atom_idx: NodeIndex,
    pub atomic_num: u8,
    pub actual_valence: u8,
    pub allowed_valences: Vec<u8>,
}

impl std::fmt::Display for ValenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sym = Element::from_atomic_num(self.atomic_num)
            .map(|e| e.symbol())
            .unwrap_or("?");
        write!(
            f,
            "atom {} ({}): valence {} not in {:?}",
            self.atom_idx.index() + 1,
            sym,
            self.actual_valence,
            self.allowed_valences,
        )
    }
}

impl std::error::Error for ValenceError {}

/// Sum of bond valence contributions, without hydrogens.
pub fn bond_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    B: HasBondOrder,
{
    mol.bonds_of(atom)
        .map(|ei| mol.bond(ei).bond_order().valence_contribution())
        .sum()
}

pub fn total_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    A: HasHydrogenCount,
    B: HasBondOrder,
{
    bond_valence(mol, atom) + mol.atom(atom).hydrogen_count()
}

/// Default valences shifted by formal charge: an onium N or O gains a bond,
/// an anion or carbocation loses one.
fn charged_valences(element: Element, charge: i8) -> Vec<u8> {
    let shifts_up = matches!(
        element,
        Element::N | Element::P | Element::O | Element::S | Element::Se | Element::As
    );
    element
        .default_valences()
        .iter()
        .filter_map(|&v| {
            let shifted = if shifts_up {
                v as i16 + charge as i16
            } else {
                v as i16 - (charge as i16).abs()
            };
            u8::try_from(shifted).ok()
        })
        .collect()
}

/// Hydrogens needed to bring an atom up to its nearest default valence.
///
/// Aromatic B, C, N and P get one extra unit for the delocalised bond. Aromatic
/// atoms only ever use their first default valence.
pub fn implied_hydrogens<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    A: HasAtomicNum + HasFormalCharge + HasAromaticity,
    B: HasBondOrder,
{
    let a = mol.atom(atom);
    let Some(element) = Element::from_atomic_num(a.atomic_num()) else {
        return 0;
    };
    let mut used = bond_valence(mol, atom);
    if a.is_aromatic() && matches!(element, Element::B | Element::C | Element::N | Element::P) {
        used += 1;
    }
    let allowed = charged_valences(element, a.formal_charge());
    if a.is_aromatic() {
        return allowed.first().map_or(0, |&v| v.saturating_sub(used));
    }
    allowed
        .iter()
        .find(|&&v| v >= used)
        .map_or(0, |&v| v - used)
}

/// Flag neutral, non-aromatic atoms whose valence is not a default one.
pub fn check_valence<A, B>(mol: &Mol<A, B>) -> Result<(), Vec<ValenceError>>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount + HasAromaticity,
    B: HasBondOrder,
{
    let errors: Vec<ValenceError> = mol
        .atoms()
        .filter_map(|idx| {
            let atom = mol.atom(idx);
            if atom.formal_charge() != 0 || atom.is_aromatic() {
                return None;
            }
            let elem = Element::from_atomic_num(atom.atomic_num())?;
            let allowed = elem.default_valences();
            if allowed.is_empty() {
                return None;
            }
            let v = total_valence(mol, idx);
            if allowed.contains(&v) {
                return None;
            }
            Some(ValenceError {
                atom_idx: idx,
                atomic_num: atom.atomic_num(),
                actual_valence: v,
                allowed_valences: allowed.to_vec(),
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn common_molecules_are_valid() {
        for smi in ["C", "CC", "O", "N", "c1ccccc1", "CS(=O)(=O)N", "c1cc[nH]c1"] {
            let mol = parse_smiles(smi).unwrap();
            assert!(check_valence(&mol).is_ok(), "{smi}");
        }
    }

    #[test]
    fn overbonded_carbon_flagged() {
        let mol = parse_smiles("[CH4]=C").unwrap();
        let errs = check_valence(&mol).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].atom_idx, n(0));
        assert_eq!(errs[0].actual_valence, 6);
    }

    #[test]
    fn hypervalent_sulfur_picks_next_valence() {
        let mol = parse_smiles("CS(=O)C").unwrap();
        assert_eq!(implied_hydrogens(&mol, n(1)), 0);
        let mol = parse_smiles("S(=O)").unwrap();
        // valence 2 already met by the double bond
        assert_eq!(implied_hydrogens(&mol, n(0)), 0);
    }

    #[test]
    fn charged_atoms_shift_valence() {
        let mut mol = parse_smiles("CN").unwrap();
        mol.atom_mut(n(1)).formal_charge = 1;
        assert_eq!(implied_hydrogens(&mol, n(1)), 3);
        mol.atom_mut(n(1)).formal_charge = -1;
        assert_eq!(implied_hydrogens(&mol, n(1)), 1);
    }

    #[test]
    fn aromatic_nitrogen_without_hydrogen() {
        let mol = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(implied_hydrogens(&mol, n(3)), 0);
        assert_eq!(implied_hydrogens(&mol, n(0)), 1);
    }
}
