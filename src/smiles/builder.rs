use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Molecule;
use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{BondToken, Token};
use crate::valence::implied_hydrogens;

struct OpenRing {
    atom: NodeIndex,
    bond: Option<BondToken>,
}

/// Assemble a molecule graph from a token stream.
///
/// Hydrogens of organic-subset atoms are derived from default valences once
/// every bond is in place; bracket atoms keep their written count.
pub fn build_mol(tokens: &[Token]) -> Result<Molecule, SmilesError> {
    let mut mol = Molecule::new();
    let mut implied: Vec<bool> = Vec::new();

    let mut prev: Option<NodeIndex> = None;
    let mut pending: Option<(BondToken, usize)> = None;
    let mut branches: Vec<(NodeIndex, usize)> = Vec::new();
    let mut rings: BTreeMap<u16, OpenRing> = BTreeMap::new();

    for token in tokens {
        match token {
            Token::Atom(tok) => {
                let idx = mol.add_atom(Atom {
                    atomic_num: tok.element.atomic_num(),
                    formal_charge: tok.charge,
                    hydrogen_count: tok.hcount.unwrap_or(0),
                    is_aromatic: tok.is_aromatic,
                    ..Atom::default()
                });
                implied.push(tok.hcount.is_none());
                match prev {
                    Some(p) => {
                        let bond_tok = pending.take().map(|(b, _)| b);
                        let order = resolve_bond_order(bond_tok, &mol, p, idx);
                        mol.add_bond(p, idx, Bond::new(order));
                    }
                    None => {
                        if let Some((_, pos)) = pending {
                            return Err(SmilesError::DanglingBond { pos });
                        }
                    }
                }
                prev = Some(idx);
            }
            Token::Bond { bond, pos } => {
                if prev.is_none() || pending.is_some() {
                    return Err(SmilesError::DanglingBond { pos: *pos });
                }
                pending = Some((*bond, *pos));
            }
            Token::RingClosure { digit, pos } => {
                let current = prev.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                let written = pending.take().map(|(b, _)| b);
                match rings.remove(digit) {
                    Some(open) => {
                        if open.atom == current || mol.bond_between(open.atom, current).is_some() {
                            return Err(SmilesError::InvalidRingBond {
                                digit: *digit,
                                pos: *pos,
                            });
                        }
                        let bond_tok = match (open.bond, written) {
                            (Some(a), Some(b)) if as_order(a) != as_order(b) => {
                                return Err(SmilesError::RingBondConflict { digit: *digit });
                            }
                            (a, b) => a.or(b),
                        };
                        let order = resolve_bond_order(bond_tok, &mol, open.atom, current);
                        mol.add_bond(open.atom, current, Bond::new(order));
                    }
                    None => {
                        rings.insert(
                            *digit,
                            OpenRing {
                                atom: current,
                                bond: written,
                            },
                        );
                    }
                }
            }
            Token::OpenParen(pos) => {
                let current = prev.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                if let Some((_, bond_pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                branches.push((current, *pos));
            }
            Token::CloseParen(pos) => {
                if let Some((_, bond_pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                let (root, _) = branches
                    .pop()
                    .ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                prev = Some(root);
            }
            Token::Dot(pos) => {
                if pending.is_some() {
                    return Err(SmilesError::DanglingBond { pos: *pos });
                }
                prev = None;
            }
        }
    }

    if let Some((_, pos)) = pending {
        return Err(SmilesError::DanglingBond { pos });
    }
    if let Some(&(_, pos)) = branches.last() {
        return Err(SmilesError::UnmatchedParen { pos });
    }
    if let Some(&digit) = rings.keys().next() {
        return Err(SmilesError::UnclosedRing { digit });
    }

    let nodes: Vec<NodeIndex> = mol.atoms().collect();
    for idx in nodes {
        if implied[idx.index()] {
            let h = implied_hydrogens(&mol, idx);
            mol.atom_mut(idx).hydrogen_count = h;
        }
    }

    Ok(mol)
}

fn as_order(tok: BondToken) -> BondOrder {
    match tok {
        BondToken::Single | BondToken::Directional => BondOrder::Single,
        BondToken::Double => BondOrder::Double,
        BondToken::Triple => BondOrder::Triple,
        BondToken::Aromatic => BondOrder::Aromatic,
    }
}

fn resolve_bond_order(
    tok: Option<BondToken>,
    mol: &Molecule,
    a: NodeIndex,
    b: NodeIndex,
) -> BondOrder {
    match tok {
        Some(t) => as_order(t),
        None => {
            if mol.atom(a).is_aromatic && mol.atom(b).is_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::tokenizer::tokenize;

    fn build(s: &str) -> Result<Molecule, SmilesError> {
        build_mol(&tokenize(s)?)
    }

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn branches_attach_to_root() {
        let mol = build("CC(C)(C)O").unwrap();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.degree(n(1)), 4);
        assert!(mol.bond_between(n(1), n(4)).is_some());
    }

    #[test]
    fn ring_closure_bond() {
        let mol = build("C1CCCCC1").unwrap();
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.bond_between(n(0), n(5)).is_some());
    }

    #[test]
    fn ring_closure_bond_order_from_either_side() {
        let mol = build("C=1CCCCC1").unwrap();
        let e = mol.bond_between(n(0), n(5)).unwrap();
        assert_eq!(mol.bond(e).order, BondOrder::Double);

        let mol = build("C1CCCCC=1").unwrap();
        let e = mol.bond_between(n(0), n(5)).unwrap();
        assert_eq!(mol.bond(e).order, BondOrder::Double);
    }

    #[test]
    fn aromatic_bonds_between_aromatic_atoms() {
        let mol = build("c1ccccc1").unwrap();
        assert!(mol
            .bonds()
            .all(|e| mol.bond(e).order == BondOrder::Aromatic));
        assert!(mol.atoms().all(|a| mol.atom(a).hydrogen_count == 1));
    }

    #[test]
    fn implied_hydrogens() {
        let mol = build("CC(=O)N").unwrap();
        let h: Vec<u8> = mol.atoms().map(|a| mol.atom(a).hydrogen_count).collect();
        assert_eq!(h, vec![3, 0, 0, 2]);
    }

    #[test]
    fn bracket_hydrogens_are_literal() {
        let mol = build("[CH2]C").unwrap();
        assert_eq!(mol.atom(n(0)).hydrogen_count, 2);
        assert_eq!(mol.atom(n(1)).hydrogen_count, 3);
    }

    #[test]
    fn disconnected_components() {
        let mol = build("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
    }

    #[test]
    fn structural_errors() {
        assert!(matches!(build("C1CC"), Err(SmilesError::UnclosedRing { digit: 1 })));
        assert!(matches!(build("CC(C"), Err(SmilesError::UnmatchedParen { pos: 2 })));
        assert!(matches!(build("CC)C"), Err(SmilesError::UnmatchedParen { pos: 2 })));
        assert!(matches!(build("CC="), Err(SmilesError::DanglingBond { pos: 2 })));
        assert!(matches!(build("C11"), Err(SmilesError::InvalidRingBond { .. })));
        assert!(matches!(
            build("C=1CCCC#1"),
            Err(SmilesError::RingBondConflict { digit: 1 })
        ));
    }
}
