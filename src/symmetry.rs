//! Topological equivalence classes.
//!
//! Atoms are seeded with a local invariant and refined Morgan-style by their
//! neighbours' classes until the partition stops splitting. Class ids are
//! numbered from 1 in order of first appearance, so the atom with the lowest
//! index in each class is its representative.

use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::mol::Mol;
use crate::traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount,
};

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
struct AtomInvariant {
    atomic_num: u8,
    degree: usize,
    hydrogen_count: u8,
    formal_charge: i8,
    is_aromatic: bool,
    singles: u8,
    doubles: u8,
    triples: u8,
    aromatic_bonds: u8,
}

fn atom_invariant<A, B>(mol: &Mol<A, B>, idx: NodeIndex) -> AtomInvariant
where
    A: HasAtomicNum + HasHydrogenCount + HasFormalCharge + HasAromaticity,
    B: HasBondOrder,
{
    let atom = mol.atom(idx);
    let mut inv = AtomInvariant {
        atomic_num: atom.atomic_num(),
        degree: mol.degree(idx),
        hydrogen_count: atom.hydrogen_count(),
        formal_charge: atom.formal_charge(),
        is_aromatic: atom.is_aromatic(),
        singles: 0,
        doubles: 0,
        triples: 0,
        aromatic_bonds: 0,
    };
    for edge in mol.bonds_of(idx) {
        match mol.bond(edge).bond_order() {
            BondOrder::Single => inv.singles += 1,
            BondOrder::Double => inv.doubles += 1,
            BondOrder::Triple => inv.triples += 1,
            BondOrder::Aromatic => inv.aromatic_bonds += 1,
        }
    }
    inv
}

/// Dense ranks: equal keys share a rank, ranks count distinct keys below.
fn ranks_from_keys<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut ranks = vec![0usize; keys.len()];
    let mut rank = 0;
    for w in 0..order.len() {
        if w > 0 && keys[order[w]] != keys[order[w - 1]] {
            rank += 1;
        }
        ranks[order[w]] = rank;
    }
    ranks
}

fn count_distinct(ranks: &[usize]) -> usize {
    ranks.iter().copied().max().map_or(0, |m| m + 1)
}

fn morgan_refine<A, B>(mol: &Mol<A, B>, ranks: &mut Vec<usize>)
where
    B: HasBondOrder,
{
    let mut prev_distinct = count_distinct(ranks);
    loop {
        let keys: Vec<(usize, Vec<(usize, BondOrder)>)> = mol
            .atoms()
            .map(|node| {
                let mut neighborhood: Vec<(usize, BondOrder)> = mol
                    .neighbor_bonds(node)
                    .map(|(nb, b)| (ranks[nb.index()], b.bond_order()))
                    .collect();
                neighborhood.sort_unstable();
                (ranks[node.index()], neighborhood)
            })
            .collect();
        let new_ranks = ranks_from_keys(&keys);
        let distinct = count_distinct(&new_ranks);
        if distinct <= prev_distinct {
            return;
        }
        *ranks = new_ranks;
        prev_distinct = distinct;
    }
}

/// Per-atom class id, starting at 1.
pub fn equivalence_classes<A, B>(mol: &Mol<A, B>) -> Vec<usize>
where
    A: HasAtomicNum + HasHydrogenCount + HasFormalCharge + HasAromaticity,
    B: HasBondOrder,
{
    let invariants: Vec<AtomInvariant> = mol.atoms().map(|a| atom_invariant(mol, a)).collect();
    let mut ranks = ranks_from_keys(&invariants);
    morgan_refine(mol, &mut ranks);

    let mut ids = vec![0usize; ranks.len()];
    let mut next = 1;
    let mut assigned: Vec<Option<usize>> = vec![None; ranks.len()];
    for (i, &rank) in ranks.iter().enumerate() {
        let id = *assigned[rank].get_or_insert_with(|| {
            let id = next;
            next += 1;
            id
        });
        ids[i] = id;
    }
    ids
}

/// Number of atoms sharing each atom's class, the atom included.
pub fn symmetric_site_counts(classes: &[usize]) -> Vec<usize> {
    let max = classes.iter().copied().max().unwrap_or(0);
    let mut sizes = vec![0usize; max + 1];
    for &c in classes {
        sizes[c] += 1;
    }
    classes.iter().map(|&c| sizes[c]).collect()
}

/// `true` for the first atom of every class; the rest are redundant copies.
pub fn representatives(classes: &[usize]) -> Vec<bool> {
    let mut seen = std::collections::HashSet::new();
    classes.iter().map(|&c| seen.insert(c)).collect()
}
