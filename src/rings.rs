use std::collections::{BTreeMap, VecDeque};

use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

/// Smallest set of smallest rings, computed from Horton candidate cycles.
#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingInfo {
    pub fn sssr<A, B>(mol: &Mol<A, B>) -> Self {
        let num_expected = Self::expected_ring_count(mol);
        if num_expected == 0 {
            return Self { rings: vec![] };
        }

        let num_edges = mol.bond_count();
        let candidates = horton_candidates(mol);
        let mut basis = CycleBasis::default();
        let mut rings = Vec::with_capacity(num_expected);

        for ring in &candidates {
            if rings.len() >= num_expected {
                break;
            }
            let bv = ring_to_edge_bitvector(ring, num_edges, mol);
            if bv.iter().all(|&w| w == 0) {
                continue;
            }
            if basis.insert(bv) {
                rings.push(normalize_ring(ring));
            }
        }

        rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        Self { rings }
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains(&atom))
    }

    pub fn is_ring_bond(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring_contains_bond(ring, a, b))
    }

    /// Per-bond ring membership, indexed by `EdgeIndex::index()`.
    pub fn ring_bond_flags<A, B>(&self, mol: &Mol<A, B>) -> Vec<bool> {
        let mut flags = vec![false; mol.bond_count()];
        for ring in &self.rings {
            for (a, b) in ring_bonds(ring) {
                if let Some(edge) = mol.bond_between(a, b) {
                    flags[edge.index()] = true;
                }
            }
        }
        flags
    }

    /// Bonds of each ring as edge indices, in ring order.
    pub fn ring_edges<A, B>(&self, mol: &Mol<A, B>) -> Vec<Vec<EdgeIndex>> {
        self.rings
            .iter()
            .map(|ring| {
                ring_bonds(ring)
                    .filter_map(|(a, b)| mol.bond_between(a, b))
                    .collect()
            })
            .collect()
    }

    /// Cyclomatic number `E - V + C`.
    pub fn expected_ring_count<A, B>(mol: &Mol<A, B>) -> usize {
        let v = mol.atom_count();
        let e = mol.bond_count();
        let c = connected_components(mol.graph());
        (e + c).saturating_sub(v)
    }
}

fn ring_bonds(ring: &[NodeIndex]) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
    let len = ring.len();
    (0..len).map(move |i| (ring[i], ring[(i + 1) % len]))
}

fn ring_contains_bond(ring: &[NodeIndex], a: NodeIndex, b: NodeIndex) -> bool {
    ring_bonds(ring).any(|(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// GF(2) row-echelon basis keyed by each row's lowest set bit.
#[derive(Default)]
struct CycleBasis {
    rows: BTreeMap<usize, Vec<u64>>,
}

impl CycleBasis {
    /// Adds `bv` if it is independent of the current rows.
    fn insert(&mut self, mut bv: Vec<u64>) -> bool {
        while let Some(pivot) = lowest_bit(&bv) {
            match self.rows.get(&pivot) {
                Some(row) => xor_into(&mut bv, row),
                None => {
                    self.rows.insert(pivot, bv);
                    return true;
                }
            }
        }
        false
    }
}

fn lowest_bit(bv: &[u64]) -> Option<usize> {
    bv.iter()
        .enumerate()
        .find(|&(_, &w)| w != 0)
        .map(|(i, &w)| i * 64 + w.trailing_zeros() as usize)
}

fn xor_into(a: &mut [u64], b: &[u64]) {
    for (aw, bw) in a.iter_mut().zip(b.iter()) {
        *aw ^= *bw;
    }
}

fn horton_candidates<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let (dist, pred) = bfs_trees(mol, n);

    let mut candidates: Vec<Vec<NodeIndex>> = Vec::new();
    for edge in mol.bonds() {
        let Some((u, v)) = mol.bond_endpoints(edge) else {
            continue;
        };
        for w in 0..n {
            let (du, dv) = (dist[w][u.index()], dist[w][v.index()]);
            if du == u32::MAX || dv == u32::MAX {
                continue;
            }
            if du as usize + dv as usize + 1 < 3 {
                continue;
            }
            let path_u = reconstruct_path(&pred[w], NodeIndex::new(w), u);
            let path_v = reconstruct_path(&pred[w], NodeIndex::new(w), v);
            if path_u.is_empty() || path_v.is_empty() {
                continue;
            }
            if path_u[1..].iter().any(|x| path_v[1..].contains(x)) {
                continue;
            }
            let mut ring = path_u;
            ring.extend(path_v[1..].iter().rev());
            candidates.push(ring);
        }
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    candidates
}

type Tree = Vec<Option<NodeIndex>>;

fn bfs_trees<A, B>(mol: &Mol<A, B>, n: usize) -> (Vec<Vec<u32>>, Vec<Tree>) {
    let mut dist = vec![vec![u32::MAX; n]; n];
    let mut pred = vec![vec![None; n]; n];
    for src in 0..n {
        dist[src][src] = 0;
        let mut queue = VecDeque::from([NodeIndex::new(src)]);
        while let Some(cur) = queue.pop_front() {
            let d = dist[src][cur.index()];
            for nb in mol.neighbors(cur) {
                if dist[src][nb.index()] == u32::MAX {
                    dist[src][nb.index()] = d + 1;
                    pred[src][nb.index()] = Some(cur);
                    queue.push_back(nb);
                }
            }
        }
    }
    (dist, pred)
}

fn reconstruct_path(pred: &[Option<NodeIndex>], src: NodeIndex, dst: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![dst];
    let mut cur = dst;
    while cur != src {
        match pred[cur.index()] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => return vec![],
        }
    }
    path.reverse();
    path
}

fn ring_to_edge_bitvector<A, B>(ring: &[NodeIndex], num_edges: usize, mol: &Mol<A, B>) -> Vec<u64> {
    let mut bv = vec![0u64; num_edges.div_ceil(64)];
    for (a, b) in ring_bonds(ring) {
        if let Some(edge) = mol.bond_between(a, b) {
            let idx = edge.index();
            bv[idx / 64] |= 1u64 << (idx % 64);
        }
    }
    bv
}

/// Rotate so the lowest index comes first, then pick the direction whose
/// second atom is lower.
fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(min_pos) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
    else {
        return vec![];
    };

    let len = ring.len();
    let mut normalized: Vec<NodeIndex> = (0..len).map(|i| ring[(min_pos + i) % len]).collect();
    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn sizes(smi: &str) -> Vec<usize> {
        let mol = parse_smiles(smi).unwrap();
        RingInfo::sssr(&mol).rings().iter().map(|r| r.len()).collect()
    }

    #[test]
    fn simple_rings() {
        assert_eq!(sizes("C1CC1"), vec![3]);
        assert_eq!(sizes("C1CCCCC1"), vec![6]);
        assert_eq!(sizes("c1ccccc1"), vec![6]);
        assert!(sizes("CCCC").is_empty());
    }

    #[test]
    fn fused_and_bridged() {
        assert_eq!(sizes("c1ccc2ccccc2c1"), vec![6, 6]);
        assert_eq!(sizes("C1CCC2CCCCC2C1"), vec![6, 6]);
        assert_eq!(sizes("c1ccc2cc3ccccc3cc2c1"), vec![6, 6, 6]);
        assert_eq!(sizes("C1CC2CC1CC2"), vec![5, 5]);
        assert_eq!(sizes("C1CCC2(CC1)CCC2"), vec![4, 6]);
    }

    #[test]
    fn cubane() {
        let mol = parse_smiles("C12C3C4C1C5C3C4C25").unwrap();
        assert_eq!(RingInfo::expected_ring_count(&mol), 5);
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.num_rings(), 5);
        assert!(ri.rings().iter().all(|r| r.len() == 4));
    }

    #[test]
    fn ring_membership() {
        let mol = parse_smiles("Oc1ccccc1").unwrap();
        let ri = RingInfo::sssr(&mol);
        assert!(!ri.is_ring_atom(n(0)));
        for i in 1..7 {
            assert!(ri.is_ring_atom(n(i)), "atom {i} should be in ring");
        }
        assert!(ri.is_ring_bond(n(1), n(6)));
        assert!(!ri.is_ring_bond(n(0), n(1)));

        let flags = ri.ring_bond_flags(&mol);
        assert_eq!(flags.iter().filter(|&&f| f).count(), 6);
        let exo = mol.bond_between(n(0), n(1)).unwrap();
        assert!(!flags[exo.index()]);
    }

    #[test]
    fn ring_edges_follow_rings() {
        let mol = parse_smiles("C1CCC2CCCCC2C1").unwrap();
        let ri = RingInfo::sssr(&mol);
        let edges = ri.ring_edges(&mol);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.len() == 6));
    }

    #[test]
    fn normalized_ring_starts_at_lowest_index() {
        let ring = vec![n(4), n(2), n(7), n(1)];
        assert_eq!(normalize_ring(&ring), vec![n(1), n(4), n(2), n(7)]);
    }
}
