use petgraph::graph::NodeIndex;

use crate::mol::Mol;

/// Marker stored for atom pairs in different connected components.
pub const UNREACHABLE: u32 = u32::MAX;

pub fn adjacency_matrix<A, B>(mol: &Mol<A, B>) -> Vec<Vec<bool>> {
    let n = mol.atom_count();
    let mut matrix = vec![vec![false; n]; n];
    for edge in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            matrix[a.index()][b.index()] = true;
            matrix[b.index()][a.index()] = true;
        }
    }
    matrix
}

/// All-pairs topological distances in bonds.
///
/// Built once per molecule and shared read-only by span, terminus and
/// fragment code. Pairs in different components hold [`UNREACHABLE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<u32>,
}

impl DistanceMatrix {
    /// Floyd–Warshall over the adjacency matrix.
    pub fn build<A, B>(mol: &Mol<A, B>) -> Self {
        let n = mol.atom_count();
        let adjacency = adjacency_matrix(mol);
        let mut data = vec![UNREACHABLE; n * n];
        for (i, row) in adjacency.iter().enumerate() {
            for (j, &bonded) in row.iter().enumerate() {
                if i == j {
                    data[i * n + j] = 0;
                } else if bonded {
                    data[i * n + j] = 1;
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                let ik = data[i * n + k];
                if ik == UNREACHABLE {
                    continue;
                }
                for j in 0..n {
                    let kj = data[k * n + j];
                    if kj == UNREACHABLE {
                        continue;
                    }
                    let via = ik + kj;
                    if via < data[i * n + j] {
                        data[i * n + j] = via;
                    }
                }
            }
        }

        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Raw entry; [`UNREACHABLE`] across components.
    pub fn raw(&self, i: usize, j: usize) -> u32 {
        self.data[i * self.n + j]
    }

    pub fn get(&self, i: usize, j: usize) -> Option<u32> {
        match self.raw(i, j) {
            UNREACHABLE => None,
            d => Some(d),
        }
    }

    pub fn distance(&self, a: NodeIndex, b: NodeIndex) -> Option<u32> {
        self.get(a.index(), b.index())
    }

    pub fn row(&self, i: usize) -> &[u32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Largest reachable distance from `i`.
    pub fn eccentricity(&self, i: usize) -> u32 {
        self.row(i)
            .iter()
            .copied()
            .filter(|&d| d != UNREACHABLE)
            .max()
            .unwrap_or(0)
    }

    /// Largest reachable distance over all pairs.
    pub fn diameter(&self) -> u32 {
        (0..self.n).map(|i| self.eccentricity(i)).max().unwrap_or(0)
    }

    pub fn is_connected(&self) -> bool {
        self.data.iter().all(|&d| d != UNREACHABLE)
    }
}
