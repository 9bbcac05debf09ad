use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::bond::Bond;

/// Molecule graph with generic atom and bond payloads.
///
/// Atom indices are dense (`0..atom_count()`) and keep insertion order.
/// Once a molecule has been prepared nothing removes atoms from it; derived
/// graphs such as fragments are fresh copies built by
/// [`induced_subgraph`](Mol::induced_subgraph).
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
}

/// A molecule with the crate's own atom and bond payloads.
pub type Molecule = Mol<Atom, Bond>;

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// The atom at the far end of `edge` as seen from `from`.
    pub fn other_end(&self, edge: EdgeIndex, from: NodeIndex) -> Option<NodeIndex> {
        let (a, b) = self.bond_endpoints(edge)?;
        if a == from {
            Some(b)
        } else if b == from {
            Some(a)
        } else {
            None
        }
    }

    /// Neighbours of `idx` paired with the connecting bond.
    pub fn neighbor_bonds(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &B)> + '_ {
        self.graph.edges(idx).map(move |e| {
            let other = if e.source() == idx { e.target() } else { e.source() };
            (other, e.weight())
        })
    }
}

impl<A: Clone, B: Clone> Mol<A, B> {
    /// Copy of the subgraph induced by the atoms with `keep[i] == true`.
    ///
    /// Kept atoms retain their relative order; every bond whose endpoints are
    /// both kept is copied. The source molecule is untouched.
    pub fn induced_subgraph(&self, keep: &[bool]) -> Mol<A, B> {
        let mut sub = Mol::new();
        let mut index_map: Vec<Option<NodeIndex>> = vec![None; self.atom_count()];
        for idx in self.atoms() {
            if keep.get(idx.index()).copied().unwrap_or(false) {
                index_map[idx.index()] = Some(sub.add_atom(self.atom(idx).clone()));
            }
        }
        for edge in self.bonds() {
            if let Some((a, b)) = self.bond_endpoints(edge) {
                if let (Some(na), Some(nb)) = (index_map[a.index()], index_map[b.index()]) {
                    sub.add_bond(na, nb, self.bond(edge).clone());
                }
            }
        }
        sub
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        let atoms_match = self.atoms().all(|idx| self.atom(idx) == other.atom(idx));
        let bonds_match = self.bonds().all(|idx| {
            self.bond(idx) == other.bond(idx)
                && self.bond_endpoints(idx) == other.bond_endpoints(idx)
        });
        atoms_match && bonds_match
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .finish()
    }
}
