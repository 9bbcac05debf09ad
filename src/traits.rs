use crate::atom::AtomType;
use crate::bond::BondOrder;

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

pub trait HasAromaticity {
    fn is_aromatic(&self) -> bool;
}

pub trait HasAtomType {
    fn atom_type(&self) -> AtomType;
}

/// Heavy-atom neighbour count taken from the parent molecule, not from
/// whatever graph currently holds the atom.
pub trait HasHeavyDegree {
    fn heavy_degree(&self) -> u8;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

pub trait HasRingFlag {
    fn in_ring(&self) -> bool;
}
