#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Aromatic,
    Double,
    Triple,
}

impl BondOrder {
    /// Bond order contributed to an atom's valence; aromatic bonds count as one
    /// here and the extra pi electron is accounted for per atom.
    pub fn valence_contribution(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    pub fn is_multiple(self) -> bool {
        !matches!(self, BondOrder::Single)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bond {
    pub order: BondOrder,
    /// Set during perception; fragments keep the parent molecule's flag.
    pub in_ring: bool,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order,
            in_ring: false,
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

impl crate::traits::HasRingFlag for Bond {
    fn in_ring(&self) -> bool {
        self.in_ring
    }
}
