use std::fmt;

use crate::element::symbol_of;

/// Perceived atom type, named after the CDK atom-type labels.
///
/// The rotatable-bond predicate and the H-bond counters key off these
/// labels, so they are assigned once during
/// [`prepare`](crate::perception::prepare) and copied into every fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AtomType {
    /// Not yet perceived.
    #[default]
    Unknown,
    CSp3,
    CSp2,
    CSp,
    NSp3,
    NSp2,
    NSp1,
    /// Nitrogen single-bonded to a carbonyl carbon.
    NAmide,
    /// Nitrogen single-bonded to a thiocarbonyl carbon.
    NThioamide,
    /// Trigonal nitrogen with its lone pair in a pi system (aniline, pyrrole).
    NPlanar3,
    NPlus,
    OSp3,
    OSp2,
    OMinus,
    /// Aromatic oxygen donating a lone pair (furan).
    OPlanar3,
    S3,
    S2,
    /// Sulfonyl sulfur: two terminal oxygens double-bonded.
    SOnyl,
    /// Sulfinyl sulfur: one terminal oxygen double-bonded.
    SInyl,
    PAte,
    PIne,
    Halogen,
    Hydrogen,
    /// Any other element; no further classification.
    Other,
}

impl AtomType {
    pub fn name(self) -> &'static str {
        match self {
            AtomType::Unknown => "X",
            AtomType::CSp3 => "C.sp3",
            AtomType::CSp2 => "C.sp2",
            AtomType::CSp => "C.sp",
            AtomType::NSp3 => "N.sp3",
            AtomType::NSp2 => "N.sp2",
            AtomType::NSp1 => "N.sp1",
            AtomType::NAmide => "N.amide",
            AtomType::NThioamide => "N.thioamide",
            AtomType::NPlanar3 => "N.planar3",
            AtomType::NPlus => "N.plus",
            AtomType::OSp3 => "O.sp3",
            AtomType::OSp2 => "O.sp2",
            AtomType::OMinus => "O.minus",
            AtomType::OPlanar3 => "O.planar3",
            AtomType::S3 => "S.3",
            AtomType::S2 => "S.2",
            AtomType::SOnyl => "S.onyl",
            AtomType::SInyl => "S.inyl",
            AtomType::PAte => "P.ate",
            AtomType::PIne => "P.ine",
            AtomType::Halogen => "Hal",
            AtomType::Hydrogen => "H",
            AtomType::Other => "Other",
        }
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Atom payload for a prepared molecule graph.
///
/// Everything here is fixed once [`prepare`](crate::perception::prepare)
/// returns; fragments carry copies, so values describing the parent
/// molecule (`heavy_degree`, `id`) survive extraction unchanged.
///
/// # Examples
///
/// ```
/// use atomspan::{Atom, AtomType};
///
/// let carbon = Atom {
///     atomic_num: 6,
///     hydrogen_count: 3,
///     id: 1,
///     atom_type: AtomType::CSp3,
///     ..Atom::default()
/// };
/// assert_eq!(carbon.label(), "C.1");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …).
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Number of implicit (suppressed) hydrogens.
    pub hydrogen_count: u8,
    /// Whether this atom belongs to an aromatic ring.
    pub is_aromatic: bool,
    /// 1-based display identifier, stable for the atom's lifetime.
    pub id: u32,
    pub atom_type: AtomType,
    /// Non-hydrogen neighbours in the parent molecule.
    pub heavy_degree: u8,
}

impl Atom {
    pub fn new(atomic_num: u8) -> Self {
        Self {
            atomic_num,
            ..Self::default()
        }
    }

    pub fn symbol(&self) -> &'static str {
        symbol_of(self.atomic_num)
    }

    /// Report label: element symbol and display id, e.g. `N.4`.
    pub fn label(&self) -> String {
        format!("{}.{}", self.symbol(), self.id)
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasAromaticity for Atom {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}

impl crate::traits::HasAtomType for Atom {
    fn atom_type(&self) -> AtomType {
        self.atom_type
    }
}

impl crate::traits::HasHeavyDegree for Atom {
    fn heavy_degree(&self) -> u8 {
        self.heavy_degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_symbol_and_id() {
        let atom = Atom {
            atomic_num: 17,
            id: 12,
            ..Atom::default()
        };
        assert_eq!(atom.label(), "Cl.12");
    }

    #[test]
    fn type_names_follow_cdk() {
        assert_eq!(AtomType::NAmide.to_string(), "N.amide");
        assert_eq!(AtomType::SOnyl.to_string(), "S.onyl");
        assert_eq!(AtomType::CSp2.to_string(), "C.sp2");
    }
}
