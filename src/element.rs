//! Periodic data for the elements the toolkit understands.
//!
//! Only the elements that show up in drug-like structure files are listed.
//! Anything else is rejected at read time.

/// Elements known to the reader and the property calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    Li = 3,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Mg = 12,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Ca = 20,
    Fe = 26,
    Zn = 30,
    As = 33,
    Se = 34,
    Br = 35,
    Te = 52,
    I = 53,
}

struct ElementData {
    element: Element,
    symbol: &'static str,
    atomic_weight: f64,
    /// VABC atomic volume in cubic angstroms (Zhao, Abraham & Zissimos 2003).
    vabc_volume: Option<f64>,
    default_valences: &'static [u8],
}

const TABLE: [ElementData; 22] = [
    ElementData { element: Element::H, symbol: "H", atomic_weight: 1.008, vabc_volume: Some(7.24), default_valences: &[1] },
    ElementData { element: Element::Li, symbol: "Li", atomic_weight: 6.94, vabc_volume: None, default_valences: &[1] },
    ElementData { element: Element::B, symbol: "B", atomic_weight: 10.81, vabc_volume: Some(40.48), default_valences: &[3] },
    ElementData { element: Element::C, symbol: "C", atomic_weight: 12.011, vabc_volume: Some(20.58), default_valences: &[4] },
    ElementData { element: Element::N, symbol: "N", atomic_weight: 14.007, vabc_volume: Some(15.60), default_valences: &[3, 5] },
    ElementData { element: Element::O, symbol: "O", atomic_weight: 15.999, vabc_volume: Some(14.71), default_valences: &[2] },
    ElementData { element: Element::F, symbol: "F", atomic_weight: 18.998, vabc_volume: Some(13.31), default_valences: &[1] },
    ElementData { element: Element::Na, symbol: "Na", atomic_weight: 22.990, vabc_volume: None, default_valences: &[1] },
    ElementData { element: Element::Mg, symbol: "Mg", atomic_weight: 24.305, vabc_volume: None, default_valences: &[2] },
    ElementData { element: Element::Si, symbol: "Si", atomic_weight: 28.085, vabc_volume: Some(38.79), default_valences: &[4] },
    ElementData { element: Element::P, symbol: "P", atomic_weight: 30.974, vabc_volume: Some(24.43), default_valences: &[3, 5] },
    ElementData { element: Element::S, symbol: "S", atomic_weight: 32.06, vabc_volume: Some(24.43), default_valences: &[2, 4, 6] },
    ElementData { element: Element::Cl, symbol: "Cl", atomic_weight: 35.45, vabc_volume: Some(22.45), default_valences: &[1] },
    ElementData { element: Element::K, symbol: "K", atomic_weight: 39.098, vabc_volume: None, default_valences: &[1] },
    ElementData { element: Element::Ca, symbol: "Ca", atomic_weight: 40.078, vabc_volume: None, default_valences: &[2] },
    ElementData { element: Element::Fe, symbol: "Fe", atomic_weight: 55.845, vabc_volume: None, default_valences: &[] },
    ElementData { element: Element::Zn, symbol: "Zn", atomic_weight: 65.38, vabc_volume: None, default_valences: &[] },
    ElementData { element: Element::As, symbol: "As", atomic_weight: 74.922, vabc_volume: Some(26.52), default_valences: &[3, 5] },
    ElementData { element: Element::Se, symbol: "Se", atomic_weight: 78.971, vabc_volume: Some(28.73), default_valences: &[2, 4, 6] },
    ElementData { element: Element::Br, symbol: "Br", atomic_weight: 79.904, vabc_volume: Some(26.52), default_valences: &[1] },
    ElementData { element: Element::Te, symbol: "Te", atomic_weight: 127.60, vabc_volume: Some(36.62), default_valences: &[2, 4, 6] },
    ElementData { element: Element::I, symbol: "I", atomic_weight: 126.904, vabc_volume: Some(32.52), default_valences: &[1, 3, 5, 7] },
];

impl Element {
    fn data(self) -> &'static ElementData {
        // every variant has exactly one row
        TABLE
            .iter()
            .find(|d| d.element == self)
            .unwrap_or(&TABLE[0])
    }

    pub fn from_atomic_num(n: u8) -> Option<Element> {
        TABLE.iter().find(|d| d.element as u8 == n).map(|d| d.element)
    }

    pub fn from_symbol(s: &str) -> Option<Element> {
        TABLE.iter().find(|d| d.symbol == s).map(|d| d.element)
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        self.data().symbol
    }

    /// Standard atomic weight in daltons.
    pub fn atomic_weight(self) -> f64 {
        self.data().atomic_weight
    }

    pub fn vabc_volume(self) -> Option<f64> {
        self.data().vabc_volume
    }

    pub fn default_valences(self) -> &'static [u8] {
        self.data().default_valences
    }

    /// Elements that may be written without brackets in SMILES.
    pub fn is_organic_subset(self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }

    pub fn is_halogen(self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }
}

/// Symbol for an atomic number, `"*"` when unknown.
pub fn symbol_of(atomic_num: u8) -> &'static str {
    Element::from_atomic_num(atomic_num).map_or("*", |e| e.symbol())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trip() {
        for row in &TABLE {
            assert_eq!(Element::from_symbol(row.symbol), Some(row.element));
            assert_eq!(Element::from_atomic_num(row.element as u8), Some(row.element));
        }
    }

    #[test]
    fn unknown_lookups() {
        assert_eq!(Element::from_symbol("Xx"), None);
        assert_eq!(Element::from_atomic_num(0), None);
        assert_eq!(Element::from_atomic_num(2), None);
        assert_eq!(symbol_of(0), "*");
    }

    #[test]
    fn carbon_data() {
        let c = Element::C;
        assert_eq!(c.atomic_num(), 6);
        assert_eq!(c.symbol(), "C");
        assert!((c.atomic_weight() - 12.011).abs() < 1e-9);
        assert_eq!(c.default_valences(), &[4]);
        assert!(c.is_organic_subset());
        assert!(!c.is_halogen());
    }

    #[test]
    fn metals_have_no_volume() {
        assert_eq!(Element::Na.vabc_volume(), None);
        assert!(Element::Cl.vabc_volume().is_some());
    }
}
