pub mod aromaticity;
pub mod atom;
pub mod batch;
pub mod bond;
pub mod config;
pub mod descriptors;
pub mod distance;
pub mod element;
pub mod error;
pub mod fragment;
pub mod mol;
pub mod perception;
pub mod properties;
pub mod report;
pub mod rings;
pub mod rotatable;
pub mod sdf;
pub mod smiles;
pub mod span;
pub mod symmetry;
pub mod traits;
pub mod valence;

pub use atom::{Atom, AtomType};
pub use batch::{Batch, BatchContext, FileSummary, InputFormat};
pub use bond::{Bond, BondOrder};
pub use config::Config;
pub use descriptors::{AnalysisOptions, AtomDescriptors, MoleculeAnalysis, PassDescriptors};
pub use distance::DistanceMatrix;
pub use element::Element;
pub use error::{Error, Result};
pub use fragment::{select_best_fragment, Fragment, FragmentExtractor, FragmentScore};
pub use mol::{Mol, Molecule};
pub use perception::{prepare, PerceptionError};
pub use properties::{PropertyCalculator, StandardProperties};
pub use report::{format_number, ReportWriter};
pub use sdf::{parse_sdf, SdfError, SdfRecord};
pub use smiles::{from_smiles, parse_smiles, SmilesError};
pub use span::TerminusKind;
pub use traits::{
    HasAromaticity, HasAtomType, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHeavyDegree,
    HasHydrogenCount, HasRingFlag,
};
