mod builder;
pub mod error;
mod tokenizer;

use crate::mol::Molecule;
use crate::perception;
pub use error::SmilesError;

/// Read a SMILES string into a raw molecule graph.
///
/// Hydrogen counts are set; nothing else is perceived. Use [`from_smiles`]
/// for a molecule ready for analysis.
pub fn parse_smiles(s: &str) -> Result<Molecule, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    builder::build_mol(&tokens)
}

/// Read and prepare a SMILES string: hydrogens folded, rings and aromaticity
/// perceived, atoms typed and numbered.
pub fn from_smiles(s: &str) -> crate::Result<Molecule> {
    let mol = parse_smiles(s)?;
    Ok(perception::prepare(mol)?)
}
