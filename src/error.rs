use std::path::PathBuf;

use thiserror::Error;

use crate::perception::PerceptionError;
use crate::sdf::SdfError;
use crate::smiles::SmilesError;

/// Errors surfaced by the batch driver and the readers.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file extension is neither `.sdf` nor `.smi`.
    #[error("unsupported file type (only .sdf and .smi are supported): {}", path.display())]
    UnsupportedInputFormat { path: PathBuf },

    #[error("file not found: {}", path.display())]
    InputFileNotFound { path: PathBuf },

    /// A structure that could not be read or typed. `index` is the 1-based
    /// molecule index of the run.
    #[error("molecule {index}: {reason}")]
    MalformedMolecule { index: usize, reason: String },

    #[error(transparent)]
    Smiles(#[from] SmilesError),

    #[error(transparent)]
    Sdf(#[from] SdfError),

    #[error(transparent)]
    Perception(#[from] PerceptionError),

    #[error("CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
