//! Batch driver: reads structure files, analyses every molecule and writes
//! one CSV report per input.
//!
//! The running molecule index lives in [`BatchContext`] and continues across
//! the files of one run.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::Config;
use crate::descriptors::MoleculeAnalysis;
use crate::error::{Error, Result};
use crate::mol::Molecule;
use crate::perception;
use crate::report::ReportWriter;
use crate::sdf::parse_sdf;
use crate::smiles::parse_smiles;

/// Structure file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Sdf,
    Smiles,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("sdf" | "sd" | "mol") => Ok(InputFormat::Sdf),
            Some("smi" | "smiles") => Ok(InputFormat::Smiles),
            _ => Err(Error::UnsupportedInputFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// One line of a `.smi` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmilesLine<'a> {
    /// 1-based line number.
    pub line: usize,
    pub smiles: &'a str,
    pub name: Option<&'a str>,
}

/// Split a `.smi` file into SMILES and optional names; blank lines and
/// `#` comments are skipped.
pub fn smiles_lines(content: &str) -> Vec<SmilesLine<'_>> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                return None;
            }
            let (smiles, rest) = match text.split_once(char::is_whitespace) {
                Some((s, r)) => (s, r.trim()),
                None => (text, ""),
            };
            Some(SmilesLine {
                line: i + 1,
                smiles,
                name: (!rest.is_empty()).then_some(rest),
            })
        })
        .collect()
}

/// Read every molecule in `content`. Reader and perception failures are
/// returned in place as a message, so the caller decides whether they are
/// fatal.
pub fn read_molecules(
    format: InputFormat,
    content: &str,
) -> Vec<std::result::Result<Molecule, String>> {
    match format {
        InputFormat::Smiles => smiles_lines(content)
            .into_iter()
            .map(|l| {
                let mol = parse_smiles(l.smiles)
                    .map_err(|e| format!("line {}: {e}", l.line))?;
                perception::prepare(mol).map_err(|e| format!("line {}: {e}", l.line))
            })
            .collect(),
        InputFormat::Sdf => parse_sdf(content)
            .into_iter()
            .map(|record| {
                let record = record.map_err(|e| e.to_string())?;
                perception::prepare(record.mol)
                    .map_err(|e| format!("SD record {:?}: {e}", record.name))
            })
            .collect(),
    }
}

/// Counters threaded through one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchContext {
    /// Molecules seen so far, the failed ones included.
    pub molecules: usize,
    pub rows: usize,
    pub skipped: usize,
}

/// What one input produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub molecules: usize,
    pub rows: usize,
    pub skipped: usize,
}

pub struct Batch {
    config: Config,
    context: BatchContext,
}

impl Batch {
    pub fn new(config: Config) -> Self {
        Batch {
            config,
            context: BatchContext::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> &BatchContext {
        &self.context
    }

    /// Analyse every molecule of `content` and write its rows to `out`,
    /// header first.
    pub fn process_source<W: io::Write>(
        &mut self,
        format: InputFormat,
        content: &str,
        out: W,
    ) -> Result<(usize, usize, usize)> {
        let options = self.config.analysis_options();
        let mut report = ReportWriter::new(out, self.config.suppress_symmetric)?;
        let (mut molecules, mut rows, mut skipped) = (0, 0, 0);

        for result in read_molecules(format, content) {
            self.context.molecules += 1;
            molecules += 1;
            let index = self.context.molecules;
            info!("molecule {index}");

            let mol = match result {
                Ok(mol) => mol,
                Err(reason) if self.config.continue_on_error => {
                    warn!("skipping molecule {index}: {reason}");
                    self.context.skipped += 1;
                    skipped += 1;
                    continue;
                }
                Err(reason) => return Err(Error::MalformedMolecule { index, reason }),
            };

            let analysis = MoleculeAnalysis::run(&mol, &options);
            let written = report.write_molecule(index, &analysis)?;
            self.context.rows += written;
            rows += written;
        }
        report.flush()?;
        Ok((molecules, rows, skipped))
    }

    /// Process one input file into `<input><output_suffix>`.
    pub fn process_file(&mut self, input: &Path) -> Result<FileSummary> {
        if !input.is_file() {
            return Err(Error::InputFileNotFound {
                path: input.to_path_buf(),
            });
        }
        let format = InputFormat::from_path(input)?;
        let content = std::fs::read_to_string(input)?;

        let output = self.config.output_path(input);
        let writer = BufWriter::new(File::create(&output)?);
        let (molecules, rows, skipped) = self.process_source(format, &content, writer)?;
        info!(
            "{}: {molecules} molecules, {rows} rows, {skipped} skipped -> {}",
            input.display(),
            output.display()
        );
        Ok(FileSummary {
            input: input.to_path_buf(),
            output,
            molecules,
            rows,
            skipped,
        })
    }

    /// Process every input in order; the first fatal error stops the run.
    pub fn run<P: AsRef<Path>>(&mut self, inputs: &[P]) -> Result<Vec<FileSummary>> {
        inputs
            .iter()
            .map(|p| self.process_file(p.as_ref()))
            .collect()
    }
}
