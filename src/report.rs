//! CSV report: one row per retained atom.

use std::io;

use csv::WriterBuilder;

use crate::descriptors::{MoleculeAnalysis, PassDescriptors};
use crate::error::Result;
use crate::span::TerminusKind;

const PASS_COLUMNS: [&str; 9] = [
    "BondsToEnd",
    "RotatableBondCount",
    "AtomCount",
    "TPSA",
    "TPSAperAtom",
    "Volume",
    "HAcount",
    "HDcount",
    "PIsystemSize",
];

/// Column names in output order.
pub fn header() -> Vec<String> {
    let mut cols = vec!["Molecule".to_string(), "Atom".to_string()];
    for kind in [TerminusKind::Molecule, TerminusKind::Branch] {
        cols.extend(
            PASS_COLUMNS
                .iter()
                .map(|c| format!("{}_{}", kind.prefix(), c)),
        );
    }
    cols
}

/// At most two fractional digits, trailing zeros dropped: `3`, `0.5`,
/// `17.07`.
pub fn format_number(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

fn pass_fields(d: &PassDescriptors) -> [String; 9] {
    [
        d.bonds_to_end.to_string(),
        d.rotatable_bonds.to_string(),
        d.atom_count.to_string(),
        format_number(d.tpsa),
        format_number(d.tpsa_per_atom),
        format_number(d.volume),
        d.h_acceptors.to_string(),
        d.h_donors.to_string(),
        d.pi_system_size.to_string(),
    ]
}

/// Writes the header on creation and one row per atom afterwards.
pub struct ReportWriter<W: io::Write> {
    inner: csv::Writer<W>,
    suppress_symmetric: bool,
}

impl<W: io::Write> ReportWriter<W> {
    pub fn new(writer: W, suppress_symmetric: bool) -> Result<Self> {
        let mut inner = WriterBuilder::new().has_headers(false).from_writer(writer);
        inner.write_record(header())?;
        Ok(ReportWriter {
            inner,
            suppress_symmetric,
        })
    }

    /// Rows for one molecule; `index` is the 1-based molecule index.
    /// Returns the number of rows written.
    pub fn write_molecule(&mut self, index: usize, analysis: &MoleculeAnalysis) -> Result<usize> {
        let mut rows = 0;
        for atom in analysis.retained(self.suppress_symmetric) {
            let mut record = vec![index.to_string(), atom.label.clone()];
            for kind in [TerminusKind::Molecule, TerminusKind::Branch] {
                record.extend(pass_fields(atom.pass(kind)));
            }
            self.inner.write_record(&record)?;
            rows += 1;
        }
        Ok(rows)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::AnalysisOptions;
    use crate::smiles::from_smiles;

    fn report(smi: &str, suppress: bool) -> String {
        let analysis =
            MoleculeAnalysis::run(&from_smiles(smi).unwrap(), &AnalysisOptions::default());
        let mut w = ReportWriter::new(Vec::new(), suppress).unwrap();
        w.write_molecule(7, &analysis).unwrap();
        String::from_utf8(w.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(17.07), "17.07");
        assert_eq!(format_number(5.691), "5.69");
        assert_eq!(format_number(0.004), "0");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(-1.5), "-1.5");
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn header_layout() {
        let h = header();
        assert_eq!(h.len(), 20);
        assert_eq!(h[0], "Molecule");
        assert_eq!(h[1], "Atom");
        assert_eq!(h[2], "Mol_BondsToEnd");
        assert_eq!(h[10], "Mol_PIsystemSize");
        assert_eq!(h[11], "Branch_BondsToEnd");
        assert_eq!(h[19], "Branch_PIsystemSize");
    }

    #[test]
    fn rows_per_atom() {
        let out = report("CCO", false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Molecule,Atom,Mol_BondsToEnd"));
        assert!(lines[1].starts_with("7,C.1,0,0,0,0,0,0,0,0,0,"));
        assert!(lines[2].starts_with("7,C.2,1,0,0,"));
        assert!(lines.iter().all(|l| l.split(',').count() == 20));
    }

    #[test]
    fn suppressed_rows() {
        let out = report("CC(C)C", true);
        assert_eq!(out.lines().count(), 3);
        let out = report("CC(C)C", false);
        assert_eq!(out.lines().count(), 5);
    }
}
