use serde::Deserialize;

use atomspan::{
    from_smiles, AnalysisOptions, Molecule, MoleculeAnalysis, PassDescriptors,
    PropertyCalculator, StandardProperties,
};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn try_parse(smiles: &str) -> Option<Molecule> {
    match from_smiles(smiles) {
        Ok(m) => Some(m),
        Err(e) => {
            eprintln!("parse failure: {smiles:?}: {e}");
            None
        }
    }
}

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

fn report(kind: &str, failures: Vec<String>, total: usize) {
    if !failures.is_empty() {
        panic!(
            "{kind}: {} of {total} checks failed:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

// ---------------------------------------------------------------------------
// 1. Fragment descriptors
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PassEntry {
    bonds_to_end: u32,
    rotatable_bonds: usize,
    atom_count: usize,
    volume: f64,
}

#[derive(Deserialize)]
struct AtomEntry {
    index: usize,
    mol: PassEntry,
    branch: PassEntry,
}

#[derive(Deserialize)]
struct FragmentEntry {
    smiles: String,
    atoms: Vec<AtomEntry>,
}

fn compare_pass(
    smiles: &str,
    index: usize,
    pass: &str,
    expected: &PassEntry,
    got: &PassDescriptors,
    failures: &mut Vec<String>,
) {
    let got_tuple = (got.bonds_to_end, got.rotatable_bonds, got.atom_count);
    let expected_tuple = (
        expected.bonds_to_end,
        expected.rotatable_bonds,
        expected.atom_count,
    );
    if got_tuple != expected_tuple || !approx_eq(got.volume, expected.volume, 0.01) {
        failures.push(format!(
            "[{pass}] {smiles} atom {index}: expected {expected_tuple:?} vol {}, got {got_tuple:?} vol {}",
            expected.volume, got.volume
        ));
    }
}

#[test]
fn approval_fragments() {
    let data: Vec<FragmentEntry> =
        serde_json::from_str(include_str!("approval_data/fragments.json")).unwrap();

    let mut failures = Vec::new();
    let mut total = 0;
    for entry in &data {
        let Some(mol) = try_parse(&entry.smiles) else {
            failures.push(format!("{}: does not parse", entry.smiles));
            continue;
        };
        let analysis = MoleculeAnalysis::run(&mol, &AnalysisOptions::default());
        for atom in &entry.atoms {
            total += 1;
            let got = &analysis.atoms[atom.index];
            compare_pass(&entry.smiles, atom.index, "mol", &atom.mol, &got.mol, &mut failures);
            compare_pass(
                &entry.smiles,
                atom.index,
                "branch",
                &atom.branch,
                &got.branch,
                &mut failures,
            );
        }
    }
    report("fragments", failures, total);
}

// ---------------------------------------------------------------------------
// 2. Whole-molecule properties
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PropertyEntry {
    smiles: String,
    tpsa: f64,
    h_acceptors: usize,
    h_donors: usize,
    pi_system: usize,
    weight: f64,
}

#[test]
fn approval_properties() {
    let data: Vec<PropertyEntry> =
        serde_json::from_str(include_str!("approval_data/properties.json")).unwrap();

    let calc = StandardProperties;
    let mut failures = Vec::new();
    for entry in &data {
        let Some(mol) = try_parse(&entry.smiles) else {
            failures.push(format!("{}: does not parse", entry.smiles));
            continue;
        };
        let tpsa = calc.tpsa(&mol);
        if !approx_eq(tpsa, entry.tpsa, 0.01) {
            failures.push(format!("[tpsa] {}: expected {}, got {tpsa}", entry.smiles, entry.tpsa));
        }
        let hba = calc.h_acceptors(&mol);
        if hba != entry.h_acceptors {
            failures.push(format!("[hba] {}: expected {}, got {hba}", entry.smiles, entry.h_acceptors));
        }
        let hbd = calc.h_donors(&mol);
        if hbd != entry.h_donors {
            failures.push(format!("[hbd] {}: expected {}, got {hbd}", entry.smiles, entry.h_donors));
        }
        let pi = calc.largest_pi_system(&mol);
        if pi != entry.pi_system {
            failures.push(format!("[pi] {}: expected {}, got {pi}", entry.smiles, entry.pi_system));
        }
        let weight = calc.molecular_weight(&mol);
        if !approx_eq(weight, entry.weight, 0.01) {
            failures.push(format!(
                "[weight] {}: expected {}, got {weight}",
                entry.smiles, entry.weight
            ));
        }
    }
    report("properties", failures, data.len());
}
