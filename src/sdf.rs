//! MDL SD-file reader (V2000 connection tables).
//!
//! Each record becomes a raw [`Molecule`] with implicit hydrogens derived
//! from default valences; coordinates and stereo flags are read past.

use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::Molecule;
use crate::valence::implied_hydrogens;

/// A record that could not be read. `line` is 1-based within the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SD record {record} (line {line}): {reason}")]
pub struct SdfError {
    pub record: usize,
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SdfRecord {
    /// Title line of the molfile header.
    pub name: String,
    pub mol: Molecule,
}

/// Split an SD file on `$$$$` and read every record.
///
/// One result per non-blank record, in file order; a bad record does not
/// stop the ones after it.
pub fn parse_sdf(input: &str) -> Vec<Result<SdfRecord, SdfError>> {
    let mut results = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut block_start = 1;

    for (i, line) in input.lines().enumerate() {
        if line.trim_end() == "$$$$" {
            if block.iter().any(|l| !l.trim().is_empty()) {
                let record = results.len() + 1;
                results.push(parse_molfile(&block, record, block_start));
            }
            block.clear();
            block_start = i + 2;
        } else {
            block.push(line);
        }
    }
    if block.iter().any(|l| !l.trim().is_empty()) {
        let record = results.len() + 1;
        results.push(parse_molfile(&block, record, block_start));
    }

    results
}

struct Cursor {
    record: usize,
    first_line: usize,
}

impl Cursor {
    fn err(&self, offset: usize, reason: impl Into<String>) -> SdfError {
        SdfError {
            record: self.record,
            line: self.first_line + offset,
            reason: reason.into(),
        }
    }
}

fn field<'a>(line: &'a str, range: std::ops::Range<usize>) -> &'a str {
    line.get(range.clone())
        .or_else(|| line.get(range.start..))
        .unwrap_or("")
        .trim()
}

fn parse_molfile(lines: &[&str], record: usize, first_line: usize) -> Result<SdfRecord, SdfError> {
    let cur = Cursor { record, first_line };
    if lines.len() < 4 {
        return Err(cur.err(0, "molfile header truncated"));
    }
    let name = lines[0].trim().to_string();

    let counts = lines[3];
    if counts.contains("V3000") {
        return Err(cur.err(3, "V3000 connection tables are not supported"));
    }
    let num_atoms: usize = field(counts, 0..3)
        .parse()
        .map_err(|_| cur.err(3, "invalid atom count"))?;
    let num_bonds: usize = field(counts, 3..6)
        .parse()
        .map_err(|_| cur.err(3, "invalid bond count"))?;

    let atom_start = 4;
    let bond_start = atom_start + num_atoms;
    if lines.len() < bond_start + num_bonds {
        return Err(cur.err(lines.len(), "connection table truncated"));
    }

    let mut mol = Molecule::new();
    for (i, line) in lines[atom_start..bond_start].iter().enumerate() {
        let atom = parse_atom_line(line).map_err(|reason| cur.err(atom_start + i, reason))?;
        mol.add_atom(atom);
    }

    for (i, line) in lines[bond_start..bond_start + num_bonds].iter().enumerate() {
        let offset = bond_start + i;
        let (a, b, order) = parse_bond_line(line).map_err(|reason| cur.err(offset, reason))?;
        if a == 0 || b == 0 || a > num_atoms || b > num_atoms || a == b {
            return Err(cur.err(offset, format!("bond {a}-{b} out of range")));
        }
        let (na, nb) = (NodeIndex::new(a - 1), NodeIndex::new(b - 1));
        if mol.bond_between(na, nb).is_some() {
            return Err(cur.err(offset, format!("duplicate bond {a}-{b}")));
        }
        if order == BondOrder::Aromatic {
            mol.atom_mut(na).is_aromatic = true;
            mol.atom_mut(nb).is_aromatic = true;
        }
        mol.add_bond(na, nb, Bond::new(order));
    }

    for (i, line) in lines[bond_start + num_bonds..].iter().enumerate() {
        if line.starts_with("M  END") {
            break;
        }
        if line.starts_with("M  CHG") {
            parse_charge_line(line, &mut mol)
                .map_err(|reason| cur.err(bond_start + num_bonds + i, reason))?;
        }
    }

    let atoms: Vec<NodeIndex> = mol.atoms().collect();
    for idx in atoms {
        let h = implied_hydrogens(&mol, idx);
        mol.atom_mut(idx).hydrogen_count = h;
    }

    Ok(SdfRecord { name, mol })
}

fn parse_atom_line(line: &str) -> Result<Atom, String> {
    // xxxxx.xxxxyyyyy.yyyyzzzzz.zzzz aaaddcccssshhhbbbvvvHHH...
    if line.len() < 34 {
        return Err(format!("atom line too short: '{line}'"));
    }
    let symbol = field(line, 31..34);
    let element =
        Element::from_symbol(symbol).ok_or_else(|| format!("unknown element '{symbol}'"))?;

    // old-style charge code: 1=+3, 2=+2, 3=+1, 5=-1, 6=-2, 7=-3
    let formal_charge = match field(line, 36..39).parse::<u8>() {
        Ok(1) => 3,
        Ok(2) => 2,
        Ok(3) => 1,
        Ok(5) => -1,
        Ok(6) => -2,
        Ok(7) => -3,
        _ => 0,
    };

    Ok(Atom {
        atomic_num: element.atomic_num(),
        formal_charge,
        ..Atom::default()
    })
}

fn parse_bond_line(line: &str) -> Result<(usize, usize, BondOrder), String> {
    // 111222tttsss...
    let a: usize = field(line, 0..3)
        .parse()
        .map_err(|_| format!("invalid bond line: '{line}'"))?;
    let b: usize = field(line, 3..6)
        .parse()
        .map_err(|_| format!("invalid bond line: '{line}'"))?;
    let order = match field(line, 6..9).parse::<u8>() {
        Ok(1) => BondOrder::Single,
        Ok(2) => BondOrder::Double,
        Ok(3) => BondOrder::Triple,
        Ok(4) => BondOrder::Aromatic,
        Ok(t) => return Err(format!("unsupported bond type {t}")),
        Err(_) => return Err(format!("invalid bond type in '{line}'")),
    };
    Ok((a, b, order))
}

fn parse_charge_line(line: &str, mol: &mut Molecule) -> Result<(), String> {
    // M  CHG  n  aaa vvv  aaa vvv ...
    let parts: Vec<&str> = line.split_whitespace().collect();
    let count: usize = parts
        .get(2)
        .and_then(|s| s.parse().ok())
        .ok_or("invalid charge count")?;
    for pair in parts[3..].chunks(2).take(count) {
        let [atom, value] = pair else {
            return Err("incomplete charge entry".into());
        };
        let atom: usize = atom
            .parse()
            .map_err(|_| format!("invalid charge atom index '{atom}'"))?;
        let value: i8 = value
            .parse()
            .map_err(|_| format!("invalid charge value '{value}'"))?;
        if atom == 0 || atom > mol.atom_count() {
            return Err(format!("charge on missing atom {atom}"));
        }
        mol.atom_mut(NodeIndex::new(atom - 1)).formal_charge = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHANOL: &str = "\
ethanol
  test

  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.0000    1.4000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
";

    const ACETATE: &str = "\
acetate
  test

  4  3  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.0000    1.4000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
    2.0000   -1.4000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  2  0
  2  4  1  0
M  CHG  1   4  -1
M  END
";

    fn hydrogens(mol: &Molecule) -> Vec<u8> {
        mol.atoms().map(|a| mol.atom(a).hydrogen_count).collect()
    }

    #[test]
    fn single_record() {
        let results = parse_sdf(ETHANOL);
        assert_eq!(results.len(), 1);
        let rec = results[0].as_ref().unwrap();
        assert_eq!(rec.name, "ethanol");
        assert_eq!(rec.mol.atom_count(), 3);
        assert_eq!(rec.mol.bond_count(), 2);
        assert_eq!(hydrogens(&rec.mol), vec![3, 2, 1]);
    }

    #[test]
    fn multiple_records_and_charges() {
        let input = format!("{ETHANOL}$$$$\n{ACETATE}$$$$\n");
        let results = parse_sdf(&input);
        assert_eq!(results.len(), 2);
        let acetate = &results[1].as_ref().unwrap().mol;
        assert_eq!(acetate.atom(NodeIndex::new(3)).formal_charge, -1);
        assert_eq!(hydrogens(acetate), vec![3, 0, 0, 0]);
    }

    #[test]
    fn blank_title_line_is_kept() {
        let input = ETHANOL.replacen("ethanol", "", 1);
        let results = parse_sdf(&input);
        let rec = results[0].as_ref().unwrap();
        assert_eq!(rec.name, "");
        assert_eq!(rec.mol.atom_count(), 3);
    }

    #[test]
    fn aromatic_bond_type_marks_atoms() {
        let mut input = String::from("benzene\n  test\n\n  6  6  0  0  0  0  0  0  0  0999 V2000\n");
        for _ in 0..6 {
            input.push_str("    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0\n");
        }
        for i in 1..=6 {
            input.push_str(&format!("{:>3}{:>3}  4  0\n", i, i % 6 + 1));
        }
        input.push_str("M  END\n");
        let results = parse_sdf(&input);
        let mol = &results[0].as_ref().unwrap().mol;
        assert!(mol.atoms().all(|a| mol.atom(a).is_aromatic));
        assert_eq!(hydrogens(mol), vec![1; 6]);
    }

    #[test]
    fn bad_record_does_not_stop_the_rest() {
        let broken = ETHANOL.replace(" O   0", " Xq  0");
        let input = format!("{broken}$$$$\n{ETHANOL}$$$$\n");
        let results = parse_sdf(&input);
        assert_eq!(results.len(), 2);
        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.record, 1);
        assert_eq!(err.line, 7);
        assert!(err.reason.contains("Xq"));
        assert!(results[1].is_ok());
    }

    #[test]
    fn v3000_is_rejected() {
        let input = "v3\n  test\n\n  0  0  0     0  0            999 V3000\nM  END\n";
        let err = parse_sdf(input).remove(0).unwrap_err();
        assert!(err.reason.contains("V3000"));
    }

    #[test]
    fn truncated_table() {
        let input = "short\n  test\n\n  3  2  0  0  0  0  0  0  0  0999 V2000\nM  END\n";
        assert!(parse_sdf(input)[0].is_err());
    }
}
