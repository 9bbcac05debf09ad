use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond { bond: BondToken, pos: usize },
    RingClosure { digit: u16, pos: usize },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub is_aromatic: bool,
    /// `None` for organic-subset atoms, whose hydrogens are implied.
    pub hcount: Option<u8>,
    pub charge: i8,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    /// `/` or `\`; the direction is dropped, the bond is single.
    Directional,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let next = chars.get(i + 1).copied();
        match chars[i] {
            '[' => {
                let (tok, end) = parse_bracket_atom(&chars, i)?;
                tokens.push(Token::Atom(tok));
                i = end;
            }
            'B' if next == Some('r') => {
                tokens.push(Token::Atom(bare_atom(Element::Br, false, i)));
                i += 2;
            }
            'C' if next == Some('l') => {
                tokens.push(Token::Atom(bare_atom(Element::Cl, false, i)));
                i += 2;
            }
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
                let element = organic_element(chars[i]);
                tokens.push(Token::Atom(bare_atom(element, false, i)));
                i += 1;
            }
            'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                let element = organic_element(chars[i].to_ascii_uppercase());
                tokens.push(Token::Atom(bare_atom(element, true, i)));
                i += 1;
            }
            '-' => {
                tokens.push(Token::Bond { bond: BondToken::Single, pos: i });
                i += 1;
            }
            '=' => {
                tokens.push(Token::Bond { bond: BondToken::Double, pos: i });
                i += 1;
            }
            '#' => {
                tokens.push(Token::Bond { bond: BondToken::Triple, pos: i });
                i += 1;
            }
            ':' => {
                tokens.push(Token::Bond { bond: BondToken::Aromatic, pos: i });
                i += 1;
            }
            '/' | '\\' => {
                tokens.push(Token::Bond { bond: BondToken::Directional, pos: i });
                i += 1;
            }
            '(' => {
                tokens.push(Token::OpenParen(i));
                i += 1;
            }
            ')' => {
                tokens.push(Token::CloseParen(i));
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot(i));
                i += 1;
            }
            '%' => {
                let digits = (chars.get(i + 1), chars.get(i + 2));
                match digits {
                    (Some(d1), Some(d2)) if d1.is_ascii_digit() && d2.is_ascii_digit() => {
                        let digit = digit_value(*d1) * 10 + digit_value(*d2);
                        tokens.push(Token::RingClosure { digit, pos: i });
                        i += 3;
                    }
                    _ => return Err(SmilesError::UnexpectedChar { pos: i, ch: '%' }),
                }
            }
            d @ '0'..='9' => {
                tokens.push(Token::RingClosure {
                    digit: digit_value(d),
                    pos: i,
                });
                i += 1;
            }
            ch => return Err(SmilesError::UnexpectedChar { pos: i, ch }),
        }
    }

    Ok(tokens)
}

fn digit_value(ch: char) -> u16 {
    ch as u16 - '0' as u16
}

fn organic_element(ch: char) -> Element {
    match ch {
        'B' => Element::B,
        'C' => Element::C,
        'N' => Element::N,
        'O' => Element::O,
        'P' => Element::P,
        'S' => Element::S,
        'F' => Element::F,
        _ => Element::I,
    }
}

fn bare_atom(element: Element, aromatic: bool, pos: usize) -> AtomToken {
    AtomToken {
        element,
        is_aromatic: aromatic,
        hcount: None,
        charge: 0,
        pos,
    }
}

fn parse_bracket_atom(chars: &[char], start: usize) -> Result<(AtomToken, usize), SmilesError> {
    let close = chars[start..]
        .iter()
        .position(|&c| c == ']')
        .map(|off| start + off)
        .ok_or(SmilesError::UnclosedBracket { pos: start })?;
    let mut i = start + 1;

    // isotope is accepted and dropped
    while i < close && chars[i].is_ascii_digit() {
        i += 1;
    }

    let (element, is_aromatic) = parse_bracket_element(chars, &mut i, close)?;

    // chirality marks are accepted and dropped
    while i < close && chars[i] == '@' {
        i += 1;
    }
    if i + 1 < close && chars[i..i + 2] == ['T', 'H'] || i + 1 < close && chars[i..i + 2] == ['A', 'L'] {
        i += 2;
        while i < close && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    let mut hcount = 0u8;
    if i < close && chars[i] == 'H' {
        i += 1;
        hcount = 1;
        if i < close && chars[i].is_ascii_digit() {
            hcount = digit_value(chars[i]) as u8;
            i += 1;
        }
    }

    let charge = parse_charge(chars, &mut i, close)?;

    // atom class
    if i < close && chars[i] == ':' {
        i += 1;
        while i < close && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    if i != close {
        return Err(SmilesError::UnexpectedChar { pos: i, ch: chars[i] });
    }

    Ok((
        AtomToken {
            element,
            is_aromatic,
            hcount: Some(hcount),
            charge,
            pos: start,
        },
        close + 1,
    ))
}

fn parse_bracket_element(
    chars: &[char],
    i: &mut usize,
    close: usize,
) -> Result<(Element, bool), SmilesError> {
    const AROMATIC: [(&str, Element); 8] = [
        ("se", Element::Se),
        ("te", Element::Te),
        ("as", Element::As),
        ("b", Element::B),
        ("c", Element::C),
        ("n", Element::N),
        ("o", Element::O),
        ("s", Element::S),
    ];

    let start = *i;
    if start >= close {
        return Err(SmilesError::InvalidElement {
            pos: start,
            text: String::new(),
        });
    }

    let rest: String = chars[start..close].iter().collect();
    for (pat, element) in AROMATIC {
        if rest.starts_with(pat) {
            *i += pat.len();
            return Ok((element, true));
        }
    }

    // two-letter symbols win over one-letter ones
    if start + 1 < close && chars[start + 1].is_ascii_lowercase() {
        let two: String = chars[start..start + 2].iter().collect();
        if let Some(element) = Element::from_symbol(&two) {
            *i += 2;
            return Ok((element, false));
        }
    }
    let one = chars[start].to_string();
    match Element::from_symbol(&one) {
        Some(element) => {
            *i += 1;
            Ok((element, false))
        }
        None => Err(SmilesError::InvalidElement {
            pos: start,
            text: rest,
        }),
    }
}

fn parse_charge(chars: &[char], i: &mut usize, close: usize) -> Result<i8, SmilesError> {
    if *i >= close || (chars[*i] != '+' && chars[*i] != '-') {
        return Ok(0);
    }
    let sign_char = chars[*i];
    let sign: i8 = if sign_char == '+' { 1 } else { -1 };
    let pos = *i;
    *i += 1;

    if *i < close && chars[*i].is_ascii_digit() {
        let magnitude = digit_value(chars[*i]) as i8;
        *i += 1;
        if *i < close && chars[*i].is_ascii_digit() {
            return Err(SmilesError::InvalidCharge { pos });
        }
        return Ok(sign * magnitude);
    }

    let mut magnitude = 1i8;
    while *i < close && chars[*i] == sign_char {
        magnitude += 1;
        *i += 1;
    }
    Ok(sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(tokens: &[Token]) -> Vec<&AtomToken> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Atom(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn two_letter_halogens() {
        let tokens = tokenize("ClCBr").unwrap();
        let a = atoms(&tokens);
        assert_eq!(a.len(), 3);
        assert_eq!(a[0].element, Element::Cl);
        assert_eq!(a[1].element, Element::C);
        assert_eq!(a[2].element, Element::Br);
    }

    #[test]
    fn bracket_atom_fields() {
        let tokens = tokenize("[13CH3+]").unwrap();
        let a = atoms(&tokens);
        assert_eq!(a[0].element, Element::C);
        assert_eq!(a[0].hcount, Some(3));
        assert_eq!(a[0].charge, 1);
    }

    #[test]
    fn bracket_aromatic_and_chirality() {
        let tokens = tokenize("[nH][C@@H](F)[se]").unwrap();
        let a = atoms(&tokens);
        assert!(a[0].is_aromatic);
        assert_eq!(a[0].hcount, Some(1));
        assert_eq!(a[1].element, Element::C);
        assert_eq!(a[1].hcount, Some(1));
        assert_eq!(a[3].element, Element::Se);
        assert!(a[3].is_aromatic);
    }

    #[test]
    fn charges() {
        let charge = |s: &str| atoms(&tokenize(s).unwrap())[0].charge;
        assert_eq!(charge("[O-]"), -1);
        assert_eq!(charge("[Fe++]"), 2);
        assert_eq!(charge("[Fe+3]"), 3);
        assert_eq!(charge("[N+]"), 1);
        assert_eq!(charge("[Na]"), 0);
    }

    #[test]
    fn percent_ring_closure() {
        let tokens = tokenize("C%12CC%12").unwrap();
        assert!(tokens.contains(&Token::RingClosure { digit: 12, pos: 1 }));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            tokenize("C$C"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: '$' })
        ));
        assert!(matches!(
            tokenize("[CH3"),
            Err(SmilesError::UnclosedBracket { pos: 0 })
        ));
        assert!(matches!(
            tokenize("[Xx]"),
            Err(SmilesError::InvalidElement { .. })
        ));
    }
}
