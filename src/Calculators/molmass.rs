//! Module to parse a chemical formula and calculate its molar mass
//!
//! A formula is scanned left to right for runs of one uppercase ASCII letter, zero or more
//! lowercase ASCII letters (the element symbol) and zero or more ASCII digits (the count, 1 when absent).
//! Everything between such runs (spaces, punctuation, brackets, phase marks, non-ASCII digits) is skipped.
//!
use crate::DBhandlers::element_data::ElementData;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]*)([0-9]*)").expect("valid formula token regex"));

/// (element symbol, count) pair extracted from a formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaToken {
    pub symbol: String,
    pub count: u32,
}

/// One line of the molar mass breakdown, in the order the element was met in the formula
#[derive(Debug, Clone, PartialEq)]
pub struct ElementContribution {
    pub count: u32,
    pub symbol: String,
    pub atomic_weight: f64,
}

impl ElementContribution {
    pub fn mass(&self) -> f64 {
        self.count as f64 * self.atomic_weight
    }
}

/// Successful result of a molar mass calculation
#[derive(Debug, Clone, PartialEq)]
pub struct MolarMass {
    pub formula: String,
    /// g/mol, accumulated from unrounded atomic weights
    pub total_mass: f64,
    pub breakdown: Vec<ElementContribution>,
}

impl MolarMass {
    /// atom count per element, in order of first appearance: "CH3COOH" -> C 2, H 4, O 2
    pub fn element_totals(&self) -> Vec<(String, u32)> {
        let mut totals: Vec<(String, u32)> = Vec::new();
        for contribution in &self.breakdown {
            match totals.iter_mut().find(|(s, _)| *s == contribution.symbol) {
                Some((_, count)) => *count += contribution.count,
                None => totals.push((contribution.symbol.clone(), contribution.count)),
            }
        }
        totals
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("Please enter a chemical formula")]
    EmptyInput,
    #[error("No element symbols found in the formula")]
    NoValidTokens,
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Invalid count '{digits}' for element '{symbol}'")]
    InvalidCount { symbol: String, digits: String },
}

impl FormulaError {
    /// corrective hint shown under the error message
    pub fn hint(&self) -> &'static str {
        match self {
            FormulaError::EmptyInput => "Type a formula such as H2O or C6H12O6.",
            FormulaError::NoValidTokens => {
                "Check capitalization: element symbols start with an uppercase letter (H2O, not h2o)."
            }
            FormulaError::UnknownElement(_) => {
                "Check the symbol: first letter uppercase, the rest lowercase (Cl, not CL)."
            }
            FormulaError::InvalidCount { .. } => "Atom counts must be whole numbers from 1 to 4294967295.",
        }
    }
}

/// Splits a formula into tokens. Fails on empty input and on input without a single element symbol.
pub fn tokenize_formula(formula: &str) -> Result<Vec<FormulaToken>, FormulaError> {
    if formula.trim().is_empty() {
        return Err(FormulaError::EmptyInput);
    }
    let mut tokens = Vec::new();
    for captures in TOKEN_REGEX.captures_iter(formula) {
        let symbol = captures[1].to_string();
        let digits = &captures[2];
        let count = if digits.is_empty() {
            1
        } else {
            match digits.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(FormulaError::InvalidCount {
                        symbol,
                        digits: digits.to_string(),
                    });
                }
            }
        };
        tokens.push(FormulaToken { symbol, count });
    }
    if tokens.is_empty() {
        return Err(FormulaError::NoValidTokens);
    }
    Ok(tokens)
}

/// Function to calculate the molar mass of a substance given its chemical formula.
/// All-or-nothing: the first unknown symbol rejects the whole formula.
pub fn compute_molar_mass<E: ElementData + ?Sized>(
    formula: &str,
    elements: &E,
) -> Result<MolarMass, FormulaError> {
    let tokens = tokenize_formula(formula)?;
    // weights fetched during this calculation only
    let mut weights: HashMap<&str, f64> = HashMap::new();
    let mut total_mass = 0.0;
    let mut breakdown = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let atomic_weight = match weights.get(token.symbol.as_str()) {
            Some(&weight) => weight,
            None => {
                let weight = elements
                    .atomic_weight(&token.symbol)
                    .ok_or_else(|| FormulaError::UnknownElement(token.symbol.clone()))?;
                weights.insert(token.symbol.as_str(), weight);
                weight
            }
        };
        let contribution = ElementContribution {
            count: token.count,
            symbol: token.symbol.clone(),
            atomic_weight,
        };
        debug!(
            "found element: {}, number of atoms {}, mass {}",
            contribution.symbol,
            contribution.count,
            contribution.mass()
        );
        total_mass += contribution.mass();
        breakdown.push(contribution);
    }
    Ok(MolarMass {
        formula: formula.trim().to_string(),
        total_mass,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBhandlers::element_data::{ElementSource, ElementTable};
    use approx::assert_relative_eq;
    use std::cell::RefCell;

    fn standard_elements() -> ElementTable {
        ElementTable::from_pairs(
            vec![
                ("C", 12.011),
                ("H", 1.008),
                ("O", 15.999),
                ("N", 14.007),
                ("Na", 22.990),
                ("Cl", 35.45),
                ("Ca", 40.078),
            ],
            "test",
        )
        .unwrap()
    }

    // counts every lookup that reaches the element source
    struct CountingElements {
        table: ElementTable,
        calls: RefCell<Vec<String>>,
    }

    impl ElementData for CountingElements {
        fn atomic_weight(&self, symbol: &str) -> Option<f64> {
            self.calls.borrow_mut().push(symbol.to_string());
            self.table.atomic_weight(symbol)
        }
        fn source_name(&self) -> &str {
            "counting"
        }
        fn len(&self) -> usize {
            self.table.len()
        }
    }

    #[test]
    fn test_tokenize_formula() {
        let tokens = tokenize_formula("C6H12O6").unwrap();
        assert_eq!(
            tokens,
            vec![
                FormulaToken { symbol: "C".to_string(), count: 6 },
                FormulaToken { symbol: "H".to_string(), count: 12 },
                FormulaToken { symbol: "O".to_string(), count: 6 },
            ]
        );

        let tokens = tokenize_formula("NaCl").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].symbol, "Na");
        assert_eq!(tokens[0].count, 1);
        assert_eq!(tokens[1].symbol, "Cl");
    }

    #[test]
    fn test_tokenizer_skips_unmatched_characters() {
        // spaces, punctuation and brackets are skipped, not expanded
        let tokens = tokenize_formula(" H2 - O ! ").unwrap();
        assert_eq!(tokens.len(), 2);
        let tokens = tokenize_formula("Ca(OH)2").unwrap();
        let symbols: Vec<(&str, u32)> = tokens.iter().map(|t| (t.symbol.as_str(), t.count)).collect();
        assert_eq!(symbols, vec![("Ca", 1), ("O", 1), ("H", 2)]);
        // lowercase run in front is ignored, the rest still parses
        let tokens = tokenize_formula("h2O").unwrap();
        assert_eq!(tokens, vec![FormulaToken { symbol: "O".to_string(), count: 1 }]);
    }

    #[test]
    fn test_non_ascii_digits_are_skipped() {
        // Arabic-Indic two and fullwidth three are not counts
        let tokens = tokenize_formula("H\u{0662}O").unwrap();
        assert_eq!(
            tokens,
            vec![
                FormulaToken { symbol: "H".to_string(), count: 1 },
                FormulaToken { symbol: "O".to_string(), count: 1 },
            ]
        );
        let tokens = tokenize_formula("H2\u{FF13}O").unwrap();
        assert_eq!(
            tokens,
            vec![
                FormulaToken { symbol: "H".to_string(), count: 2 },
                FormulaToken { symbol: "O".to_string(), count: 1 },
            ]
        );
        let water = compute_molar_mass("H2\u{FF13}O", &standard_elements()).unwrap();
        assert_relative_eq!(water.total_mass, 18.015, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let elements = standard_elements();
        assert_eq!(compute_molar_mass("", &elements), Err(FormulaError::EmptyInput));
        assert_eq!(compute_molar_mass("   ", &elements), Err(FormulaError::EmptyInput));
        assert_eq!(compute_molar_mass("\t\n", &elements), Err(FormulaError::EmptyInput));
    }

    #[test]
    fn test_no_valid_tokens() {
        let elements = standard_elements();
        assert_eq!(compute_molar_mass("h2o", &elements), Err(FormulaError::NoValidTokens));
        assert_eq!(compute_molar_mass("123 ()", &elements), Err(FormulaError::NoValidTokens));
        assert!(FormulaError::NoValidTokens.hint().contains("uppercase"));
    }

    #[test]
    fn test_unknown_element() {
        let elements = standard_elements();
        assert_eq!(
            compute_molar_mass("Xx2", &elements),
            Err(FormulaError::UnknownElement("Xx".to_string()))
        );
        // all-or-nothing even when the unknown symbol comes last
        assert_eq!(
            compute_molar_mass("H2OQq", &elements),
            Err(FormulaError::UnknownElement("Qq".to_string()))
        );
        // wrong casing of a real element
        assert_eq!(
            compute_molar_mass("NACL", &elements),
            Err(FormulaError::UnknownElement("A".to_string()))
        );
    }

    #[test]
    fn test_unknown_element_stops_lookups() {
        let elements = CountingElements {
            table: standard_elements(),
            calls: RefCell::new(Vec::new()),
        };
        let result = compute_molar_mass("CXxH4O", &elements);
        assert_eq!(result, Err(FormulaError::UnknownElement("Xx".to_string())));
        assert_eq!(*elements.calls.borrow(), vec!["C".to_string(), "Xx".to_string()]);
    }

    #[test]
    fn test_lookup_cached_within_calculation() {
        let elements = CountingElements {
            table: standard_elements(),
            calls: RefCell::new(Vec::new()),
        };
        let result = compute_molar_mass("CH3COOH", &elements).unwrap();
        assert_eq!(result.breakdown.len(), 6);
        assert_eq!(elements.calls.borrow().len(), 3);
        assert_eq!(
            result.element_totals(),
            vec![("C".to_string(), 2), ("H".to_string(), 4), ("O".to_string(), 2)]
        );
    }

    #[test]
    fn test_invalid_count() {
        let elements = standard_elements();
        assert_eq!(
            compute_molar_mass("H0", &elements),
            Err(FormulaError::InvalidCount {
                symbol: "H".to_string(),
                digits: "0".to_string()
            })
        );
        assert!(matches!(
            compute_molar_mass("C99999999999", &elements),
            Err(FormulaError::InvalidCount { .. })
        ));
        let err = FormulaError::InvalidCount {
            symbol: "C".to_string(),
            digits: "99999999999".to_string(),
        };
        assert!(err.hint().contains("4294967295"));
    }

    #[test]
    fn test_glucose() {
        let elements = standard_elements();
        let result = compute_molar_mass("C6H12O6", &elements).unwrap();
        assert_relative_eq!(result.total_mass, 180.156, epsilon = 1e-9);
        assert_eq!(format!("{:.3}", result.total_mass), "180.156");
        assert_eq!(
            result.breakdown,
            vec![
                ElementContribution { count: 6, symbol: "C".to_string(), atomic_weight: 12.011 },
                ElementContribution { count: 12, symbol: "H".to_string(), atomic_weight: 1.008 },
                ElementContribution { count: 6, symbol: "O".to_string(), atomic_weight: 15.999 },
            ]
        );
        assert_eq!(result.formula, "C6H12O6");
    }

    #[test]
    fn test_calculate_molar_mass() {
        let elements = ElementSource::default();
        let formula_and_mass = [
            ("H2O", 18.015),
            ("NaCl", 58.44),
            ("C6H8O6", 176.124),
            ("CaCO3", 100.086),
            ("H2SO4", 98.072),
        ];
        for (formula, expected) in formula_and_mass {
            let result = compute_molar_mass(formula, &elements).unwrap();
            assert_relative_eq!(result.total_mass, expected, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let elements = ElementSource::default();
        for formula in ["C2H5OH", "KMnO4", "Fe2(SO4)3", "C8H10N4O2", "U"] {
            let result = compute_molar_mass(formula, &elements).unwrap();
            let sum: f64 = result.breakdown.iter().map(|c| c.mass()).sum();
            assert_eq!(format!("{:.3}", sum), format!("{:.3}", result.total_mass));
            assert!(result.total_mass > 0.0);
        }
    }

    #[test]
    fn test_order_independence_and_idempotence() {
        let elements = standard_elements();
        let a = compute_molar_mass("C6H12O6", &elements).unwrap();
        let b = compute_molar_mass("O6C6H12", &elements).unwrap();
        let c = compute_molar_mass("H12O6C6", &elements).unwrap();
        assert_relative_eq!(a.total_mass, b.total_mass, epsilon = 1e-9);
        assert_relative_eq!(a.total_mass, c.total_mass, epsilon = 1e-9);

        let again = compute_molar_mass("C6H12O6", &elements).unwrap();
        assert_eq!(a, again);
    }
}
