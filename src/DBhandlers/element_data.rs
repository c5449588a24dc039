//! # Element Data Module
//!
//! ## Aim
//! Supplies standard atomic weights to the molar mass calculator. Every source answers the same
//! question: "what is the atomic weight of this symbol?", and answers `None` for symbols it does not know.
//!
//! ## Main Data Structures and Logic
//! - `ElementData` trait: the lookup capability used by `Calculators::molmass`
//! - `ElementTable`: in-memory symbol -> weight table, either the built-in one (elements 1-118)
//!   or loaded from a user JSON file `{ "H": 1.008, "C": 12.011 }`
//! - `PubChemPeriodicTable`: the same table downloaded once from the PubChem periodic table endpoint
//! - `ElementSource`: enum over the sources, dispatched with `enum_dispatch`
//!
//! ## Usage
//! ```rust, ignore
//! let elements = ElementSource::from(ElementTable::builtin());
//! assert_eq!(elements.atomic_weight("O"), Some(15.999));
//! assert_eq!(elements.atomic_weight("o"), None);
//! ```
//!
//! Symbols are case-sensitive: one uppercase ASCII letter followed by lowercase ASCII letters.

use crate::DBhandlers::pubchem_api::{HttpClient, PubChemError};
use enum_dispatch::enum_dispatch;
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

// standard atomic weights, grouped by period
const ELEMENTS: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    // period 2
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.180),
    // period 3
    ("Na", 22.990),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.06),
    ("Cl", 35.45),
    ("Ar", 39.948),
    // period 4
    ("K", 39.098),
    ("Ca", 40.078),
    ("Sc", 44.956),
    ("Ti", 47.867),
    ("V", 50.942),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Ga", 69.723),
    ("Ge", 72.630),
    ("As", 74.922),
    ("Se", 78.971),
    ("Br", 79.904),
    ("Kr", 83.798),
    // period 5
    ("Rb", 85.468),
    ("Sr", 87.62),
    ("Y", 88.906),
    ("Zr", 91.224),
    ("Nb", 92.906),
    ("Mo", 95.95),
    ("Tc", 98.0),
    ("Ru", 101.07),
    ("Rh", 102.91),
    ("Pd", 106.42),
    ("Ag", 107.87),
    ("Cd", 112.41),
    ("In", 114.82),
    ("Sn", 118.71),
    ("Sb", 121.76),
    ("Te", 127.60),
    ("I", 126.90),
    ("Xe", 131.29),
    // period 6
    ("Cs", 132.91),
    ("Ba", 137.33),
    ("La", 138.91),
    ("Ce", 140.12),
    ("Pr", 140.91),
    ("Nd", 144.24),
    ("Pm", 145.0),
    ("Sm", 150.36),
    ("Eu", 151.96),
    ("Gd", 157.25),
    ("Tb", 158.93),
    ("Dy", 162.50),
    ("Ho", 164.93),
    ("Er", 167.26),
    ("Tm", 168.93),
    ("Yb", 173.05),
    ("Lu", 174.97),
    ("Hf", 178.49),
    ("Ta", 180.95),
    ("W", 183.84),
    ("Re", 186.21),
    ("Os", 190.23),
    ("Ir", 192.22),
    ("Pt", 195.08),
    ("Au", 196.97),
    ("Hg", 200.59),
    ("Tl", 204.38),
    ("Pb", 207.2),
    ("Bi", 208.98),
    ("Po", 209.0),
    ("At", 210.0),
    ("Rn", 222.0),
    // period 7, mass number of the longest-lived isotope where no standard weight exists
    ("Fr", 223.0),
    ("Ra", 226.0),
    ("Ac", 227.0),
    ("Th", 232.04),
    ("Pa", 231.04),
    ("U", 238.03),
    ("Np", 237.0),
    ("Pu", 244.0),
    ("Am", 243.0),
    ("Cm", 247.0),
    ("Bk", 247.0),
    ("Cf", 251.0),
    ("Es", 252.0),
    ("Fm", 257.0),
    ("Md", 258.0),
    ("No", 259.0),
    ("Lr", 262.0),
    ("Rf", 267.0),
    ("Db", 270.0),
    ("Sg", 269.0),
    ("Bh", 270.0),
    ("Hs", 270.0),
    ("Mt", 278.0),
    ("Ds", 281.0),
    ("Rg", 281.0),
    ("Cn", 285.0),
    ("Nh", 286.0),
    ("Fl", 289.0),
    ("Mc", 289.0),
    ("Lv", 293.0),
    ("Ts", 293.0),
    ("Og", 294.0),
];

#[derive(Debug, Error)]
pub enum ElementDataError {
    #[error("Failed to read element file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse element data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid element symbol '{0}': expected one uppercase letter followed by lowercase letters")]
    InvalidSymbol(String),
    #[error("Atomic weight of '{symbol}' must be positive, found {weight}")]
    NonPositiveWeight { symbol: String, weight: f64 },
    #[error("Element data source contains no elements")]
    Empty,
    #[error("PubChem periodic table unavailable: {0}")]
    Remote(#[from] PubChemError),
}

/// Lookup capability for atomic weights.
#[enum_dispatch]
pub trait ElementData {
    /// Standard atomic weight of `symbol`, `None` for symbols the source does not know.
    fn atomic_weight(&self, symbol: &str) -> Option<f64>;
    /// Human readable origin of the data, shown in settings and logs
    fn source_name(&self) -> &str;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// checks the key format used by every element source: `[A-Z][a-z]*`
pub fn is_element_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_lowercase()),
        _ => false,
    }
}

/// In-memory table of atomic weights
#[derive(Debug, Clone)]
pub struct ElementTable {
    weights: HashMap<String, f64>,
    origin: String,
}

impl ElementTable {
    /// Standard atomic weights of elements 1-118
    pub fn builtin() -> Self {
        let weights = ELEMENTS
            .iter()
            .map(|(symbol, weight)| (symbol.to_string(), *weight))
            .collect();
        Self {
            weights,
            origin: "built-in table".to_string(),
        }
    }
    /// builds a table from symbol/weight pairs, validating both
    pub fn from_pairs<I, S>(pairs: I, origin: &str) -> Result<Self, ElementDataError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut weights = HashMap::new();
        for (symbol, weight) in pairs {
            let symbol: String = symbol.into();
            if !is_element_symbol(&symbol) {
                return Err(ElementDataError::InvalidSymbol(symbol));
            }
            if !(weight > 0.0) {
                return Err(ElementDataError::NonPositiveWeight { symbol, weight });
            }
            weights.insert(symbol, weight);
        }
        if weights.is_empty() {
            return Err(ElementDataError::Empty);
        }
        Ok(Self {
            weights,
            origin: origin.to_string(),
        })
    }
    /// Loads a user table stored as a JSON object `{ "H": 1.008, "C": 12.011 }`
    pub fn from_json_file(path: &str) -> Result<Self, ElementDataError> {
        let content = fs::read_to_string(Path::new(path)).map_err(|source| ElementDataError::Io {
            path: path.to_string(),
            source,
        })?;
        let raw: HashMap<String, f64> = serde_json::from_str(&content)?;
        let table = Self::from_pairs(raw, &format!("file {}", path))?;
        info!("Loaded {} elements from '{}'", table.len(), path);
        Ok(table)
    }
}

impl ElementData for ElementTable {
    fn atomic_weight(&self, symbol: &str) -> Option<f64> {
        self.weights.get(symbol).copied()
    }
    fn source_name(&self) -> &str {
        &self.origin
    }
    fn len(&self) -> usize {
        self.weights.len()
    }
}

////////////////////////////////////PUBCHEM PERIODIC TABLE//////////////////////////////////////////
#[derive(Debug, Deserialize)]
struct PeriodicTableResponse {
    #[serde(rename = "Table")]
    table: PeriodicTableBody,
}

#[derive(Debug, Deserialize)]
struct PeriodicTableBody {
    #[serde(rename = "Columns")]
    columns: PeriodicTableColumns,
    #[serde(rename = "Row")]
    rows: Vec<PeriodicTableRow>,
}

#[derive(Debug, Deserialize)]
struct PeriodicTableColumns {
    #[serde(rename = "Column")]
    column: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PeriodicTableRow {
    #[serde(rename = "Cell")]
    cell: Vec<String>,
}

/// Atomic weights downloaded from `{base}/periodictable/JSON`, fetched once
#[derive(Debug, Clone)]
pub struct PubChemPeriodicTable {
    table: ElementTable,
}

impl PubChemPeriodicTable {
    pub fn fetch<C: HttpClient>(client: &C, base_url: &str) -> Result<Self, ElementDataError> {
        let url = format!("{}/periodictable/JSON", base_url.trim_end_matches('/'));
        info!("Fetching periodic table from {}", url);
        let body = client.get_text(&url)?;
        Self::from_json(&body)
    }

    pub fn from_json(body: &str) -> Result<Self, ElementDataError> {
        let response: PeriodicTableResponse = serde_json::from_str(body)?;
        let columns = &response.table.columns.column;
        let symbol_idx = columns.iter().position(|c| c == "Symbol");
        let mass_idx = columns.iter().position(|c| c == "AtomicMass");
        let (Some(symbol_idx), Some(mass_idx)) = (symbol_idx, mass_idx) else {
            return Err(ElementDataError::Empty);
        };

        let mut pairs = Vec::with_capacity(response.table.rows.len());
        for row in &response.table.rows {
            let (Some(symbol), Some(mass)) = (row.cell.get(symbol_idx), row.cell.get(mass_idx))
            else {
                continue;
            };
            // some synthetic elements are reported as "[294]"
            let mass = mass.trim().trim_start_matches('[').trim_end_matches(']');
            match mass.parse::<f64>() {
                Ok(weight) => pairs.push((symbol.trim().to_string(), weight)),
                Err(_) => warn!("Skipping {}: unparsable atomic mass '{}'", symbol, mass),
            }
        }
        let table = ElementTable::from_pairs(pairs, "PubChem periodic table")?;
        info!("PubChem periodic table loaded: {} elements", table.len());
        Ok(Self { table })
    }
}

impl ElementData for PubChemPeriodicTable {
    fn atomic_weight(&self, symbol: &str) -> Option<f64> {
        self.table.atomic_weight(symbol)
    }
    fn source_name(&self) -> &str {
        self.table.source_name()
    }
    fn len(&self) -> usize {
        self.table.len()
    }
}

/// Element source selected by the configuration
#[enum_dispatch(ElementData)]
#[derive(Debug, Clone)]
pub enum ElementSource {
    ElementTable,
    PubChemPeriodicTable,
}

impl Default for ElementSource {
    fn default() -> Self {
        ElementSource::from(ElementTable::builtin())
    }
}
