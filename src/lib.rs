//! # ChemCalc
//!
//! Chemical formula parser and molar mass calculator, PubChem compound validator and
//! solution preparation helper.
//!
//! - `Calculators`: formula parsing, molar mass, grams of solute for a solution
//! - `DBhandlers`: atomic weight sources and the PubChem compound lookup
//! - `session`: per-user context carrying the last computed molar mass
//! - `settings`: JSON configuration
//! - `cli`: interactive terminal menu
#[allow(non_snake_case)]
pub mod Calculators;
#[allow(non_snake_case)]
pub mod DBhandlers;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod error;
pub mod session;
pub mod settings;
