//! Errors reported to the user by one interaction, and errors that stop the tool at startup.
//!
//! Every computation returns `ChemCalcError` on failure; the interactive loop prints the message and
//! the `hint()` and waits for the next request. `StartupError` is only produced before the loop starts.

use crate::Calculators::molmass::FormulaError;
use crate::Calculators::solution::SolutionError;
use crate::DBhandlers::element_data::ElementDataError;
use crate::DBhandlers::pubchem_api::PubChemError;
use crate::settings::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EmptyInput,
    NoValidTokens,
    UnknownElement,
    InvalidCount,
    MissingMolarMass,
    ServiceUnavailable,
}

#[derive(Debug, Error)]
pub enum ChemCalcError {
    #[error("Compound '{0}' not found in PubChem database")]
    NotFound(String),
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Solution(#[from] SolutionError),
    #[error("PubChem service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<PubChemError> for ChemCalcError {
    fn from(e: PubChemError) -> Self {
        ChemCalcError::ServiceUnavailable(e.to_string())
    }
}

impl ChemCalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChemCalcError::NotFound(_) => ErrorKind::NotFound,
            ChemCalcError::Formula(FormulaError::EmptyInput) => ErrorKind::EmptyInput,
            ChemCalcError::Formula(FormulaError::NoValidTokens) => ErrorKind::NoValidTokens,
            ChemCalcError::Formula(FormulaError::UnknownElement(_)) => ErrorKind::UnknownElement,
            ChemCalcError::Formula(FormulaError::InvalidCount { .. }) => ErrorKind::InvalidCount,
            ChemCalcError::Solution(SolutionError::MissingMolarMass) => ErrorKind::MissingMolarMass,
            ChemCalcError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            ChemCalcError::NotFound(_) => {
                "Note: this validates that the chemical exists. Check the spelling or try the molecular formula."
            }
            ChemCalcError::Formula(e) => e.hint(),
            ChemCalcError::Solution(e) => e.hint(),
            ChemCalcError::ServiceUnavailable(_) => {
                "Check your internet connection or the PubChem URL in the settings, then try again."
            }
        }
    }

    /// not found is a warning, everything else an error
    pub fn is_warning(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// failures that stop the tool: everything before the first interaction, and a broken terminal
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("element data unavailable: {0}")]
    Elements(#[from] ElementDataError),
    #[error("HTTP client error: {0}")]
    Http(#[from] PubChemError),
    #[error("logger initialization failed: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("cannot open log file '{path}': {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}
