//! Session context of one interactive user.
//!
//! The session owns the two data sources and the compound saved by the last successful search or
//! molar mass calculation. The solution calculator falls back to that saved molar mass when the user
//! does not type one. Nothing here is global: two sessions never see each other's saved compound.

use crate::Calculators::molmass::{MolarMass, compute_molar_mass};
use crate::Calculators::solution::{SolutionRecipe, SolutionRequest};
use crate::DBhandlers::element_data::{
    ElementData, ElementDataError, ElementSource, ElementTable, PubChemPeriodicTable,
};
use crate::DBhandlers::pubchem_api::{CompoundLookup, CompoundRecord, HttpClient, PubChemClient};
use crate::error::{ChemCalcError, StartupError};
use crate::settings::{AppConfig, ElementSourceKind};
use log::{info, warn};
use reqwest::blocking::Client;

pub const CUSTOM_COMPOUND: &str = "Custom Compound";

/// compound whose molar mass is offered as the default for solution preparation
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCompound {
    pub name: String,
    pub molar_mass: f64,
}

pub struct Session<L: CompoundLookup> {
    compounds: L,
    elements: ElementSource,
    saved: Option<SavedCompound>,
}

/// Builds the element source named in the configuration. Fails when the source cannot be loaded.
pub fn load_element_source<C: HttpClient>(
    kind: &ElementSourceKind,
    client: &C,
    base_url: &str,
) -> Result<ElementSource, ElementDataError> {
    let source: ElementSource = match kind {
        ElementSourceKind::Builtin => ElementTable::builtin().into(),
        ElementSourceKind::Pubchem => PubChemPeriodicTable::fetch(client, base_url)?.into(),
        ElementSourceKind::File(path) => ElementTable::from_json_file(path)?.into(),
    };
    info!(
        "Element data: {} ({} elements)",
        source.source_name(),
        source.len()
    );
    Ok(source)
}

impl Session<PubChemClient<Client>> {
    /// PubChem-backed session; loading the element data happens here, before any interaction
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let pubchem = PubChemClient::with_timeout(config.timeout_secs)?
            .base_url(&config.pubchem_base_url)
            .image_size(config.image_size)
            .max_synonyms(config.max_synonyms);
        let elements = load_element_source(
            &config.element_source,
            pubchem.http_client(),
            pubchem.base(),
        )?;
        Ok(Session::new(pubchem, elements))
    }
}

impl<L: CompoundLookup> Session<L> {
    pub fn new(compounds: L, elements: ElementSource) -> Self {
        Self {
            compounds,
            elements,
            saved: None,
        }
    }

    pub fn elements(&self) -> &ElementSource {
        &self.elements
    }

    pub fn saved(&self) -> Option<&SavedCompound> {
        self.saved.as_ref()
    }

    pub fn saved_name(&self) -> &str {
        self.saved
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or(CUSTOM_COMPOUND)
    }

    /// saved molar mass, 0.0 when nothing was saved yet
    pub fn default_molar_mass(&self) -> f64 {
        self.saved.as_ref().map(|s| s.molar_mass).unwrap_or(0.0)
    }

    fn save(&mut self, name: &str, molar_mass: f64) {
        self.saved = Some(SavedCompound {
            name: name.to_string(),
            molar_mass,
        });
    }

    /// Compound search by name, then by formula. Saves the compound on success.
    pub fn search_compound(&mut self, query: &str) -> Result<CompoundRecord, ChemCalcError> {
        match self.compounds.lookup(query) {
            Ok(Some(record)) => {
                self.save(&record.preferred_name, record.molar_mass);
                Ok(record)
            }
            Ok(None) => Err(ChemCalcError::NotFound(query.trim().to_string())),
            Err(e) => {
                warn!("Compound lookup for '{}' failed: {}", query, e);
                Err(e.into())
            }
        }
    }

    /// Molar mass of a formula from the session's element data. Saves the formula on success.
    pub fn molar_mass(&mut self, formula: &str) -> Result<MolarMass, ChemCalcError> {
        let result = compute_molar_mass(formula, &self.elements)?;
        self.save(&result.formula, result.total_mass);
        Ok(result)
    }

    /// `molar_mass: None` uses the saved molar mass
    pub fn prepare_solution(
        &self,
        molar_mass: Option<f64>,
        molarity: f64,
        volume_ml: f64,
    ) -> Result<SolutionRecipe, ChemCalcError> {
        let molar_mass = molar_mass.unwrap_or_else(|| self.default_molar_mass());
        let recipe = SolutionRequest::new(molar_mass, molarity, volume_ml).compute()?;
        Ok(recipe)
    }
}
