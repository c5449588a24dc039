//! # PubChem Compound Lookup Module
//!
//! ## Aim
//! Resolves a free-text chemical identifier (common name or formula) against the PubChem PUG REST
//! service (https://pubchem.ncbi.nlm.nih.gov/rest/pug) and returns a canonical compound record.
//!
//! ## Main Data Structures and Logic
//! - `HttpClient`: HTTP trait for dependency injection (enables mocking in tests)
//! - `CompoundLookup`: the lookup capability the rest of the tool depends on
//! - `PubChemClient<C>`: PUG REST implementation generic over the HTTP client
//! - `CompoundRecord`: name, formula, molar mass, synonyms, CID and image URL
//!
//! ## Lookup order
//! 1. `compound/name/{query}/property/...` (common name)
//! 2. if nothing was found: `compound/fastformula/{query}/property/...` (molecular formula)
//! 3. for the first hit: `compound/cid/{cid}/synonyms` (first `max_synonyms` kept)
//!
//! Nothing found by both searches is a normal outcome (`Ok(None)`), not an error.
//!
//! ## Usage
//! ```rust, ignore
//! let pubchem = PubChemClient::default();
//! if let Some(record) = pubchem.lookup("Aspirin")? {
//!     println!("{} {} {:.3}", record.preferred_name, record.formula, record.molar_mass);
//! }
//! ```

use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const PUBCHEM_REST_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
pub const PUBCHEM_IMAGE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/image/imagefly.cgi";
const PROPERTIES: &str = "IUPACName,MolecularFormula,MolecularWeight";
const UNKNOWN_NAME: &str = "Unknown Name";
const NO_SYNONYMS: &str = "No common synonyms found";

/// error types for the PubChem client
#[derive(Debug, Error)]
pub enum PubChemError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),
    #[error("Compound not found")]
    NotFound,
    #[error("Request rejected by PubChem")]
    BadRequest,
    #[error("PubChem answered with HTTP status {0}")]
    Status(u16),
    #[error("Invalid data format: {0}")]
    InvalidDataFormat(String),
}

impl From<serde_json::Error> for PubChemError {
    fn from(e: serde_json::Error) -> Self {
        PubChemError::InvalidDataFormat(e.to_string())
    }
}

/// HTTP client trait for dependency injection
pub trait HttpClient {
    fn get_text(&self, url: &str) -> Result<String, PubChemError>;
}

// Implementation for the real reqwest client
impl HttpClient for Client {
    fn get_text(&self, url: &str) -> Result<String, PubChemError> {
        let response = self.get(url).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(PubChemError::NotFound),
            StatusCode::BAD_REQUEST => Err(PubChemError::BadRequest),
            status if !status.is_success() => Err(PubChemError::Status(status.as_u16())),
            _ => Ok(response.text()?),
        }
    }
}

/// Canonical compound data returned by a lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub preferred_name: String,
    pub formula: String,
    /// g/mol
    pub molar_mass: f64,
    pub synonyms: Vec<String>,
    /// PubChem CID
    pub identifier: String,
    pub image_reference: String,
}

impl CompoundRecord {
    pub fn synonyms_line(&self) -> String {
        self.synonyms.join(", ")
    }
}

/// Compound Lookup capability: name first, formula second, `None` when both miss.
pub trait CompoundLookup {
    fn lookup(&self, query: &str) -> Result<Option<CompoundRecord>, PubChemError>;
}

////////////////////////////////////RESPONSE FORMAT//////////////////////////////////////////////
#[derive(Debug, Deserialize)]
struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties", default)]
    properties: Vec<CompoundProperties>,
}

/// PubChem reports MolecularWeight as a string in recent API versions and as a number in older ones
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WeightValue {
    Number(f64),
    Text(String),
}

impl WeightValue {
    fn as_f64(&self) -> Result<f64, PubChemError> {
        match self {
            WeightValue::Number(value) => Ok(*value),
            WeightValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                PubChemError::InvalidDataFormat(format!("molecular weight '{}'", text))
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CompoundProperties {
    #[serde(rename = "CID")]
    cid: u64,
    #[serde(rename = "MolecularFormula", default)]
    molecular_formula: Option<String>,
    #[serde(rename = "MolecularWeight")]
    molecular_weight: Option<WeightValue>,
    #[serde(rename = "IUPACName", default)]
    iupac_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SynonymResponse {
    #[serde(rename = "InformationList")]
    information_list: InformationList,
}

#[derive(Debug, Deserialize)]
struct InformationList {
    #[serde(rename = "Information", default)]
    information: Vec<SynonymInformation>,
}

#[derive(Debug, Deserialize)]
struct SynonymInformation {
    #[serde(rename = "Synonym", default)]
    synonym: Vec<String>,
}

/// which PubChem namespace the query is searched in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchNamespace {
    Name,
    Formula,
}

impl SearchNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchNamespace::Name => "name",
            // fastformula answers synchronously, plain formula search returns a ListKey to poll
            SearchNamespace::Formula => "fastformula",
        }
    }
}

pub struct PubChemClient<C: HttpClient> {
    client: C,
    base_url: String,
    image_size: u32,
    max_synonyms: usize,
}

impl Default for PubChemClient<Client> {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

impl PubChemClient<Client> {
    /// reqwest client with a request timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, PubChemError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self::with_client(client))
    }
}

impl<C: HttpClient> PubChemClient<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            base_url: PUBCHEM_REST_URL.to_string(),
            image_size: 400,
            max_synonyms: 5,
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn image_size(mut self, image_size: u32) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn max_synonyms(mut self, max_synonyms: usize) -> Self {
        self.max_synonyms = max_synonyms;
        self
    }

    pub fn http_client(&self) -> &C {
        &self.client
    }

    pub fn base(&self) -> &str {
        &self.base_url
    }

    ///////////////////////////////////URLS////////////////////////////////////////////////
    fn rest_url(&self, segments: &[&str]) -> Result<Url, PubChemError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| PubChemError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn property_url(&self, namespace: SearchNamespace, query: &str) -> Result<Url, PubChemError> {
        self.rest_url(&[
            "compound",
            namespace.as_str(),
            query,
            "property",
            PROPERTIES,
            "JSON",
        ])
    }

    pub fn synonyms_url(&self, cid: u64) -> Result<Url, PubChemError> {
        self.rest_url(&["compound", "cid", &cid.to_string(), "synonyms", "JSON"])
    }

    pub fn image_url(&self, cid: u64) -> String {
        format!(
            "{}?cid={}&width={}&height={}",
            PUBCHEM_IMAGE_URL, cid, self.image_size, self.image_size
        )
    }

    ///////////////////////////////////REQUESTS////////////////////////////////////////////
    /// first compound matching the query in the namespace, `None` when PubChem has no match
    fn search(
        &self,
        namespace: SearchNamespace,
        query: &str,
    ) -> Result<Option<CompoundProperties>, PubChemError> {
        let url = self.property_url(namespace, query)?;
        debug!("PubChem request: {}", url);
        let body = match self.client.get_text(url.as_str()) {
            Ok(body) => body,
            Err(PubChemError::NotFound) => return Ok(None),
            // a common name is not a valid formula and vice versa
            Err(PubChemError::BadRequest) => return Ok(None),
            Err(e) => return Err(e),
        };
        let response: PropertyResponse = serde_json::from_str(&body)?;
        Ok(response.property_table.properties.into_iter().next())
    }

    fn fetch_synonyms(&self, cid: u64) -> Result<Vec<String>, PubChemError> {
        let url = self.synonyms_url(cid)?;
        let body = match self.client.get_text(url.as_str()) {
            Ok(body) => body,
            Err(PubChemError::NotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let response: SynonymResponse = serde_json::from_str(&body)?;
        Ok(response
            .information_list
            .information
            .into_iter()
            .next()
            .map(|info| info.synonym)
            .unwrap_or_default())
    }

    fn to_record(&self, properties: CompoundProperties) -> Result<CompoundRecord, PubChemError> {
        let molar_mass = properties
            .molecular_weight
            .as_ref()
            .ok_or_else(|| PubChemError::InvalidDataFormat("missing molecular weight".to_string()))?
            .as_f64()?;

        let mut synonyms = match self.fetch_synonyms(properties.cid) {
            Ok(synonyms) => synonyms,
            Err(e) => {
                warn!("Synonyms of CID {} unavailable: {}", properties.cid, e);
                Vec::new()
            }
        };
        synonyms.truncate(self.max_synonyms);
        if synonyms.is_empty() {
            synonyms.push(NO_SYNONYMS.to_string());
        }

        Ok(CompoundRecord {
            preferred_name: properties
                .iupac_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            formula: properties.molecular_formula.unwrap_or_default(),
            molar_mass,
            synonyms,
            identifier: properties.cid.to_string(),
            image_reference: self.image_url(properties.cid),
        })
    }
}

impl<C: HttpClient> CompoundLookup for PubChemClient<C> {
    fn lookup(&self, query: &str) -> Result<Option<CompoundRecord>, PubChemError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        info!("Searching PubChem for '{}'", query);
        let found = match self.search(SearchNamespace::Name, query)? {
            Some(properties) => Some(properties),
            None => {
                debug!("No name match for '{}', trying formula search", query);
                self.search(SearchNamespace::Formula, query)?
            }
        };
        match found {
            Some(properties) => {
                let record = self.to_record(properties)?;
                info!(
                    "Found {} (CID {}), {} g/mol",
                    record.preferred_name, record.identifier, record.molar_mass
                );
                Ok(Some(record))
            }
            None => {
                info!("'{}' not found in PubChem", query);
                Ok(None)
            }
        }
    }
}
