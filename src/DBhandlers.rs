/// atomic weights: built-in table, user JSON file or PubChem periodic table
pub mod element_data;

pub mod pubchem_api;
