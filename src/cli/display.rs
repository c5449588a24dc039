use crate::Calculators::molmass::MolarMass;
use crate::DBhandlers::pubchem_api::CompoundRecord;
use crate::settings::AppConfig;
use prettytable::{Cell, Row, Table, row};

/// compound card: name, formula, molar mass, CID, synonyms and image link
pub fn compound_table(record: &CompoundRecord) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Name", record.preferred_name]);
    table.add_row(row!["Molecular Formula", record.formula]);
    table.add_row(row!["Molar Mass", format!("{} g/mol", record.molar_mass)]);
    table.add_row(row!["PubChem CID", record.identifier]);
    table.add_row(row!["Alternative Names", record.synonyms_line()]);
    table.add_row(row!["Image", record.image_reference]);
    table
}

/// one row per token in formula order, then the total
pub fn breakdown_table(result: &MolarMass) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Count"),
        Cell::new("Element"),
        Cell::new("Atomic weight"),
        Cell::new("Subtotal, g/mol"),
    ]));
    for line in &result.breakdown {
        table.add_row(Row::new(vec![
            Cell::new(&line.count.to_string()),
            Cell::new(&line.symbol),
            Cell::new(&format!("{:.2}", line.atomic_weight)),
            Cell::new(&format!("{:.3}", line.mass())),
        ]));
    }
    table.add_row(Row::new(vec![
        Cell::new("Total"),
        Cell::new(""),
        Cell::new(""),
        Cell::new(&format!("{:.3}", result.total_mass)),
    ]));
    table
}

pub fn settings_table(config: &AppConfig) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Setting", "Value"]);
    for (key, value) in config.entries() {
        table.add_row(Row::new(vec![Cell::new(key), Cell::new(&value)]));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Calculators::molmass::compute_molar_mass;
    use crate::DBhandlers::element_data::ElementTable;

    #[test]
    fn test_breakdown_table() {
        let result = compute_molar_mass("C6H12O6", &ElementTable::builtin()).unwrap();
        let table = breakdown_table(&result);
        // header + 3 tokens + total
        assert_eq!(table.len(), 5);
        let text = table.to_string();
        assert!(text.contains("12.01"));
        assert!(text.contains("72.066"));
        assert!(text.contains("180.156"));
    }

    #[test]
    fn test_compound_table() {
        let record = CompoundRecord {
            preferred_name: "sulfuric acid".to_string(),
            formula: "H2O4S".to_string(),
            molar_mass: 98.08,
            synonyms: vec!["oil of vitriol".to_string(), "H2SO4".to_string()],
            identifier: "1118".to_string(),
            image_reference: "https://example.org/1118.png".to_string(),
        };
        let text = compound_table(&record).to_string();
        assert!(text.contains("98.08 g/mol"));
        assert!(text.contains("oil of vitriol, H2SO4"));
        assert!(text.contains("1118"));
    }

    #[test]
    fn test_settings_table() {
        let table = settings_table(&AppConfig::default());
        assert_eq!(table.len(), 8);
        assert!(table.to_string().contains("builtin"));
    }
}
