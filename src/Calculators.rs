/// Module to calculate the atomic composition and molar mass of a chemical formula
///
///  # Examples
/// ```
/// use ChemCalc::Calculators::molmass::compute_molar_mass;
/// use ChemCalc::DBhandlers::element_data::ElementTable;
/// let elements = ElementTable::builtin();
/// let result = compute_molar_mass("C6H12O6", &elements).unwrap();
/// assert_eq!(format!("{:.3}", result.total_mass), "180.156");
/// for line in &result.breakdown {
///     println!("{} x {} ({:.2})", line.count, line.symbol, line.atomic_weight);
/// }
/// ```
///
pub mod molmass;
/// eng
/// Mass of solute required to prepare a solution: molarity (mol/L) and volume (mL) of the solution
/// and molar mass (g/mol) of the solute give the grams to weigh out.
///
///  # Examples
/// ```
/// use ChemCalc::Calculators::solution::compute_solute_mass;
/// let grams = compute_solute_mass(180.156, 0.5, 500.0).unwrap();
/// assert_eq!(format!("{:.3}", grams), "45.039");
/// ```
pub mod solution;
