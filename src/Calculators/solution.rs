//! Mass of solute needed to prepare a solution of given molarity and volume
//!
//! mass [g] = molarity [mol/L] * volume [mL] / 1000 * molar mass [g/mol]
use log::warn;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolutionError {
    #[error("Please enter a valid Molar Mass first")]
    MissingMolarMass,
}

impl SolutionError {
    pub fn hint(&self) -> &'static str {
        match self {
            SolutionError::MissingMolarMass => {
                "Enter a positive molar mass, or compute it from a formula or a compound search first."
            }
        }
    }
}

/// Grams of solute for `molarity` mol/L in `volume_ml` mL of a compound of `molar_mass` g/mol.
/// Only the molar mass is validated; molarity and volume are used as given.
pub fn compute_solute_mass(
    molar_mass: f64,
    molarity: f64,
    volume_ml: f64,
) -> Result<f64, SolutionError> {
    if !(molar_mass > 0.0) {
        return Err(SolutionError::MissingMolarMass);
    }
    if molarity < 0.0 || volume_ml < 0.0 {
        warn!(
            "Negative input: molarity {} M, volume {} mL; result is not physical",
            molarity, volume_ml
        );
    }
    Ok(molarity * (volume_ml / 1000.0) * molar_mass)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolutionRequest {
    pub molar_mass: f64,
    pub molarity: f64,
    pub volume_ml: f64,
}

impl SolutionRequest {
    pub fn new(molar_mass: f64, molarity: f64, volume_ml: f64) -> Self {
        Self {
            molar_mass,
            molarity,
            volume_ml,
        }
    }

    pub fn compute(&self) -> Result<SolutionRecipe, SolutionError> {
        let grams = compute_solute_mass(self.molar_mass, self.molarity, self.volume_ml)?;
        Ok(SolutionRecipe {
            request: self.clone(),
            grams,
        })
    }
}

/// what to weigh and how to dissolve it
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionRecipe {
    pub request: SolutionRequest,
    pub grams: f64,
}

impl SolutionRecipe {
    pub fn headline(&self) -> String {
        format!("Result: Weigh out {:.3} grams", self.grams)
    }

    pub fn instruction(&self) -> String {
        format!(
            "Dissolve this amount in {} mL of solvent to get a {} M solution.",
            self.request.volume_ml, self.request.molarity
        )
    }
}

impl fmt::Display for SolutionRecipe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n{}", self.headline(), self.instruction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_glucose_solution() {
        let grams = compute_solute_mass(180.156, 0.5, 500.0).unwrap();
        assert_relative_eq!(grams, 45.039, epsilon = 1e-9);
        assert_eq!(format!("{:.3}", grams), "45.039");
    }

    #[test]
    fn test_missing_molar_mass() {
        assert_eq!(
            compute_solute_mass(0.0, 0.5, 500.0),
            Err(SolutionError::MissingMolarMass)
        );
        assert_eq!(
            compute_solute_mass(-18.0, 0.5, 500.0),
            Err(SolutionError::MissingMolarMass)
        );
        assert_eq!(
            compute_solute_mass(f64::NAN, 0.5, 500.0),
            Err(SolutionError::MissingMolarMass)
        );
    }

    #[test]
    fn test_molarity_and_volume_accepted_as_given() {
        assert_eq!(compute_solute_mass(58.44, 0.0, 250.0), Ok(0.0));
        assert_eq!(compute_solute_mass(58.44, 1.0, 0.0), Ok(0.0));
        let grams = compute_solute_mass(58.44, -1.0, 1000.0).unwrap();
        assert_relative_eq!(grams, -58.44, epsilon = 1e-12);
        // no upper bound
        let grams = compute_solute_mass(1000.0, 10.0, 1.0e6).unwrap();
        assert_relative_eq!(grams, 1.0e7, epsilon = 1e-6);
    }

    #[test]
    fn test_recipe_text() {
        let recipe = SolutionRequest::new(180.156, 0.5, 500.0).compute().unwrap();
        assert_eq!(recipe.headline(), "Result: Weigh out 45.039 grams");
        assert_eq!(
            recipe.instruction(),
            "Dissolve this amount in 500 mL of solvent to get a 0.5 M solution."
        );
        assert_eq!(
            recipe.to_string(),
            "Result: Weigh out 45.039 grams\nDissolve this amount in 500 mL of solvent to get a 0.5 M solution."
        );
        assert!(SolutionRequest::new(0.0, 0.5, 500.0).compute().is_err());
    }
}
