use crate::error::PdevolveError;
use serde::{Deserialize, Serialize};

/// Knobs for one generational step. Immutable while a `breed` call runs;
/// a caller may swap in a new config between generations.
///
/// `selection_method` is an integer code so external callers can wire it
/// straight from whatever front end drives the run: 0 = threshold
/// best-or-random, 1 = fitness-proportionate with elitism, 2 = tournament.
/// Any other code selects the always-cooperate fallback population.
/// `selection_parameter` is method-dependent: the percentage threshold for
/// method 0, the elite count for method 1, the tournament size for method 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreederConfig {
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub selection_method: i32,
    pub selection_parameter: i32,
    pub rng_seed: Option<u64>,
}

impl Default for BreederConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.001,
            crossover_rate: 0.95,
            selection_method: 0,
            selection_parameter: 1,
            rng_seed: None,
        }
    }
}

impl BreederConfig {
    pub fn validate(&self) -> Result<(), PdevolveError> {
        if self.mutation_rate < 0.0 || self.mutation_rate > 1.0 {
            return Err(PdevolveError::InvalidConfiguration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.crossover_rate < 0.0 || self.crossover_rate > 1.0 {
            return Err(PdevolveError::InvalidConfiguration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if self.selection_parameter < 0 {
            return Err(PdevolveError::InvalidConfiguration(
                "Selection parameter must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
