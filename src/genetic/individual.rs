use crate::genetic::genome::Genome;
use serde::{Deserialize, Serialize};

/// One generation's worth of players. Fixed size for the lifetime of a run;
/// ordering only matters for pairing during crossover.
pub type Population = Vec<Individual>;

/// A strategy genome paired with its tournament fitness.
///
/// Scores are assigned by the external scoring collaborator between breeding
/// calls; a freshly bred individual starts at 0. The color is derived from
/// the genome for display surfaces and carries no meaning in breeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    genome: Genome,
    score: f64,
    color: [u8; 3],
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        let color = derive_color(&genome);
        Self {
            genome,
            score: 0.0,
            color,
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Set by the scoring collaborator once tournament play is done
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Zeroes the score of an individual carried forward unscored
    pub fn reset_score(&mut self) {
        self.score = 0.0;
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }
}

// Cooperators shade toward blue, defectors toward red.
fn derive_color(genome: &Genome) -> [u8; 3] {
    let ratio = genome.cooperation_ratio();
    let blue = (ratio * 255.0).round() as u8;
    let red = 255 - blue;
    [red, 0, blue]
}
