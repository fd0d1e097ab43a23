use crate::error::{PdevolveError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bit-string strategy encoding for one Prisoner's Dilemma player.
///
/// A genome is an ordered, fixed-length sequence of bits. How the bits map
/// to cooperate/defect decisions during tournament play is the scoring
/// collaborator's business; the breeder only recombines and flips them.
/// `true` is the cooperating value.
///
/// Genomes are value types: `mutate` and `crossover` return fresh genomes
/// and never touch their inputs, so a population under breeding can keep
/// borrowing parents while children are assembled. Length is fixed at
/// construction and preserved by every operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    bits: Vec<bool>,
}

impl Genome {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Uniform random strategy, used to seed generation zero
    pub fn random<R: Rng>(length: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..length).map(|_| rng.gen::<bool>()).collect(),
        }
    }

    /// The fixed fallback strategy: cooperate in every situation
    pub fn always_cooperate(length: usize) -> Self {
        Self {
            bits: vec![true; length],
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bit(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Fraction of cooperating bits, in [0, 1]. Drives display colors only.
    pub fn cooperation_ratio(&self) -> f64 {
        if self.bits.is_empty() {
            return 0.0;
        }
        let cooperating = self.bits.iter().filter(|&&b| b).count();
        cooperating as f64 / self.bits.len() as f64
    }

    /// Number of positions where `self` and `other` disagree
    pub fn hamming_distance(&self, other: &Genome) -> usize {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Per-bit mutation: each bit flips independently with probability `rate`
    pub fn mutate<R: Rng>(&self, rate: f64, rng: &mut R) -> Genome {
        let bits = self
            .bits
            .iter()
            .map(|&bit| if rng.gen::<f64>() < rate { !bit } else { bit })
            .collect();
        Genome { bits }
    }

    /// Single-point crossover: swap tails at a random interior split point.
    ///
    /// Both parents must have the same length; a mismatch is a precondition
    /// failure. Genomes of length <= 1 have no interior point and the
    /// parents are cloned unchanged.
    pub fn crossover<R: Rng>(&self, other: &Genome, rng: &mut R) -> Result<(Genome, Genome)> {
        if self.len() != other.len() {
            return Err(PdevolveError::GenomeLengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }

        let len = self.len();
        if len <= 1 {
            return Ok((self.clone(), other.clone()));
        }

        let point = rng.gen_range(1..len);

        let mut child1 = self.bits.clone();
        let mut child2 = other.bits.clone();
        child1[point..].copy_from_slice(&other.bits[point..]);
        child2[point..].copy_from_slice(&self.bits[point..]);

        Ok((Genome { bits: child1 }, Genome { bits: child2 }))
    }
}
