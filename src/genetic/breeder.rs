use crate::config::BreederConfig;
use crate::error::{PdevolveError, Result};
use crate::genetic::individual::{Individual, Population};
use crate::genetic::observer::PopulationObserver;
use crate::genetic::selection::SelectionStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Evolves a population of Prisoner's Dilemma strategies one generation at
/// a time.
///
/// The caller hands in a scored population, the breeder hands back the next
/// generation: selection, then pairwise crossover and per-bit mutation over
/// the selected parents. Scoring happens outside, between calls.
///
/// The breeder owns the run's single RNG stream. Seeded construction makes
/// a whole run reproducible; every stochastic decision in selection,
/// crossover, and mutation draws from the one stream and it is never
/// re-created mid-run. Reconfiguring with an explicit seed re-seeds the
/// stream, which is only safe between generations.
pub struct Breeder {
    config: BreederConfig,
    rng: StdRng,
    current: Population,
    observer: Option<Box<dyn PopulationObserver>>,
}

impl Breeder {
    pub fn new(config: BreederConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            current: Vec::new(),
            observer: None,
        })
    }

    pub fn config(&self) -> &BreederConfig {
        &self.config
    }

    /// Replace the configuration between generations. Re-seeds the owned
    /// RNG stream only when the new config carries an explicit seed.
    pub fn set_config(&mut self, config: BreederConfig) -> Result<()> {
        config.validate()?;
        if let Some(seed) = config.rng_seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.config = config;
        Ok(())
    }

    pub fn set_observer(&mut self, observer: Box<dyn PopulationObserver>) {
        self.observer = Some(observer);
    }

    /// The most recently bred generation, empty before the first breed
    pub fn current(&self) -> &[Individual] {
        &self.current
    }

    /// Drop the retained population, releasing the population-size lock so
    /// a differently sized run can follow
    pub fn clear(&mut self) {
        self.current.clear();
        if let Some(observer) = self.observer.as_mut() {
            observer.population_changed(&self.current);
        }
    }

    /// Breed the next generation from a scored population.
    ///
    /// Every individual's score must already reflect completed tournament
    /// play. On success the retained current population is replaced, the
    /// observer (if any) is notified, and the new generation is returned.
    /// On a precondition failure nothing is retained and no observer fires.
    pub fn breed(&mut self, population: Population) -> Result<Population> {
        let n = population.len();
        if n == 0 {
            return Err(PdevolveError::InvalidPopulationSize(
                "Population must contain at least one individual".to_string(),
            ));
        }
        if !self.current.is_empty() && self.current.len() != n {
            return Err(PdevolveError::InvalidPopulationSize(format!(
                "Population size changed from {} to {} mid-run",
                self.current.len(),
                n
            )));
        }
        let genome_length = population[0].genome().len();
        for individual in &population {
            if individual.genome().len() != genome_length {
                return Err(PdevolveError::GenomeLengthMismatch {
                    expected: genome_length,
                    actual: individual.genome().len(),
                });
            }
        }

        let strategy = SelectionStrategy::from_code(self.config.selection_method);
        let mut next = strategy.select(&population, self.config.selection_parameter, &mut self.rng);

        // Fitness-proportionate elites are germ line: exempt from crossover
        // and mutation, carried forward with their score zeroed out.
        let cross_start = if strategy == SelectionStrategy::FitnessProportionate {
            let elite_count = (self.config.selection_parameter as usize).min(n);
            for elite in &mut next[..elite_count] {
                elite.reset_score();
            }
            elite_count
        } else {
            0
        };

        let mut index = cross_start;
        while index < n {
            if index + 1 >= n {
                // Odd remainder: mutate the last parent alone
                let genome = next[index]
                    .genome()
                    .mutate(self.config.mutation_rate, &mut self.rng);
                next[index] = Individual::new(genome);
            } else {
                let (first, second) = if self.rng.gen::<f64>() < self.config.crossover_rate {
                    next[index]
                        .genome()
                        .crossover(next[index + 1].genome(), &mut self.rng)?
                } else {
                    (next[index].genome().clone(), next[index + 1].genome().clone())
                };
                let first = first.mutate(self.config.mutation_rate, &mut self.rng);
                let second = second.mutate(self.config.mutation_rate, &mut self.rng);
                next[index] = Individual::new(first);
                next[index + 1] = Individual::new(second);
            }
            index += 2;
        }

        log::debug!(
            "bred generation of {} individuals with {:?} selection",
            n,
            strategy
        );

        self.current = next.clone();
        if let Some(observer) = self.observer.as_mut() {
            observer.population_changed(&self.current);
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic::genome::Genome;
    use crate::genetic::observer::ChannelObserver;

    fn config(method: i32, param: i32, mutation: f64, crossover: f64, seed: u64) -> BreederConfig {
        BreederConfig {
            mutation_rate: mutation,
            crossover_rate: crossover,
            selection_method: method,
            selection_parameter: param,
            rng_seed: Some(seed),
        }
    }

    fn random_population(size: usize, genome_length: usize, seed: u64) -> Population {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..size)
            .map(|_| {
                let mut individual = Individual::new(Genome::random(genome_length, &mut rng));
                individual.set_score(rng.gen_range(1.0..100.0));
                individual
            })
            .collect()
    }

    #[test]
    fn test_breed_preserves_size_and_genome_length() {
        let mut breeder = Breeder::new(config(0, 50, 0.01, 0.9, 1)).unwrap();
        let population = random_population(21, 71, 2);
        let next = breeder.breed(population).unwrap();

        assert_eq!(next.len(), 21);
        for individual in &next {
            assert_eq!(individual.genome().len(), 71);
        }
    }

    #[test]
    fn test_fixed_seed_breeds_identically() {
        let population = random_population(16, 40, 3);

        let mut first = Breeder::new(config(2, 3, 0.02, 0.8, 42)).unwrap();
        let mut second = Breeder::new(config(2, 3, 0.02, 0.8, 42)).unwrap();

        let bred_first = first.breed(population.clone()).unwrap();
        let bred_second = second.breed(population).unwrap();
        assert_eq!(bred_first, bred_second);
    }

    #[test]
    fn test_elites_survive_unchanged_with_operators_off() {
        let mut breeder = Breeder::new(config(1, 3, 0.0, 0.0, 7)).unwrap();
        let population = random_population(10, 32, 8);

        let mut by_score: Vec<&Individual> = population.iter().collect();
        by_score.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap());
        let top_genomes: Vec<Genome> =
            by_score.iter().take(3).map(|i| i.genome().clone()).collect();

        let next = breeder.breed(population).unwrap();

        for (elite, expected) in next.iter().take(3).zip(&top_genomes) {
            assert_eq!(elite.genome(), expected);
            assert_eq!(elite.score(), 0.0);
        }
    }

    #[test]
    fn test_unrecognized_method_breeds_always_cooperate() {
        // Operators off so the fallback genomes pass through untouched
        let mut breeder = Breeder::new(config(99, 0, 0.0, 0.0, 9)).unwrap();
        let population = random_population(6, 24, 10);
        let next = breeder.breed(population).unwrap();

        let expected = Genome::always_cooperate(24);
        for individual in &next {
            assert_eq!(individual.genome(), &expected);
        }
    }

    #[test]
    fn test_no_crossover_means_children_are_clones_of_parents() {
        // Random selection, operators off: every output genome must equal
        // some input genome
        let mut breeder = Breeder::new(config(0, 0, 0.0, 0.0, 11)).unwrap();
        let population = random_population(12, 30, 12);
        let input_genomes: Vec<Genome> =
            population.iter().map(|i| i.genome().clone()).collect();

        let next = breeder.breed(population).unwrap();
        for individual in &next {
            assert!(input_genomes.contains(individual.genome()));
        }
    }

    #[test]
    fn test_mutation_load_matches_binomial_expectation() {
        // Best-wins-all selection with no crossover: every child is the
        // best genome plus independent per-bit flips. Total flips over
        // 50 genomes of 100 bits at rate 0.1 is Binomial(5000, 0.1);
        // mean 500, sd ~21, so [350, 650] is over 7 sigma wide.
        let mut breeder = Breeder::new(config(0, 100, 0.1, 0.0, 13)).unwrap();
        let mut population = random_population(50, 100, 14);
        for individual in &mut population {
            individual.set_score(1.0);
        }
        population[20].set_score(50.0);
        let best = population[20].genome().clone();

        let next = breeder.breed(population).unwrap();
        let total_flips: usize = next
            .iter()
            .map(|i| i.genome().hamming_distance(&best))
            .sum();
        assert!(
            (350..=650).contains(&total_flips),
            "total flips {} outside binomial expectation",
            total_flips
        );
    }

    #[test]
    fn test_rejects_empty_population() {
        let mut breeder = Breeder::new(config(0, 50, 0.01, 0.9, 15)).unwrap();
        assert!(matches!(
            breeder.breed(Vec::new()),
            Err(PdevolveError::InvalidPopulationSize(_))
        ));
    }

    #[test]
    fn test_rejects_population_size_change_mid_run() {
        let mut breeder = Breeder::new(config(0, 50, 0.01, 0.9, 16)).unwrap();
        breeder.breed(random_population(10, 20, 17)).unwrap();

        let result = breeder.breed(random_population(12, 20, 18));
        assert!(matches!(
            result,
            Err(PdevolveError::InvalidPopulationSize(_))
        ));
        // Retained population is untouched by the failed call
        assert_eq!(breeder.current().len(), 10);
    }

    #[test]
    fn test_rejects_mixed_genome_lengths() {
        let mut breeder = Breeder::new(config(0, 50, 0.01, 0.9, 19)).unwrap();
        let mut population = random_population(4, 20, 20);
        population[2] = Individual::new(Genome::always_cooperate(21));

        assert!(matches!(
            breeder.breed(population),
            Err(PdevolveError::GenomeLengthMismatch {
                expected: 20,
                actual: 21
            })
        ));
        assert!(breeder.current().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config_at_construction() {
        let mut bad = config(0, 50, 0.01, 0.9, 21);
        bad.mutation_rate = 2.0;
        assert!(matches!(
            Breeder::new(bad),
            Err(PdevolveError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_set_config_rejects_invalid_and_keeps_old() {
        let mut breeder = Breeder::new(config(0, 50, 0.01, 0.9, 22)).unwrap();
        let mut bad = config(1, 2, 0.01, 0.9, 23);
        bad.crossover_rate = -1.0;

        assert!(breeder.set_config(bad).is_err());
        assert_eq!(breeder.config().selection_method, 0);
    }

    #[test]
    fn test_set_config_without_seed_keeps_stream_running() {
        let population = random_population(8, 16, 24);

        let mut reconfigured = Breeder::new(config(0, 30, 0.05, 0.9, 25)).unwrap();
        let mut untouched = Breeder::new(config(0, 30, 0.05, 0.9, 25)).unwrap();

        let first_a = reconfigured.breed(population.clone()).unwrap();
        let first_b = untouched.breed(population.clone()).unwrap();
        assert_eq!(first_a, first_b);

        // Same knobs, no seed: the stream must keep running undisturbed
        let mut same_knobs = config(0, 30, 0.05, 0.9, 0);
        same_knobs.rng_seed = None;
        reconfigured.set_config(same_knobs).unwrap();

        let second_a = reconfigured.breed(first_a).unwrap();
        let second_b = untouched.breed(first_b).unwrap();
        assert_eq!(second_a, second_b);
    }

    #[test]
    fn test_set_config_with_seed_restarts_stream() {
        let population = random_population(8, 16, 26);

        let mut breeder = Breeder::new(config(0, 30, 0.05, 0.9, 27)).unwrap();
        let first = breeder.breed(population.clone()).unwrap();

        breeder.clear();
        breeder.set_config(config(0, 30, 0.05, 0.9, 27)).unwrap();
        let replayed = breeder.breed(population).unwrap();
        assert_eq!(first, replayed);
    }

    #[test]
    fn test_observer_receives_each_generation() {
        let (sender, receiver) = std::sync::mpsc::channel();
        let mut breeder = Breeder::new(config(0, 50, 0.01, 0.9, 28)).unwrap();
        breeder.set_observer(Box::new(ChannelObserver::new(sender)));

        let next = breeder.breed(random_population(9, 20, 29)).unwrap();

        let update = receiver.try_recv().unwrap();
        assert_eq!(update.individuals.len(), 9);
        assert_eq!(update.individuals, next);
    }

    #[test]
    fn test_clear_releases_size_lock() {
        let mut breeder = Breeder::new(config(0, 50, 0.01, 0.9, 30)).unwrap();
        breeder.breed(random_population(10, 20, 31)).unwrap();
        assert_eq!(breeder.current().len(), 10);

        breeder.clear();
        assert!(breeder.current().is_empty());

        // A differently sized run is fine after a clear
        assert!(breeder.breed(random_population(6, 20, 32)).is_ok());
    }

    #[test]
    fn test_odd_population_mutates_trailing_individual() {
        let mut breeder = Breeder::new(config(0, 0, 0.0, 1.0, 33)).unwrap();
        let population = random_population(7, 18, 34);
        let next = breeder.breed(population).unwrap();
        assert_eq!(next.len(), 7);
        assert_eq!(next[6].genome().len(), 18);
    }
}
