use crate::genetic::genome::Genome;
use crate::genetic::individual::{Individual, Population};
use rand::seq::SliceRandom;
use rand::Rng;

/// Parent selection method, dispatched from the integer code carried in
/// `BreederConfig::selection_method`. Unrecognized codes are not an error;
/// they select a population of always-cooperate strategies, a deliberate
/// degraded mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Method 0: percentage threshold between best-individual and uniform
    /// random picks
    Threshold,
    /// Method 1: elitism plus sigma-scaled stochastic universal sampling
    FitnessProportionate,
    /// Method 2: shuffle-and-pick-best tournament
    Tournament,
    /// Any other code: fill the population with always-cooperate strategies
    AlwaysCooperate,
}

impl SelectionStrategy {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => SelectionStrategy::Threshold,
            1 => SelectionStrategy::FitnessProportionate,
            2 => SelectionStrategy::Tournament,
            _ => SelectionStrategy::AlwaysCooperate,
        }
    }

    /// Produce a parent population of the same size as `population`.
    ///
    /// Selection is stateless: everything it needs is the scored input,
    /// the method parameter, and the breeder's RNG stream.
    pub fn select<R: Rng>(
        &self,
        population: &[Individual],
        param: i32,
        rng: &mut R,
    ) -> Population {
        match self {
            SelectionStrategy::Threshold => threshold_selection(population, param, rng),
            SelectionStrategy::FitnessProportionate => {
                fitness_proportionate_selection(population, param, rng)
            }
            SelectionStrategy::Tournament => tournament_selection(population, param, rng),
            SelectionStrategy::AlwaysCooperate => always_cooperate_population(population),
        }
    }
}

/// Threshold selection: per slot, pick the single best individual with
/// probability `param` percent, otherwise a uniform random one. `param` = 0
/// gives pure random selection, `param` = 100 gives best-wins-all.
fn threshold_selection<R: Rng>(population: &[Individual], param: i32, rng: &mut R) -> Population {
    // Running max starts just above zero, so a population whose scores are
    // all <= 0 keeps slot 0 as "best". Ties go to the earlier slot.
    let mut best_index = 0;
    let mut best_score = 0.0;
    for (i, individual) in population.iter().enumerate() {
        if individual.score() > best_score {
            best_score = individual.score();
            best_index = i;
        }
    }

    (0..population.len())
        .map(|_| {
            let source = if rng.gen_range(0..100) < param {
                best_index
            } else {
                rng.gen_range(0..population.len())
            };
            population[source].clone()
        })
        .collect()
}

/// Fitness-proportionate selection with elitism and sigma scaling.
///
/// The top `param` scorers are copied straight into the output; the
/// remaining slots are filled by stochastic universal sampling over
/// sigma-scaled fitness, which keeps the expected pick count of each
/// individual proportional to its scaled fitness with low variance.
fn fitness_proportionate_selection<R: Rng>(
    population: &[Individual],
    param: i32,
    rng: &mut R,
) -> Population {
    let n = population.len();
    let elite_count = (param as usize).min(n);
    let mut selected = Vec::with_capacity(n);

    let mut by_score: Vec<&Individual> = population.iter().collect();
    by_score.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for individual in by_score.iter().take(elite_count) {
        selected.push((*individual).clone());
    }

    if elite_count == n {
        return selected;
    }

    // Scaling statistics come from the unmodified input population, not
    // the elites.
    let mean = population.iter().map(Individual::score).sum::<f64>() / n as f64;
    let variance = population
        .iter()
        .map(|i| (i.score() - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        // Guard: zero spread would blow up the scaling below. All scores
        // equal means all individuals are equally fit, so fill the
        // remaining slots round-robin in population order.
        log::debug!("fitness spread is zero, selecting round-robin");
        for j in 0..n - elite_count {
            selected.push(population[j % n].clone());
        }
        return selected;
    }

    let scaled: Vec<f64> = population
        .iter()
        .map(|i| (1.0 + (i.score() - mean) / (2.0 * std_dev)).max(0.1))
        .collect();
    let mean_scaled = scaled.iter().sum::<f64>() / n as f64;

    // One spin of the wheel, then evenly spaced pointers walked against
    // the cumulative scaled fitness.
    let offset = rng.gen::<f64>() * mean_scaled;
    let mut cursor = 0;
    let mut cumulative = scaled[0];
    for i in 0..n - elite_count {
        let pointer = offset + i as f64 * mean_scaled;
        while cumulative < pointer {
            cursor += 1;
            cumulative += scaled[cursor];
        }
        selected.push(population[cursor].clone());
    }

    selected
}

/// Tournament selection: for each slot, shuffle a working copy of the
/// population, take the first `param` entrants, and keep the highest scorer
/// (ties to the earlier entrant).
fn tournament_selection<R: Rng>(population: &[Individual], param: i32, rng: &mut R) -> Population {
    let n = population.len();
    let tournament_size = (param as usize).clamp(1, n);

    let mut working = population.to_vec();
    let mut selected = Vec::with_capacity(n);
    for _ in 0..n {
        working.shuffle(rng);
        let mut winner = &working[0];
        for candidate in &working[1..tournament_size] {
            if candidate.score() > winner.score() {
                winner = candidate;
            }
        }
        selected.push(winner.clone());
    }
    selected
}

/// Degraded mode for unrecognized method codes: a fresh population of
/// always-cooperate strategies, scores ignored entirely
fn always_cooperate_population(population: &[Individual]) -> Population {
    let length = population.first().map(|i| i.genome().len()).unwrap_or(0);
    (0..population.len())
        .map(|_| Individual::new(Genome::always_cooperate(length)))
        .collect()
}
