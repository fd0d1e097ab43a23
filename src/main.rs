use anyhow::Result;
use pdevolve::config::BreederConfig;
use pdevolve::genetic::{Breeder, Genome, Individual, LogObserver, Population};
use rand::rngs::StdRng;
use rand::SeedableRng;

const POPULATION_SIZE: usize = 40;
const GENOME_LENGTH: usize = 71;
const GENERATIONS: usize = 25;

fn main() -> Result<()> {
    env_logger::init();

    let config = BreederConfig {
        mutation_rate: 0.005,
        crossover_rate: 0.95,
        selection_method: 1,
        selection_parameter: 4,
        rng_seed: Some(17),
    };
    let mut breeder = Breeder::new(config)?;
    breeder.set_observer(Box::new(LogObserver));

    let mut seed_rng = StdRng::seed_from_u64(99);
    let mut population: Population = (0..POPULATION_SIZE)
        .map(|_| Individual::new(Genome::random(GENOME_LENGTH, &mut seed_rng)))
        .collect();

    for generation in 0..GENERATIONS {
        // Stand-in for tournament play: score each strategy, then breed
        for individual in &mut population {
            let score = score_strategy(individual.genome());
            individual.set_score(score);
        }

        let best = population
            .iter()
            .map(Individual::score)
            .fold(0.0_f64, f64::max);
        println!("generation {:2}: best score {:.1}", generation + 1, best);

        population = breeder.breed(population)?;
    }

    Ok(())
}

// Toy fitness: rewards strategies that lean cooperative. Real runs score
// genomes by iterated Prisoner's Dilemma payoffs instead.
fn score_strategy(genome: &Genome) -> f64 {
    genome.bits().iter().filter(|&&bit| bit).count() as f64
}
