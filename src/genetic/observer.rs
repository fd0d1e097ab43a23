use crate::genetic::individual::Individual;

/// Fire-and-forget notification that a new generation replaced the old one.
///
/// The breeder calls this after every successful breed and never looks at
/// the outcome; implementations must not block the breeding call. Display
/// surfaces and loggers hang off this trait.
pub trait PopulationObserver: Send {
    fn population_changed(&mut self, population: &[Individual]);
}

/// Logs a one-line summary of each new generation
pub struct LogObserver;

impl PopulationObserver for LogObserver {
    fn population_changed(&mut self, population: &[Individual]) {
        let best = population
            .iter()
            .map(Individual::score)
            .fold(0.0_f64, f64::max);
        log::info!(
            "population updated: {} individuals, best score {:.4}",
            population.len(),
            best
        );
    }
}

/// Snapshot of a freshly bred generation, sent to whoever renders it
pub struct PopulationUpdate {
    pub individuals: Vec<Individual>,
}

/// Hands each new generation to a channel, for a display or recording
/// thread. Send failures are ignored; a gone receiver must not break
/// breeding.
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<PopulationUpdate>,
}

impl ChannelObserver {
    pub fn new(sender: std::sync::mpsc::Sender<PopulationUpdate>) -> Self {
        Self { sender }
    }
}

impl PopulationObserver for ChannelObserver {
    fn population_changed(&mut self, population: &[Individual]) {
        let _ = self.sender.send(PopulationUpdate {
            individuals: population.to_vec(),
        });
    }
}
