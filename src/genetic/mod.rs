pub mod breeder;
pub mod genome;
pub mod individual;
pub mod observer;
pub mod selection;

pub use breeder::Breeder;
pub use genome::Genome;
pub use individual::{Individual, Population};
pub use observer::{ChannelObserver, LogObserver, PopulationObserver, PopulationUpdate};
pub use selection::SelectionStrategy;
