pub mod utils;

// Ядро симуляции
pub mod simulator;

// Models
pub mod models;

pub use simulator::{ConfigUpdate, MarketSimulator, SimulationConfig, SimulatorError};
