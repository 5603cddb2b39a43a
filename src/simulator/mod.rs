//! Движок симуляции рынка - GBM процесс цены, паттерны, свечи, стакан
//! Статистический симулятор: гарантия амплитуды вместо детерминированных скачков

pub mod amplitude;
pub mod candles;
pub mod config;
pub mod engine;
pub mod error;
pub mod orderbook;
pub mod pattern;
pub mod price;
pub mod random;
pub mod trades;

pub use amplitude::AmplitudeController;
pub use candles::CandleAggregator;
pub use config::{AmplitudeTargets, ConfigUpdate, SimulationConfig};
pub use engine::MarketSimulator;
pub use error::SimulatorError;
pub use orderbook::OrderBookSynthesizer;
pub use pattern::{PatternDriftModel, PatternType};
pub use price::{PriceProcess, PriceState};
pub use random::RandomSource;
pub use trades::TradeExecutor;
