//! Демонстрационный драйвер симулятора
//! Периодический tick по update_interval_ms + редкие пробные сделки

use std::thread;
use std::time::Duration;

use chrono::Utc;

use market_sim::models::TradeSide;
use market_sim::simulator::{ConfigUpdate, MarketSimulator, PatternType, SimulationConfig};
use market_sim::utils::logging::init_logging;

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = SimulationConfig::default();
    let interval_ms = config.update_interval_ms;
    let mut simulator = MarketSimulator::new(config)?;

    log::info!("🚀 Market simulator started, interval {} ms", interval_ms);

    for i in 0u64..600 {
        let snapshot = simulator.tick(now_ms());

        if i % 50 == 0 {
            log::info!(
                "📊 price={:.4} bid={:.4} ask={:.4} candles={} trades={}",
                snapshot.price,
                snapshot.bid,
                snapshot.ask,
                snapshot.candles.len(),
                snapshot.trades.len()
            );
        }

        // На середине прогона включаем пробой вверх
        if i == 300 {
            let applied = simulator.update_config(
                now_ms(),
                ConfigUpdate {
                    pattern_type: Some(PatternType::BreakoutUp),
                    pattern_strength: Some(2.0),
                    ..Default::default()
                },
            )?;
            log::info!("Pattern activated: {:?}", applied.pattern_type);
        }

        if i % 97 == 0 {
            if let Err(error) = simulator.execute_trade(now_ms(), TradeSide::Buy, 0.5) {
                log::warn!("Demo trade rejected: {}", error);
            }
        }

        thread::sleep(Duration::from_millis(interval_ms));
    }

    log::info!("✅ Demo finished at price {:.4}", simulator.current_price());
    Ok(())
}
