//! Исполнение симулированных сделок
//! Rate limit и лимит размера; лог сделок ограничен по емкости

use std::collections::VecDeque;

use crate::models::{Trade, TradeSide};

use super::config::SimulationConfig;
use super::error::SimulatorError;

/// Максимум сделок в логе, новые в начале
pub const MAX_TRADES: usize = 50;

#[derive(Debug)]
pub struct TradeExecutor {
    trades: VecDeque<Trade>,
    last_trade_ms: Option<i64>,
    next_trade_id: u64,
}

impl Default for TradeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeExecutor {
    pub fn new() -> Self {
        Self {
            trades: VecDeque::new(),
            last_trade_ms: None,
            next_trade_id: 1,
        }
    }

    /// Проверить и записать сделку
    ///
    /// Порядок проверок фиксирован: сначала rate limit, затем размер.
    /// Отклоненная сделка не меняет ни лог, ни время последней сделки.
    /// Цена процесса не затрагивается - только читается.
    pub fn execute(
        &mut self,
        now_ms: i64,
        side: TradeSide,
        size: f64,
        current_price: f64,
        config: &SimulationConfig,
    ) -> Result<Trade, SimulatorError> {
        let min_interval_ms = 1000.0 / config.max_trades_per_second;

        if let Some(last_ms) = self.last_trade_ms {
            let elapsed_ms = (now_ms - last_ms) as f64;
            if elapsed_ms < min_interval_ms {
                return Err(SimulatorError::RateLimited {
                    wait_ms: (min_interval_ms - elapsed_ms).ceil() as i64,
                });
            }
        }

        if size.abs() > config.max_trade_size {
            return Err(SimulatorError::SizeExceeded {
                size: size.abs(),
                max: config.max_trade_size,
            });
        }

        // Покупка платит ask-сторону, продажа получает bid-сторону
        let fill_price = match side {
            TradeSide::Buy => current_price + config.spread / 2.0,
            TradeSide::Sell => current_price - config.spread / 2.0,
        };

        let trade = Trade {
            id: self.next_trade_id,
            timestamp: now_ms,
            side,
            size,
            price: fill_price,
            value: size.abs() * fill_price,
        };
        self.next_trade_id += 1;

        self.trades.push_front(trade.clone());
        self.trades.truncate(MAX_TRADES);
        self.last_trade_ms = Some(now_ms);

        Ok(trade)
    }

    /// Лог сделок, новые первыми
    pub fn recent(&self) -> Vec<Trade> {
        self.trades.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig {
            max_trades_per_second: 2.0, // минимум 500 мс между сделками
            max_trade_size: 10.0,
            spread: 0.2,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_rate_limit_sequence() {
        let mut executor = TradeExecutor::new();
        let config = config();

        assert!(executor.execute(0, TradeSide::Buy, 0.1, 100.0, &config).is_ok());

        // 100 мс < 500 мс - отклоняется с остатком ожидания
        match executor.execute(100, TradeSide::Buy, 0.1, 100.0, &config) {
            Err(SimulatorError::RateLimited { wait_ms }) => assert_eq!(wait_ms, 400),
            other => panic!("expected RateLimited, got {:?}", other),
        }

        // 600 мс после первой - проходит
        assert!(executor.execute(600, TradeSide::Buy, 0.1, 100.0, &config).is_ok());
        assert_eq!(executor.len(), 2);
    }

    #[test]
    fn test_size_limit_leaves_state_unchanged() {
        let mut executor = TradeExecutor::new();
        let config = config();

        executor.execute(0, TradeSide::Buy, 1.0, 100.0, &config).unwrap();

        match executor.execute(1000, TradeSide::Sell, -50.0, 100.0, &config) {
            Err(SimulatorError::SizeExceeded { size, max }) => {
                assert_eq!(size, 50.0);
                assert_eq!(max, 10.0);
            }
            other => panic!("expected SizeExceeded, got {:?}", other),
        }

        // Отказ не записал сделку и не обновил rate limit:
        // валидная сделка сразу после отказа проходит
        assert_eq!(executor.len(), 1);
        assert!(executor.execute(1001, TradeSide::Sell, 1.0, 100.0, &config).is_ok());
    }

    #[test]
    fn test_rate_limit_checked_before_size() {
        let mut executor = TradeExecutor::new();
        let config = config();

        executor.execute(0, TradeSide::Buy, 1.0, 100.0, &config).unwrap();

        // Нарушены оба лимита - возвращается именно RateLimited
        assert!(matches!(
            executor.execute(10, TradeSide::Buy, 999.0, 100.0, &config),
            Err(SimulatorError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_fill_price_uses_half_spread() {
        let mut executor = TradeExecutor::new();
        let config = config();

        let buy = executor.execute(0, TradeSide::Buy, 2.0, 100.0, &config).unwrap();
        assert_eq!(buy.price, 100.1);
        assert_eq!(buy.value, 2.0 * 100.1);

        let sell = executor.execute(1000, TradeSide::Sell, 2.0, 100.0, &config).unwrap();
        assert_eq!(sell.price, 99.9);
    }

    #[test]
    fn test_trade_log_capped_newest_first() {
        let mut executor = TradeExecutor::new();
        let config = config();

        for i in 0..70 {
            executor
                .execute(i * 1000, TradeSide::Buy, 0.5, 100.0, &config)
                .unwrap();
        }

        let trades = executor.recent();
        assert_eq!(trades.len(), MAX_TRADES);
        // Новые в начале, id монотонно растут
        assert_eq!(trades[0].id, 70);
        assert_eq!(trades.last().unwrap().id, 70 - MAX_TRADES as u64 + 1);
        assert!(trades[0].timestamp > trades[1].timestamp);
    }
}
