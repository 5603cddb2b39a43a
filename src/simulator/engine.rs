//! Основной движок симуляции рынка
//!
//! Один периодический tick продвигает все состояние в фиксированном порядке:
//! трекеры амплитуды -> дрейф паттерна -> цена -> свечи по всем интервалам ->
//! стакан. Движок однопоточный и без I/O; на многопоточном хосте доступ
//! сериализуется снаружи (mutex вокруг всего состояния или очередь запросов).

use log::{debug, info, warn};

use crate::models::{MarketDataSnapshot, Trade, TradeSide};

use super::amplitude::AmplitudeController;
use super::candles::CandleAggregator;
use super::config::{ConfigUpdate, SimulationConfig};
use super::error::SimulatorError;
use super::orderbook::OrderBookSynthesizer;
use super::pattern::PatternDriftModel;
use super::price::PriceProcess;
use super::random::RandomSource;
use super::trades::TradeExecutor;

/// Максимум свечей в snapshot - транспортный лимит, независимый от
/// емкости самих серий
pub const SNAPSHOT_CANDLES: usize = 150;

pub struct MarketSimulator {
    config: SimulationConfig,
    rng: RandomSource,
    price: PriceProcess,
    pattern: PatternDriftModel,
    amplitude: AmplitudeController,
    candles: CandleAggregator,
    executor: TradeExecutor,
}

impl MarketSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulatorError> {
        config.validate()?;

        Ok(Self {
            rng: RandomSource::new(config.random_seed),
            price: PriceProcess::new(config.initial_price),
            pattern: PatternDriftModel::new(),
            amplitude: AmplitudeController::new(),
            candles: CandleAggregator::new(),
            executor: TradeExecutor::new(),
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_price(&self) -> f64 {
        self.price.current_price()
    }

    /// Один шаг симуляции
    ///
    /// dt берется из реальных таймстемпов, а не из расписания - драйвер
    /// может опаздывать. Для первого тика dt = update_interval_ms.
    pub fn tick(&mut self, now_ms: i64) -> MarketDataSnapshot {
        let dt_s = match self.price.state().last_update_ms {
            Some(last_ms) if now_ms > last_ms => (now_ms - last_ms) as f64 / 1000.0,
            _ => self.config.update_interval_ms as f64 / 1000.0,
        };

        let current = self.price.current_price();

        let multiplier =
            self.amplitude
                .volatility_multiplier(now_ms, current, &self.config.amplitude_targets);

        // Паттерн из конфига активируется/снимается на границе тика
        self.pattern.sync(self.config.pattern_type, now_ms, current);
        let pattern_drift = self.pattern.drift_contribution(
            now_ms,
            current,
            self.config.pattern_strength,
            self.config.pattern_duration_ms,
            &mut self.rng,
        );

        let price = self.price.advance(
            now_ms,
            dt_s,
            self.config.volatility,
            pattern_drift,
            multiplier,
            &mut self.rng,
        );

        self.candles
            .ingest(&self.config.candle_buckets_ms, now_ms, price, &mut self.rng);

        let bid = price - self.config.spread / 2.0;
        let ask = price + self.config.spread / 2.0;
        let order_book = OrderBookSynthesizer::build(
            bid,
            ask,
            self.config.order_book_levels,
            self.config.spread,
            &mut self.rng,
        );

        debug!(
            "tick: t={} price={:.6} dt={:.3}s amp_mult={:.3} drift={:.5}",
            now_ms, price, dt_s, multiplier, pattern_drift
        );

        MarketDataSnapshot {
            timestamp: now_ms,
            price,
            bid,
            ask,
            order_book,
            trades: self.executor.recent(),
            candles: self
                .candles
                .recent(self.config.selected_bucket_ms, SNAPSHOT_CANDLES),
        }
    }

    /// Исполнить сделку по текущей цене
    /// Не двигает процесс цены - только читает его
    pub fn execute_trade(
        &mut self,
        now_ms: i64,
        side: TradeSide,
        size: f64,
    ) -> Result<Trade, SimulatorError> {
        let result = self.executor.execute(
            now_ms,
            side,
            size,
            self.price.current_price(),
            &self.config,
        );

        match &result {
            Ok(trade) => info!(
                "💰 Trade executed: id={} {:?} size={} price={:.6}",
                trade.id, trade.side, trade.size, trade.price
            ),
            Err(error) => warn!("Trade rejected: {}", error),
        }

        result
    }

    /// Применить частичное обновление конфигурации
    ///
    /// Конфиг заменяется целиком после валидации; при ошибке прежний
    /// конфиг остается в силе. Смена типа паттерна сбрасывает его состояние,
    /// цена и трекеры амплитуды переживают обновление.
    pub fn update_config(
        &mut self,
        now_ms: i64,
        update: ConfigUpdate,
    ) -> Result<SimulationConfig, SimulatorError> {
        let next = update.apply(&self.config)?;

        if next.pattern_type != self.config.pattern_type {
            self.pattern
                .sync(next.pattern_type, now_ms, self.price.current_price());
            info!("Pattern changed: {:?}", next.pattern_type);
        }

        self.config = next;
        info!("✅ Config updated");

        Ok(self.config.clone())
    }
}
