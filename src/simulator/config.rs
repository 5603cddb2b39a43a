//! Конфигурация симуляции
//! Неизменяемый snapshot, заменяется целиком при обновлении (без частичных
//! состояний у читателей)

use serde::{Deserialize, Serialize};

use super::error::SimulatorError;
use super::pattern::PatternType;

/// Целевой минимальный размах цены за окно, в процентах
/// 0 отключает контроль для конкретного окна
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeTargets {
    pub pct_15s: f64,
    pub pct_1m: f64,
    pub pct_15m: f64,
    pub pct_1h: f64,
}

impl Default for AmplitudeTargets {
    fn default() -> Self {
        AmplitudeTargets {
            pct_15s: 0.5,
            pct_1m: 1.0,
            pct_15m: 2.0,
            pct_1h: 3.0,
        }
    }
}

impl AmplitudeTargets {
    fn validate(&self) -> Result<(), SimulatorError> {
        for (name, pct) in [
            ("pct_15s", self.pct_15s),
            ("pct_1m", self.pct_1m),
            ("pct_15m", self.pct_15m),
            ("pct_1h", self.pct_1h),
        ] {
            if !pct.is_finite() || pct < 0.0 {
                return Err(SimulatorError::InvalidConfig(format!(
                    "amplitude target {} must be finite and >= 0, got {}",
                    name, pct
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Стартовая цена инструмента
    pub initial_price: f64,

    /// Волатильность (σ) GBM процесса
    pub volatility: f64,

    /// Спред между bid и ask в абсолютных единицах цены
    pub spread: f64,

    /// Интервал между тиками драйвера (мс)
    pub update_interval_ms: u64,

    /// Количество уровней на сторону в синтетическом стакане
    pub order_book_levels: usize,

    /// Максимальный размер одной сделки
    pub max_trade_size: f64,

    /// Лимит частоты сделок
    pub max_trades_per_second: f64,

    /// Шаг размера сделки для потребителей (UI), движком не применяется
    pub trade_size_step: f64,

    /// Цели амплитуды по окнам 15s/1m/15m/1h
    pub amplitude_targets: AmplitudeTargets,

    /// Размеры интервалов свечей (мс) - агрегируются все одновременно
    pub candle_buckets_ms: Vec<u64>,

    /// Интервал, который отдается наружу в snapshot
    pub selected_bucket_ms: u64,

    /// Активный паттерн графика (None = чистое случайное блуждание)
    pub pattern_type: Option<PatternType>,
    pub pattern_strength: f64,
    pub pattern_duration_ms: u64,

    /// Seed для воспроизводимого рандома (None = случайный каждый раз)
    pub random_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_price: 100.0,
            volatility: 0.02,
            spread: 0.05,
            update_interval_ms: 100,
            order_book_levels: 10,
            max_trade_size: 100.0,
            max_trades_per_second: 5.0,
            trade_size_step: 0.1,
            amplitude_targets: AmplitudeTargets::default(),
            candle_buckets_ms: vec![10, 100, 1000, 5000],
            selected_bucket_ms: 1000,
            pattern_type: None,
            pattern_strength: 1.0,
            pattern_duration_ms: 60_000,
            random_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Проверка диапазонов всех полей
    /// Некорректный конфиг отклоняется целиком, прежний остается в силе
    pub fn validate(&self) -> Result<(), SimulatorError> {
        fn positive(name: &str, value: f64) -> Result<(), SimulatorError> {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulatorError::InvalidConfig(format!(
                    "{} must be finite and > 0, got {}",
                    name, value
                )));
            }
            Ok(())
        }

        positive("initial_price", self.initial_price)?;
        positive("max_trade_size", self.max_trade_size)?;
        positive("max_trades_per_second", self.max_trades_per_second)?;
        positive("trade_size_step", self.trade_size_step)?;
        positive("pattern_strength", self.pattern_strength)?;

        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(SimulatorError::InvalidConfig(format!(
                "volatility must be finite and >= 0, got {}",
                self.volatility
            )));
        }
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(SimulatorError::InvalidConfig(format!(
                "spread must be finite and >= 0, got {}",
                self.spread
            )));
        }
        if self.update_interval_ms == 0 {
            return Err(SimulatorError::InvalidConfig(
                "update_interval_ms must be > 0".to_string(),
            ));
        }
        if self.order_book_levels == 0 {
            return Err(SimulatorError::InvalidConfig(
                "order_book_levels must be > 0".to_string(),
            ));
        }
        if self.pattern_duration_ms == 0 {
            return Err(SimulatorError::InvalidConfig(
                "pattern_duration_ms must be > 0".to_string(),
            ));
        }

        self.amplitude_targets.validate()?;

        if self.candle_buckets_ms.is_empty() {
            return Err(SimulatorError::InvalidConfig(
                "candle_buckets_ms must not be empty".to_string(),
            ));
        }
        if self.candle_buckets_ms.iter().any(|&b| b == 0) {
            return Err(SimulatorError::InvalidConfig(
                "candle bucket sizes must be > 0".to_string(),
            ));
        }
        if !self.candle_buckets_ms.contains(&self.selected_bucket_ms) {
            return Err(SimulatorError::InvalidConfig(format!(
                "selected_bucket_ms {} is not in candle_buckets_ms",
                self.selected_bucket_ms
            )));
        }

        Ok(())
    }
}

/// Частичное обновление конфигурации
/// None = поле не меняется; применяется только через атомарную замену
/// всего SimulationConfig
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub initial_price: Option<f64>,
    pub volatility: Option<f64>,
    pub spread: Option<f64>,
    pub update_interval_ms: Option<u64>,
    pub order_book_levels: Option<usize>,
    pub max_trade_size: Option<f64>,
    pub max_trades_per_second: Option<f64>,
    pub trade_size_step: Option<f64>,
    pub amplitude_targets: Option<AmplitudeTargets>,
    pub candle_buckets_ms: Option<Vec<u64>>,
    pub selected_bucket_ms: Option<u64>,
    pub pattern_type: Option<PatternType>,
    /// Явный сброс паттерна: Option<PatternType> не различает
    /// "не трогать" и "убрать"
    pub clear_pattern: bool,
    pub pattern_strength: Option<f64>,
    pub pattern_duration_ms: Option<u64>,
}

impl ConfigUpdate {
    /// Наложить обновление на базовый конфиг и проверить результат
    /// При ошибке базовый конфиг не изменяется
    pub fn apply(&self, base: &SimulationConfig) -> Result<SimulationConfig, SimulatorError> {
        let mut next = base.clone();

        if let Some(v) = self.initial_price {
            next.initial_price = v;
        }
        if let Some(v) = self.volatility {
            next.volatility = v;
        }
        if let Some(v) = self.spread {
            next.spread = v;
        }
        if let Some(v) = self.update_interval_ms {
            next.update_interval_ms = v;
        }
        if let Some(v) = self.order_book_levels {
            next.order_book_levels = v;
        }
        if let Some(v) = self.max_trade_size {
            next.max_trade_size = v;
        }
        if let Some(v) = self.max_trades_per_second {
            next.max_trades_per_second = v;
        }
        if let Some(v) = self.trade_size_step {
            next.trade_size_step = v;
        }
        if let Some(v) = self.amplitude_targets {
            next.amplitude_targets = v;
        }
        if let Some(v) = &self.candle_buckets_ms {
            next.candle_buckets_ms = v.clone();
        }
        if let Some(v) = self.selected_bucket_ms {
            next.selected_bucket_ms = v;
        }
        if self.clear_pattern {
            next.pattern_type = None;
        } else if let Some(v) = self.pattern_type {
            next.pattern_type = Some(v);
        }
        if let Some(v) = self.pattern_strength {
            next.pattern_strength = v;
        }
        if let Some(v) = self.pattern_duration_ms {
            next.pattern_duration_ms = v;
        }

        next.validate()?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let mut config = SimulationConfig::default();
        config.volatility = -0.1;
        assert!(matches!(
            config.validate(),
            Err(SimulatorError::InvalidConfig(_))
        ));

        let mut config = SimulationConfig::default();
        config.initial_price = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.selected_bucket_ms = 777;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let base = SimulationConfig::default();
        let update = ConfigUpdate {
            volatility: Some(0.2),
            ..Default::default()
        };

        let next = update.apply(&base).unwrap();
        assert_eq!(next.volatility, 0.2);
        assert_eq!(next.initial_price, base.initial_price);
        assert_eq!(next.candle_buckets_ms, base.candle_buckets_ms);
    }

    #[test]
    fn test_invalid_update_rejected() {
        let base = SimulationConfig::default();
        let update = ConfigUpdate {
            max_trade_size: Some(0.0),
            ..Default::default()
        };
        assert!(update.apply(&base).is_err());
    }

    #[test]
    fn test_clear_pattern() {
        let mut base = SimulationConfig::default();
        base.pattern_type = Some(PatternType::Uptrend);

        let update = ConfigUpdate {
            clear_pattern: true,
            ..Default::default()
        };
        let next = update.apply(&base).unwrap();
        assert_eq!(next.pattern_type, None);
    }
}
