//! Паттерны графика - детерминированный дрейф поверх случайного блуждания
//! Каждый паттерн задается фазами по progress = elapsed / duration

use serde::{Deserialize, Serialize};

use super::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Uptrend,
    Downtrend,
    Volatile,
    Sideways,
    BreakoutUp,
    BreakoutDown,
    HeadAndShoulders,
    DoubleTop,
    DoubleBottom,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternState {
    /// Момент активации паттерна, мс
    pub start_ms: i64,
    /// Цена в момент активации - якорь для mean-reversion фаз
    pub base_price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PatternDriftModel {
    active: Option<(PatternType, PatternState)>,
}

impl PatternDriftModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_type(&self) -> Option<PatternType> {
        self.active.map(|(pattern, _)| pattern)
    }

    /// Привести модель к паттерну из конфига
    /// Сбрасывает состояние только при смене типа - повторная установка
    /// того же паттерна не перезапускает его
    pub fn sync(&mut self, pattern: Option<PatternType>, now_ms: i64, current_price: f64) {
        if self.active_type() == pattern {
            return;
        }

        self.active = pattern.map(|p| {
            (
                p,
                PatternState {
                    start_ms: now_ms,
                    base_price: current_price,
                },
            )
        });
    }

    /// Прогресс активного паттерна в [0, 1]
    /// После истечения duration паттерн НЕ снимается: progress зажимается
    /// на 1 и терминальная фаза действует дальше
    pub fn progress(&self, now_ms: i64, duration_ms: u64) -> f64 {
        match self.active {
            Some((_, state)) => {
                ((now_ms - state.start_ms) as f64 / duration_ms as f64).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }

    /// Вклад паттерна в дрейф цены на этом тике
    pub fn drift_contribution(
        &self,
        now_ms: i64,
        current_price: f64,
        strength: f64,
        duration_ms: u64,
        rng: &mut RandomSource,
    ) -> f64 {
        let Some((pattern, state)) = self.active else {
            return 0.0;
        };

        let progress = self.progress(now_ms, duration_ms);
        let unit = strength * 0.01;
        let mean_reversion = (state.base_price - current_price) * 0.01 * unit;

        match pattern {
            PatternType::Uptrend => unit,
            PatternType::Downtrend => -unit,
            PatternType::Volatile => rng.normal() * unit * 3.0,
            PatternType::Sideways => mean_reversion,
            PatternType::BreakoutUp => {
                if progress < 0.7 {
                    mean_reversion
                } else {
                    unit * 3.0
                }
            }
            PatternType::BreakoutDown => {
                if progress < 0.7 {
                    mean_reversion
                } else {
                    -unit * 3.0
                }
            }
            // Два плеча, голова выше, затем пробой вниз
            PatternType::HeadAndShoulders => {
                if progress < 0.25 {
                    unit
                } else if progress < 0.3 {
                    -unit
                } else if progress < 0.5 {
                    unit * 1.5
                } else if progress < 0.55 {
                    -unit * 1.5
                } else if progress < 0.75 {
                    unit
                } else {
                    -unit * 2.0
                }
            }
            // Две равные вершины, затем пробой вниз
            PatternType::DoubleTop => {
                if progress < 0.25 {
                    unit
                } else if progress < 0.5 {
                    -unit
                } else if progress < 0.75 {
                    unit
                } else {
                    -unit * 2.0
                }
            }
            PatternType::DoubleBottom => {
                if progress < 0.25 {
                    -unit
                } else if progress < 0.5 {
                    unit
                } else if progress < 0.75 {
                    -unit
                } else {
                    unit * 2.0
                }
            }
        }
    }
}
