//! GBM процесс цены - авторитетный источник текущей цены

use super::random::RandomSource;

/// Нижняя граница цены: инвариант price > 0 даже при патологическом дрейфе
pub const MIN_PRICE: f64 = 1e-5;

#[derive(Debug, Clone, Copy)]
pub struct PriceState {
    pub current_price: f64,
    pub last_update_ms: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct PriceProcess {
    state: PriceState,
}

impl PriceProcess {
    pub fn new(initial_price: f64) -> Self {
        Self {
            state: PriceState {
                current_price: initial_price,
                last_update_ms: None,
            },
        }
    }

    pub fn current_price(&self) -> f64 {
        self.state.current_price
    }

    pub fn state(&self) -> &PriceState {
        &self.state
    }

    /// Один шаг GBM рекурренты
    ///
    /// dt_s - реальное время с прошлого тика (не фиксированный шаг),
    /// pattern_drift добавляется к дрейфу, amplitude_multiplier >= 1
    /// масштабирует случайную компоненту.
    ///
    /// При volatility > 0.05 добавляется случайный направленный дрейф
    /// 0.01 * normal() - намеренная асимметрия "экстремальных" конфигураций.
    pub fn advance(
        &mut self,
        now_ms: i64,
        dt_s: f64,
        volatility: f64,
        pattern_drift: f64,
        amplitude_multiplier: f64,
        rng: &mut RandomSource,
    ) -> f64 {
        let base_drift = if volatility > 0.05 {
            0.01 * rng.normal()
        } else {
            0.0
        };
        let drift = base_drift + pattern_drift;

        let random_factor = if volatility > 0.1 { 1.5 } else { 1.0 };
        let random_component = rng.normal() * dt_s.sqrt() * random_factor * amplitude_multiplier;

        let price_change = drift * dt_s + volatility * random_component;

        self.state.current_price = (self.state.current_price * price_change.exp()).max(MIN_PRICE);
        self.state.last_update_ms = Some(now_ms);

        self.state.current_price
    }
}
