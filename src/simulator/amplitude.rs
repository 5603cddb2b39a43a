//! Контроль амплитуды - статистическая гарантия минимального размаха цены
//! Буст волатильности только в последних 40% окна, без дискретных скачков

use super::config::AmplitudeTargets;

/// Фиксированные окна наблюдения: 15s, 1m, 15m, 1h
pub const WINDOWS_MS: [i64; 4] = [15_000, 60_000, 900_000, 3_600_000];

#[derive(Debug, Clone, Copy)]
struct AmplitudeTracker {
    window_start: i64,
    start_price: f64,
    min_price: f64,
    max_price: f64,
}

impl AmplitudeTracker {
    fn reset(&mut self, now_ms: i64, price: f64) {
        self.window_start = now_ms;
        self.start_price = price;
        self.min_price = price;
        self.max_price = price;
    }
}

#[derive(Debug, Clone)]
pub struct AmplitudeController {
    trackers: [AmplitudeTracker; 4],
    initialized: bool,
}

impl Default for AmplitudeController {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplitudeController {
    pub fn new() -> Self {
        Self {
            trackers: [AmplitudeTracker {
                window_start: 0,
                start_price: 0.0,
                min_price: 0.0,
                max_price: 0.0,
            }; 4],
            initialized: false,
        }
    }

    /// Множитель волатильности для этого тика, всегда >= 1
    ///
    /// Для каждого окна: если прошло больше 60% окна, а наблюдаемый размах
    /// меньше цели, буст растет непрерывно с дефицитом и остатком времени.
    /// Итог - максимум по всем окнам. Истекшее окно сбрасывается независимо
    /// от того, была ли достигнута цель: пропущенное окно не навёрстывается.
    pub fn volatility_multiplier(
        &mut self,
        now_ms: i64,
        current_price: f64,
        targets: &AmplitudeTargets,
    ) -> f64 {
        if !self.initialized {
            for tracker in &mut self.trackers {
                tracker.reset(now_ms, current_price);
            }
            self.initialized = true;
        }

        let thresholds = [
            targets.pct_15s,
            targets.pct_1m,
            targets.pct_15m,
            targets.pct_1h,
        ];

        let mut multiplier = 1.0_f64;

        for (i, &window_ms) in WINDOWS_MS.iter().enumerate() {
            let tracker = &mut self.trackers[i];
            tracker.min_price = tracker.min_price.min(current_price);
            tracker.max_price = tracker.max_price.max(current_price);

            let threshold = thresholds[i];
            // threshold = 0 полностью отключает окно
            if threshold > 0.0 {
                let amplitude =
                    (tracker.max_price - tracker.min_price) / tracker.start_price * 100.0;
                let elapsed_fraction =
                    ((now_ms - tracker.window_start) as f64 / window_ms as f64).clamp(0.0, 1.0);

                if elapsed_fraction > 0.6 && amplitude < threshold {
                    let boost =
                        1.0 + (threshold - amplitude) / threshold * (elapsed_fraction - 0.6) * 5.0;
                    multiplier = multiplier.max(boost.max(1.0));
                }
            }

            if now_ms - tracker.window_start >= window_ms {
                tracker.reset(now_ms, current_price);
            }
        }

        multiplier
    }
}
