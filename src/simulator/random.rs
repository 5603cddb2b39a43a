//! Источник случайности для симуляции
//! Нормальное распределение через Box-Muller поверх StdRng

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f64::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seed для воспроизводимого рандома (None = случайный каждый раз)
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos() as u64
        });

        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Стандартная нормальная величина через Box-Muller
    /// Нулевые draws отбрасываются, чтобы не попасть в log(0)
    pub fn normal(&mut self) -> f64 {
        let u1 = self.nonzero_uniform();
        let u2 = self.nonzero_uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Равномерная величина в [lo, hi)
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..hi)
    }

    fn nonzero_uniform(&mut self) -> f64 {
        loop {
            let u: f64 = self.rng.r#gen();
            if u > 0.0 {
                return u;
            }
        }
    }
}
