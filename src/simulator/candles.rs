//! Агрегация OHLCV свечей по нескольким размерам интервалов одновременно
//! Каждая серия независима, ограничена по емкости (FIFO eviction)

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::models::Candle;

use super::random::RandomSource;

/// Максимум свечей в серии на один интервал
pub const MAX_CANDLES: usize = 200;

#[derive(Debug, Default)]
pub struct CandleAggregator {
    series: HashMap<u64, VecDeque<Candle>>,
}

impl CandleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Принять новую цену во все активные интервалы
    ///
    /// Объем - синтетический: случайное стартовое значение при открытии
    /// свечи и случайные неотрицательные приращения внутри нее. Контракт
    /// только в монотонном неубывании объема в пределах свечи.
    pub fn ingest(
        &mut self,
        bucket_sizes_ms: &[u64],
        now_ms: i64,
        price: f64,
        rng: &mut RandomSource,
    ) {
        for &bucket_ms in bucket_sizes_ms {
            let interval_start = now_ms / bucket_ms as i64 * bucket_ms as i64;
            let series = self.series.entry(bucket_ms).or_default();

            let start_new = series
                .back()
                .map_or(true, |candle| interval_start > candle.timestamp);

            if start_new {
                series.push_back(Candle {
                    timestamp: interval_start,
                    open: price,
                    high: price,
                    low: price,
                    close: price,
                    volume: rng.uniform(50.0, 200.0),
                });
                if series.len() > MAX_CANDLES {
                    series.pop_front();
                }
            } else {
                // Текущая (последняя) свеча еще открыта - обновляем на месте
                let candle = series.back_mut().unwrap();
                candle.high = candle.high.max(price);
                candle.low = candle.low.min(price);
                candle.close = price;
                candle.volume += rng.uniform(0.0, 50.0);
            }
        }
    }

    /// Последние limit свечей интервала в хронологическом порядке
    pub fn recent(&self, bucket_ms: u64, limit: usize) -> Vec<Candle> {
        match self.series.get(&bucket_ms) {
            Some(series) => {
                let skip = series.len().saturating_sub(limit);
                series.iter().skip(skip).copied().collect()
            }
            None => Vec::new(),
        }
    }

    pub fn series_len(&self, bucket_ms: u64) -> usize {
        self.series.get(&bucket_ms).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_candle_ohlc() {
        // Сценарий из требований: цены [1.0, 1.2, 0.9] в моменты [0, 400, 999]
        // при интервале 1000 мс дают ровно одну свечу
        let mut rng = RandomSource::new(Some(3));
        let mut aggregator = CandleAggregator::new();

        aggregator.ingest(&[1000], 0, 1.0, &mut rng);
        aggregator.ingest(&[1000], 400, 1.2, &mut rng);
        aggregator.ingest(&[1000], 999, 0.9, &mut rng);

        let candles = aggregator.recent(1000, 10);
        assert_eq!(candles.len(), 1);

        let candle = candles[0];
        assert_eq!(candle.timestamp, 0);
        assert_eq!(candle.open, 1.0);
        assert_eq!(candle.high, 1.2);
        assert_eq!(candle.low, 0.9);
        assert_eq!(candle.close, 0.9);
    }

    #[test]
    fn test_candle_invariants_hold() {
        let mut rng = RandomSource::new(Some(4));
        let mut aggregator = CandleAggregator::new();
        let buckets = [100, 1000];

        let mut price = 50.0;
        for i in 0..500 {
            price *= 1.0 + rng.normal() * 0.01;
            aggregator.ingest(&buckets, i * 37, price, &mut rng);

            for &bucket in &buckets {
                for candle in aggregator.recent(bucket, MAX_CANDLES) {
                    assert!(candle.low <= candle.open && candle.open <= candle.high);
                    assert!(candle.low <= candle.close && candle.close <= candle.high);
                    assert!(candle.volume >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_volume_monotonic_within_candle() {
        let mut rng = RandomSource::new(Some(5));
        let mut aggregator = CandleAggregator::new();

        aggregator.ingest(&[1000], 0, 10.0, &mut rng);
        let mut last_volume = aggregator.recent(1000, 1)[0].volume;

        for now in [100, 300, 500, 700, 900] {
            aggregator.ingest(&[1000], now, 10.0, &mut rng);
            let volume = aggregator.recent(1000, 1)[0].volume;
            assert!(volume >= last_volume, "volume must not decrease in a candle");
            last_volume = volume;
        }
    }

    #[test]
    fn test_series_capacity_bounded() {
        let mut rng = RandomSource::new(Some(6));
        let mut aggregator = CandleAggregator::new();

        // 600 интервалов по 10 мс - старые свечи вытесняются
        for i in 0..600 {
            aggregator.ingest(&[10], i * 10, 1.0, &mut rng);
        }

        assert_eq!(aggregator.series_len(10), MAX_CANDLES);

        // FIFO: остались самые свежие интервалы
        let candles = aggregator.recent(10, MAX_CANDLES);
        assert_eq!(candles[0].timestamp, (600 - MAX_CANDLES as i64) * 10);
        assert_eq!(candles.last().unwrap().timestamp, 5990);
    }

    #[test]
    fn test_buckets_roll_independently() {
        let mut rng = RandomSource::new(Some(7));
        let mut aggregator = CandleAggregator::new();
        let buckets = [100, 1000];

        for i in 0..10 {
            aggregator.ingest(&buckets, i * 100, 2.0, &mut rng);
        }

        // 10 тиков по 100 мс: десять 100мс-свечей, одна 1000мс-свеча
        assert_eq!(aggregator.series_len(100), 10);
        assert_eq!(aggregator.series_len(1000), 1);
    }

    #[test]
    fn test_recent_respects_limit() {
        let mut rng = RandomSource::new(Some(8));
        let mut aggregator = CandleAggregator::new();

        for i in 0..50 {
            aggregator.ingest(&[10], i * 10, 1.0, &mut rng);
        }

        let capped = aggregator.recent(10, 20);
        assert_eq!(capped.len(), 20);
        // Возвращаются именно последние свечи
        assert_eq!(capped.last().unwrap().timestamp, 490);
    }
}
