//! Синтетический стакан - многоуровневая лестница bid/ask от текущего спреда
//! Стакан полностью пересобирается каждый тик, без идентичности уровней

use crate::models::{OrderBook, OrderBookLevel};

use super::random::RandomSource;

/// Диапазон синтетического объема на уровень
const LEVEL_VOLUME_MIN: f64 = 100_000.0;
const LEVEL_VOLUME_MAX: f64 = 1_100_000.0;

pub struct OrderBookSynthesizer;

impl OrderBookSynthesizer {
    /// Построить стакан: bids по убыванию от bid_price, asks по возрастанию
    /// от ask_price, шаг между уровнями - 20% спреда
    pub fn build(
        bid_price: f64,
        ask_price: f64,
        levels: usize,
        spread: f64,
        rng: &mut RandomSource,
    ) -> OrderBook {
        let mut bids = Vec::with_capacity(levels);
        let mut asks = Vec::with_capacity(levels);

        for i in 0..levels {
            let offset = i as f64 * spread * 0.2;
            bids.push(OrderBookLevel {
                price: bid_price - offset,
                volume: rng.uniform(LEVEL_VOLUME_MIN, LEVEL_VOLUME_MAX),
            });
            asks.push(OrderBookLevel {
                price: ask_price + offset,
                volume: rng.uniform(LEVEL_VOLUME_MIN, LEVEL_VOLUME_MAX),
            });
        }

        OrderBook { bids, asks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_level_counts() {
        let mut rng = RandomSource::new(Some(10));
        let book = OrderBookSynthesizer::build(99.9, 100.1, 15, 0.2, &mut rng);

        assert_eq!(book.bids.len(), 15);
        assert_eq!(book.asks.len(), 15);
    }

    #[test]
    fn test_strictly_monotonic_prices() {
        let mut rng = RandomSource::new(Some(11));
        let book = OrderBookSynthesizer::build(99.9, 100.1, 10, 0.2, &mut rng);

        for pair in book.bids.windows(2) {
            assert!(pair[1].price < pair[0].price, "bids must descend");
        }
        for pair in book.asks.windows(2) {
            assert!(pair[1].price > pair[0].price, "asks must ascend");
        }

        // Вершина лестницы - сами bid/ask
        assert_eq!(book.bids[0].price, 99.9);
        assert_eq!(book.asks[0].price, 100.1);
    }

    #[test]
    fn test_level_volume_band() {
        let mut rng = RandomSource::new(Some(12));
        let book = OrderBookSynthesizer::build(50.0, 50.1, 20, 0.1, &mut rng);

        for level in book.bids.iter().chain(book.asks.iter()) {
            assert!((LEVEL_VOLUME_MIN..LEVEL_VOLUME_MAX).contains(&level.volume));
        }
    }
}
