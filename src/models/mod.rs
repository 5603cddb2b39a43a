use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64, // начало интервала, мс
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub timestamp: i64,
    pub side: TradeSide,
    pub size: f64,
    pub price: f64,
    pub value: f64, // |size| * price
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<OrderBookLevel>, // по убыванию цены
    pub asks: Vec<OrderBookLevel>, // по возрастанию цены
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    pub timestamp: i64,
    pub price: f64,
    pub bid: f64,
    pub ask: f64,
    pub order_book: OrderBook,
    pub trades: Vec<Trade>,
    pub candles: Vec<Candle>,
}
