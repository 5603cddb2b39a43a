//! Ошибки движка симуляции
//! Все ошибки восстановимые и возвращаются вызывающему синхронно

#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// Сделка раньше минимального интервала между сделками
    #[error("Rate limited: next trade allowed in {wait_ms} ms")]
    RateLimited { wait_ms: i64 },

    /// Размер сделки превышает лимит конфигурации
    #[error("Trade size {size} exceeds maximum {max}")]
    SizeExceeded { size: f64, max: f64 },

    /// Некорректное обновление конфигурации - прежний конфиг сохраняется
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
