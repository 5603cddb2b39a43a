//! Система логирования с настройкой уровней через переменные окружения
//! Использует env_logger для гибкого управления логами

use std::env;

/// Инициализация системы логирования
///
/// Уровни настраиваются через переменную окружения RUST_LOG:
/// - RUST_LOG=error - только ошибки
/// - RUST_LOG=info - информационные сообщения (по умолчанию)
/// - RUST_LOG=debug - отладка, включая построчные тики симуляции
///
/// Можно указать для конкретного модуля:
/// - RUST_LOG=market_sim::simulator=debug
pub fn init_logging() {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "info");
        }
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .format_target(false)
        .init();

    log::info!("✅ Система логирования инициализирована");
}

/// Получить текущий уровень логирования
pub fn get_log_level() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}
