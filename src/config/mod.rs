/// 서비스 설정
/// 환경 변수에서 설정을 읽어오며, 누락되거나 잘못된 값은 생성 시점에 오류로 처리
// region:    --- Imports
use rust_decimal::Decimal;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Config Error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("환경 변수 누락: {0}")]
    Missing(&'static str),
    #[error("환경 변수 파싱 실패: {name}={value}")]
    Invalid { name: &'static str, value: String },
}
// endregion: --- Config Error

// region:    --- App Config
/// 서비스 전역 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub kafka_brokers: String,
    pub bind_addr: String,
    /// 시스템 최소 입찰 증가 단위
    pub min_bid_increment: Decimal,
    /// 마지막 입찰 후 경매 자동 종료까지의 무입찰 시간
    pub inactivity_window_hours: i64,
    /// 경매 종료 스케줄러 실행 주기
    pub sweep_interval_secs: u64,
    /// 상품 행 잠금 대기 시간 한도
    pub lock_timeout_ms: u64,
}

impl AppConfig {
    /// 환경 변수에서 설정 생성
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            kafka_brokers: optional("KAFKA_BROKERS", "localhost:9092"),
            bind_addr: optional("BIND_ADDR", "0.0.0.0:3000"),
            min_bid_increment: parse("MIN_BID_INCREMENT", Decimal::new(100, 2))?,
            inactivity_window_hours: parse("INACTIVITY_WINDOW_HOURS", 24)?,
            sweep_interval_secs: parse("SWEEP_INTERVAL_SECS", 60)?,
            lock_timeout_ms: parse("LOCK_TIMEOUT_MS", 2000)?,
        })
    }

    /// 무입찰 시간 한도
    pub fn inactivity_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.inactivity_window_hours)
    }
}

/// 필수 환경 변수 읽기
fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

/// 선택 환경 변수 읽기
fn optional(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// 파싱 가능한 환경 변수 읽기
fn parse<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
// endregion: --- App Config

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_min_increment_is_one() {
        std::env::remove_var("MIN_BID_INCREMENT");
        let increment = parse("MIN_BID_INCREMENT", Decimal::new(100, 2)).unwrap();
        assert_eq!(increment, Decimal::new(100, 2));
    }
}
// endregion: --- Tests
