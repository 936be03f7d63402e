/// 입찰 엔진 오류 타입
/// 모든 검증 실패는 엔진 경계에서 타입으로 반환되며, 부분 쓰기는 노출되지 않는다
// region:    --- Imports
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Bid Error
#[derive(Debug, thiserror::Error)]
pub enum BidError {
    /// 경매가 아니거나 이미 종료된 상품에 대한 입찰
    #[error("진행 중인 경매가 아닙니다.")]
    AuctionNotActive,

    /// 최소 입찰가 미달 (min_bid는 호출자 재입력 안내용)
    #[error("입찰 금액은 최소 {min_bid} 이상이어야 합니다.")]
    BidTooLow { min_bid: Decimal },

    /// 자동 입찰 상한이 없거나 입찰 금액 이하
    #[error("자동 입찰 상한은 입찰 금액보다 커야 합니다.")]
    InvalidProxyConfiguration,

    /// 경매 상품이 아닌 상품에 대한 종료 시도
    #[error("경매 상품이 아닙니다.")]
    NotAnAuction,

    /// 이미 종료된 경매에 대한 중복 종료 시도
    #[error("경매가 이미 종료되었습니다.")]
    AlreadyEnded,

    /// 상품 행 잠금 대기 시간 초과, 재시도 가능
    #[error("요청이 많아 처리하지 못했습니다. 다시 시도해 주세요.")]
    Busy,

    /// 상품 또는 입찰을 찾을 수 없음
    #[error("상품을 찾을 수 없습니다.")]
    NotFound,

    #[error("데이터베이스 오류: {0}")]
    Database(sqlx::Error),
}

impl BidError {
    /// 외부 전송 계층에서 사용하는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            BidError::AuctionNotActive => "NOT_ACTIVE",
            BidError::BidTooLow { .. } => "LOW_BID",
            BidError::InvalidProxyConfiguration => "INVALID_PROXY",
            BidError::NotAnAuction => "NOT_AUCTION",
            BidError::AlreadyEnded => "ALREADY_ENDED",
            BidError::Busy => "BUSY",
            BidError::NotFound => "NOT_FOUND",
            BidError::Database(_) => "INTERNAL",
        }
    }
}

/// Postgres lock_timeout 초과(55P03)는 재시도 가능한 Busy로 변환
impl From<sqlx::Error> for BidError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => BidError::NotFound,
            sqlx::Error::Database(db_error) if db_error.code().as_deref() == Some("55P03") => {
                BidError::Busy
            }
            _ => BidError::Database(error),
        }
    }
}
// endregion: --- Bid Error

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_too_low_reports_floor() {
        let error = BidError::BidTooLow {
            min_bid: Decimal::new(10100, 2),
        };
        assert!(error.to_string().contains("101.00"));
        assert_eq!(error.code(), "LOW_BID");
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error: BidError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, BidError::NotFound));
    }
}
// endregion: --- Tests
