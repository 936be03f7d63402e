use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 커밋 이후 외부 협력자(알림, 카탈로그)에게 전파되는 경매 이벤트
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum AuctionEvent {
    // 입찰 이벤트
    BidPlaced {
        listing_id: String,
        bidder_id: i64,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    },
    // 자동 입찰 경쟁으로 합성된 입찰 이벤트
    ProxyBidPlaced {
        listing_id: String,
        bidder_id: i64,
        amount: Decimal,
        proxy_limit: Decimal,
        timestamp: DateTime<Utc>,
    },
    // 경매 종료 이벤트
    AuctionEnded {
        listing_id: String,
        winner_id: Option<i64>,
        winning_amount: Option<Decimal>,
        timestamp: DateTime<Utc>,
    },
}

impl AuctionEvent {
    /// 이벤트 키 (리스팅 단위 파티셔닝)
    pub fn listing_id(&self) -> &str {
        match self {
            AuctionEvent::BidPlaced { listing_id, .. } => listing_id,
            AuctionEvent::ProxyBidPlaced { listing_id, .. } => listing_id,
            AuctionEvent::AuctionEnded { listing_id, .. } => listing_id,
        }
    }
}
