use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 상품 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductKind {
    Regular,
    Thrift,
    Auction,
}

/// 상품 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

/// 경매 상태 (ACTIVE -> ENDED 단방향 전이)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuctionStatus {
    Active,
    Ended,
}

/// 입찰 상태 (PENDING에서 낙찰 시점에 WON/LOST로 한 번만 전이)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BidStatus {
    Pending,
    Won,
    Lost,
}

// 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub seller: String,
    /// 경매 시작가, 생성 후 불변
    pub price: Decimal,
    pub product_kind: ProductKind,
    pub product_condition: ProductCondition,
    /// 현재 최고 입찰가, 입찰 전에는 null
    pub current_bid: Option<Decimal>,
    pub last_bid_time: Option<DateTime<Utc>>,
    pub auction_status: AuctionStatus,
    /// 입찰이 없는 경매의 만료 시각
    pub expires_at: Option<DateTime<Utc>>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// 현재 가격 (입찰이 없으면 시작가)
    pub fn current_price(&self) -> Decimal {
        self.current_bid.unwrap_or(self.price)
    }
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: String,
    pub bidder_id: i64,
    pub amount: Decimal,
    pub status: BidStatus,
    /// 자동 입찰 여부
    pub is_proxy: bool,
    /// 자동 입찰 상한 (is_proxy인 경우 필수, amount보다 커야 함)
    pub proxy_limit: Option<Decimal>,
    /// 자동 재입찰 시 증가 단위
    pub increment: Decimal,
    pub placed_at: DateTime<Utc>,
    pub is_winner: bool,
}
