// region:    --- Imports
use super::queries;
use crate::bidding::model::{AuctionStatus, Bid, Listing, ProductKind};
use crate::database::DatabaseManager;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Error as SqlxError;
use tracing::info;

// endregion: --- Imports

// region:    --- Status View

/// 경매 상태 뷰 (카탈로그/상태 API에 제공되는 읽기 전용 투영)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuctionStatusView {
    pub is_auction: bool,
    pub current_price: Option<Decimal>,
    /// 선두 입찰자
    pub leader: Option<i64>,
    pub total_bids: i64,
    /// 자동 종료까지 남은 시간, 입찰도 만료 시각도 없으면 null
    pub time_remaining_secs: Option<i64>,
    pub auction_status: Option<AuctionStatus>,
    pub has_ended: bool,
}

impl AuctionStatusView {
    /// 경매 상품이 아닌 경우의 뷰
    fn not_an_auction() -> Self {
        Self {
            is_auction: false,
            current_price: None,
            leader: None,
            total_bids: 0,
            time_remaining_secs: None,
            auction_status: None,
            has_ended: false,
        }
    }
}

/// 자동 종료까지 남은 시간 계산
/// 입찰이 있으면 마지막 입찰 기준 무입찰 한도, 없으면 상품 만료 시각 기준
pub fn time_remaining_secs(
    now: DateTime<Utc>,
    last_bid_time: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    inactivity_window: Duration,
) -> Option<i64> {
    match last_bid_time {
        Some(last_bid) => Some((last_bid + inactivity_window - now).num_seconds().max(0)),
        None => expires_at.map(|expiry| (expiry - now).num_seconds().max(0)),
    }
}

// endregion: --- Status View

// region:    --- Query Handlers

/// 상품 조회
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: &str,
) -> Result<Listing, SqlxError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    let listing_id = listing_id.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                    .bind(listing_id)
                    .fetch_one(&mut **tx)
                    .await
            })
        })
        .await
}

/// 모든 상품 조회
pub async fn get_all_listings(db_manager: &DatabaseManager) -> Result<Vec<Listing>, SqlxError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_ALL_LISTINGS)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 입찰 이력 조회
pub async fn get_bid_history(
    db_manager: &DatabaseManager,
    listing_id: &str,
) -> Result<Vec<Bid>, SqlxError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    let listing_id = listing_id.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 경매 상태 조회
/// 상품, 선두 입찰, 입찰 수를 한 트랜잭션에서 읽어 일관된 스냅샷을 돌려준다.
/// 상태를 변경하지 않으며 입찰 처리와 동시에 호출해도 안전하다.
pub async fn get_auction_status(
    db_manager: &DatabaseManager,
    listing_id: &str,
    inactivity_window: Duration,
) -> Result<AuctionStatusView, SqlxError> {
    info!("{:<12} --> 경매 상태 조회 id: {}", "Query", listing_id);
    let listing_id = listing_id.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                    .bind(&listing_id)
                    .fetch_one(&mut **tx)
                    .await?;

                if listing.product_kind != ProductKind::Auction {
                    return Ok(AuctionStatusView::not_an_auction());
                }

                let leader = sqlx::query_as::<_, Bid>(queries::GET_LEADING_BID)
                    .bind(&listing_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                let total_bids = sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
                    .bind(&listing_id)
                    .fetch_one(&mut **tx)
                    .await?;

                let has_ended = listing.auction_status == AuctionStatus::Ended;
                let time_remaining = if has_ended {
                    None
                } else {
                    time_remaining_secs(
                        Utc::now(),
                        listing.last_bid_time,
                        listing.expires_at,
                        inactivity_window,
                    )
                };

                Ok(AuctionStatusView {
                    is_auction: true,
                    current_price: Some(listing.current_price()),
                    leader: leader.map(|bid| bid.bidder_id),
                    total_bids,
                    time_remaining_secs: time_remaining,
                    auction_status: Some(listing.auction_status),
                    has_ended,
                })
            })
        })
        .await
}

// endregion: --- Query Handlers

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_time_counts_down_from_last_bid() {
        let now = Utc::now();
        let last_bid = now - Duration::hours(20);
        let remaining = time_remaining_secs(now, Some(last_bid), None, Duration::hours(24));
        assert_eq!(remaining, Some(Duration::hours(4).num_seconds()));
    }

    #[test]
    fn remaining_time_clamps_at_zero() {
        let now = Utc::now();
        let last_bid = now - Duration::hours(30);
        let remaining = time_remaining_secs(now, Some(last_bid), None, Duration::hours(24));
        assert_eq!(remaining, Some(0));
    }

    #[test]
    fn no_bids_falls_back_to_listing_expiry() {
        let now = Utc::now();
        let expiry = now + Duration::hours(2);
        let remaining = time_remaining_secs(now, None, Some(expiry), Duration::hours(24));
        assert_eq!(remaining, Some(Duration::hours(2).num_seconds()));
    }

    #[test]
    fn no_bids_and_no_expiry_is_the_sentinel() {
        let now = Utc::now();
        assert_eq!(time_remaining_secs(now, None, None, Duration::hours(24)), None);
    }
}
// endregion: --- Tests
