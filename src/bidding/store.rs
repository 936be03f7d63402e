/// 입찰 엔진의 트랜잭션 범위 데이터 접근
/// 상품 행 잠금이 직렬화 지점이며, 모든 쓰기는 잠금을 잡은 트랜잭션 안에서 실행된다
// region:    --- Imports
use crate::bidding::model::{Bid, BidStatus, Listing};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

// endregion: --- Imports

// region:    --- New Bid
/// 새 입찰 행 생성 입력
pub struct NewBid<'a> {
    pub listing_id: &'a str,
    pub bidder_id: i64,
    pub amount: Decimal,
    pub is_proxy: bool,
    pub proxy_limit: Option<Decimal>,
    pub increment: Decimal,
}
// endregion: --- New Bid

// region:    --- Listing Access

/// 트랜잭션 잠금 대기 한도 설정
pub async fn set_lock_timeout(
    tx: &mut Transaction<'_, Postgres>,
    timeout_ms: u64,
) -> Result<(), sqlx::Error> {
    // SET LOCAL은 바인드 변수를 받지 않는다
    sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", timeout_ms))
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// 상품 행 잠금 조회 (FOR UPDATE)
pub async fn lock_listing(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &str,
) -> Result<Listing, sqlx::Error> {
    sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1 FOR UPDATE")
        .bind(listing_id)
        .fetch_one(&mut **tx)
        .await
}

/// 상품의 현재 입찰가와 마지막 입찰 시각 갱신
pub async fn refresh_current_bid(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &str,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE listings SET current_bid = $1, last_bid_time = $2 WHERE id = $3")
        .bind(amount)
        .bind(now)
        .bind(listing_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// 경매 종료 처리 (ACTIVE -> ENDED, 판매 종료)
pub async fn close_listing(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE listings SET auction_status = 'ENDED', is_available = FALSE WHERE id = $1")
        .bind(listing_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// endregion: --- Listing Access

// region:    --- Bid Access

/// 입찰 행 추가
pub async fn insert_bid(
    tx: &mut Transaction<'_, Postgres>,
    new_bid: NewBid<'_>,
    placed_at: DateTime<Utc>,
) -> Result<Bid, sqlx::Error> {
    sqlx::query_as::<_, Bid>(
        "INSERT INTO bids (listing_id, bidder_id, amount, status, is_proxy, proxy_limit, increment, placed_at)
         VALUES ($1, $2, $3, 'PENDING', $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(new_bid.listing_id)
    .bind(new_bid.bidder_id)
    .bind(new_bid.amount)
    .bind(new_bid.is_proxy)
    .bind(new_bid.proxy_limit)
    .bind(new_bid.increment)
    .bind(placed_at)
    .fetch_one(&mut **tx)
    .await
}

/// 최고 대기 입찰 조회 (금액 내림차순, 동률이면 먼저 들어온 입찰)
pub async fn top_pending_bid(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &str,
) -> Result<Option<Bid>, sqlx::Error> {
    sqlx::query_as::<_, Bid>(
        "SELECT * FROM bids
         WHERE listing_id = $1 AND status = 'PENDING'
         ORDER BY amount DESC, placed_at ASC
         LIMIT 1",
    )
    .bind(listing_id)
    .fetch_optional(&mut **tx)
    .await
}

/// 현재 선두 금액을 넘을 수 있는 자동 입찰 상위 두 건 조회
pub async fn qualifying_proxy_bids(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &str,
    leading_amount: Decimal,
) -> Result<Vec<Bid>, sqlx::Error> {
    sqlx::query_as::<_, Bid>(
        "SELECT * FROM bids
         WHERE listing_id = $1 AND status = 'PENDING' AND is_proxy = TRUE AND proxy_limit > $2
         ORDER BY proxy_limit DESC, placed_at ASC
         LIMIT 2",
    )
    .bind(listing_id)
    .bind(leading_amount)
    .fetch_all(&mut **tx)
    .await
}

/// 낙찰/유찰 상태 기록
/// WON/LOST를 쓰는 유일한 경로이며 경매 종료 트랜잭션에서만 호출된다
pub async fn settle_bids(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &str,
    winner_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE bids SET status = $1, is_winner = TRUE WHERE id = $2")
        .bind(BidStatus::Won)
        .bind(winner_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        "UPDATE bids SET status = $1 WHERE listing_id = $2 AND status = 'PENDING' AND id != $3",
    )
    .bind(BidStatus::Lost)
    .bind(listing_id)
    .bind(winner_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

// endregion: --- Bid Access

// region:    --- Sweep Access

/// 자동 종료 대상 경매 조회
/// 마지막 입찰 후 무입찰 시간이 한도를 넘었거나,
/// 입찰이 한 번도 없고 상품 만료 시각이 지난 경매만 해당한다
pub async fn inactive_auction_ids(
    pool: &PgPool,
    now: DateTime<Utc>,
    inactivity_window: chrono::Duration,
) -> Result<Vec<String>, sqlx::Error> {
    let cutoff = now - inactivity_window;
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT id FROM listings
         WHERE product_kind = 'AUCTION' AND auction_status = 'ACTIVE'
           AND ((last_bid_time IS NOT NULL AND last_bid_time <= $1)
             OR (last_bid_time IS NULL AND expires_at IS NOT NULL AND expires_at <= $2))",
    )
    .bind(cutoff)
    .bind(now)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// endregion: --- Sweep Access
