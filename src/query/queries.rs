/// 상품 조회
pub const GET_LISTING: &str = "SELECT id, name, description, seller, price, product_kind, product_condition, current_bid, last_bid_time, auction_status, expires_at, is_available, created_at FROM listings WHERE id = $1";

/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str = "SELECT id, name, description, seller, price, product_kind, product_condition, current_bid, last_bid_time, auction_status, expires_at, is_available, created_at FROM listings ORDER BY created_at DESC";

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, listing_id, bidder_id, amount, status, is_proxy, proxy_limit, increment, placed_at, is_winner
    FROM bids
    WHERE listing_id = $1
    ORDER BY placed_at DESC
"#;

/// 선두 입찰 조회 (대기 입찰 중 최고가, 동률이면 먼저 들어온 입찰)
pub const GET_LEADING_BID: &str = r#"
    SELECT id, listing_id, bidder_id, amount, status, is_proxy, proxy_limit, increment, placed_at, is_winner
    FROM bids
    WHERE listing_id = $1 AND status = 'PENDING'
    ORDER BY amount DESC, placed_at ASC
    LIMIT 1
"#;

/// 입찰 수 조회
pub const COUNT_BIDS: &str = "SELECT COUNT(*) FROM bids WHERE listing_id = $1";
