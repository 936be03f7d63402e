/// 입찰 관련 커맨드 처리
/// 1. 입찰 (자동 입찰 경쟁 해소 포함)
/// 2. 경매 종료 (단일 낙찰자 확정)
/// 3. 무입찰 경매 자동 종료
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::bidding::error::BidError;
use crate::bidding::model::{AuctionStatus, Bid, BidStatus, ProductKind};
use crate::bidding::store::{self, NewBid};
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::message_broker::EventPublisher;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Commands

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: String,
    pub bidder_id: i64,
    pub amount: Decimal,
    /// 자동 입찰 여부
    #[serde(default)]
    pub is_proxy: bool,
    /// 자동 입찰 상한
    #[serde(default)]
    pub proxy_limit: Option<Decimal>,
    /// 자동 재입찰 증가 단위 (없으면 시스템 최소 단위)
    #[serde(default)]
    pub increment: Option<Decimal>,
}

// endregion: --- Commands

// region:    --- Bid Floor

/// 최소 허용 입찰가
/// 첫 입찰은 시작가 그대로 허용하고, 경쟁 입찰이 있으면 현재가에 최소 단위를 더한다
pub fn bid_floor(price: Decimal, current_bid: Option<Decimal>, min_increment: Decimal) -> Decimal {
    match current_bid {
        Some(current) => current + min_increment,
        None => price,
    }
}

/// 자동 입찰 경쟁의 낙착 금액
/// 1위가 2위를 이기는 데 필요한 최소 금액이며, 1위 상한을 넘지 않는다
pub fn proxy_settle_amount(
    top_limit: Decimal,
    runner_up_limit: Decimal,
    runner_up_increment: Decimal,
) -> Decimal {
    std::cmp::min(top_limit, runner_up_limit + runner_up_increment)
}

// endregion: --- Bid Floor

// region:    --- Place Bid

/// 1. 입찰
/// 상품 행 잠금 아래 검증, 입찰 기록, 현재가 갱신, 자동 입찰 해소까지
/// 하나의 트랜잭션으로 실행한다
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    db_manager: &DatabaseManager,
    publisher: &impl EventPublisher,
    config: &AppConfig,
) -> Result<Bid, BidError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let min_increment = config.min_bid_increment;
    let lock_timeout_ms = config.lock_timeout_ms;

    let (bid, events) = db_manager
        .transaction(move |tx| {
            Box::pin(async move {
                store::set_lock_timeout(tx, lock_timeout_ms).await?;
                let listing = store::lock_listing(tx, &cmd.listing_id).await?;

                // 경매 상품의 진행 중인 경매에만 입찰 가능
                if listing.product_kind != ProductKind::Auction
                    || listing.auction_status != AuctionStatus::Active
                {
                    return Err(BidError::AuctionNotActive);
                }

                // 최소 입찰가 검증
                let min_bid = bid_floor(listing.price, listing.current_bid, min_increment);
                if cmd.amount < min_bid {
                    return Err(BidError::BidTooLow { min_bid });
                }

                // 자동 입찰 설정 검증
                if cmd.is_proxy && cmd.proxy_limit.map_or(true, |limit| limit <= cmd.amount) {
                    return Err(BidError::InvalidProxyConfiguration);
                }
                let increment = cmd.increment.unwrap_or(min_increment);
                if increment <= Decimal::ZERO {
                    return Err(BidError::InvalidProxyConfiguration);
                }

                // 입찰 기록 및 현재가 갱신
                let now = Utc::now();
                let bid = store::insert_bid(
                    tx,
                    NewBid {
                        listing_id: &cmd.listing_id,
                        bidder_id: cmd.bidder_id,
                        amount: cmd.amount,
                        is_proxy: cmd.is_proxy,
                        proxy_limit: cmd.proxy_limit,
                        increment,
                    },
                    now,
                )
                .await?;
                store::refresh_current_bid(tx, &cmd.listing_id, cmd.amount, now).await?;

                let mut events = vec![AuctionEvent::BidPlaced {
                    listing_id: cmd.listing_id.clone(),
                    bidder_id: cmd.bidder_id,
                    amount: cmd.amount,
                    timestamp: now,
                }];

                // 자동 입찰이면 기존 자동 입찰들과의 경쟁을 해소
                let mut result = bid;
                if cmd.is_proxy {
                    let synthesized =
                        resolve_proxy_bids(tx, &cmd.listing_id, cmd.amount).await?;
                    for proxy_bid in synthesized {
                        events.push(AuctionEvent::ProxyBidPlaced {
                            listing_id: proxy_bid.listing_id.clone(),
                            bidder_id: proxy_bid.bidder_id,
                            amount: proxy_bid.amount,
                            proxy_limit: proxy_bid.proxy_limit.unwrap_or(proxy_bid.amount),
                            timestamp: proxy_bid.placed_at,
                        });
                        // 해소 결과 호출자의 자동 입찰이 더 올라갔다면 그 입찰을 돌려준다
                        if proxy_bid.bidder_id == cmd.bidder_id {
                            result = proxy_bid;
                        }
                    }
                }

                Ok((result, events))
            })
        })
        .await?;

    publish_events(publisher, &events).await;

    info!(
        "{:<12} --> 입찰 처리 완료: listing={}, amount={}",
        "Command", bid.listing_id, bid.amount
    );
    Ok(bid)
}

/// 자동 입찰 경쟁 해소
/// 현재 선두를 넘을 수 있는 자동 입찰이 두 건 이상 남아 있는 동안,
/// 상한 1위의 입찰자를 대신해 2위를 이기는 최소 금액으로 재입찰한다.
/// 선두 금액이 단조 증가하고 상한으로 유계이므로 루프는 반드시 종료한다.
async fn resolve_proxy_bids(
    tx: &mut Transaction<'_, Postgres>,
    listing_id: &str,
    leading_amount: Decimal,
) -> Result<Vec<Bid>, sqlx::Error> {
    let mut leading = leading_amount;
    let mut synthesized = Vec::new();

    loop {
        let qualifying = store::qualifying_proxy_bids(tx, listing_id, leading).await?;
        let [top, runner_up] = qualifying.as_slice() else {
            // 경쟁자가 하나 이하이면 선두가 확정된 상태
            break;
        };
        let (Some(top_limit), Some(runner_up_limit)) = (top.proxy_limit, runner_up.proxy_limit)
        else {
            break;
        };

        let settle_amount = proxy_settle_amount(top_limit, runner_up_limit, runner_up.increment);
        if settle_amount <= leading {
            break;
        }

        let now = Utc::now();
        let proxy_bid = store::insert_bid(
            tx,
            NewBid {
                listing_id,
                bidder_id: top.bidder_id,
                amount: settle_amount,
                is_proxy: true,
                proxy_limit: Some(top_limit),
                increment: top.increment,
            },
            now,
        )
        .await?;
        store::refresh_current_bid(tx, listing_id, settle_amount, now).await?;

        leading = settle_amount;
        synthesized.push(proxy_bid);
    }

    Ok(synthesized)
}

// endregion: --- Place Bid

// region:    --- End Auction

/// 2. 경매 종료
/// 최고 대기 입찰 하나를 WON으로, 나머지를 LOST로 확정하고 상품을 ENDED로 전이한다.
/// WON/LOST를 쓰는 유일한 경로이다.
pub async fn handle_end_auction(
    listing_id: &str,
    db_manager: &DatabaseManager,
    publisher: &impl EventPublisher,
    config: &AppConfig,
) -> Result<Option<Bid>, BidError> {
    info!("{:<12} --> 경매 종료 처리 시작: {}", "Command", listing_id);
    let listing_id = listing_id.to_string();
    let lock_timeout_ms = config.lock_timeout_ms;

    let (winner, event) = db_manager
        .transaction(move |tx| {
            Box::pin(async move {
                store::set_lock_timeout(tx, lock_timeout_ms).await?;
                let listing = store::lock_listing(tx, &listing_id).await?;

                if listing.product_kind != ProductKind::Auction {
                    return Err(BidError::NotAnAuction);
                }
                // 중복 정산을 막기 위해 재종료는 묵살하지 않고 거부한다
                if listing.auction_status == AuctionStatus::Ended {
                    return Err(BidError::AlreadyEnded);
                }

                let winner = store::top_pending_bid(tx, &listing_id).await?;
                if let Some(winning_bid) = &winner {
                    store::settle_bids(tx, &listing_id, winning_bid.id).await?;
                }
                store::close_listing(tx, &listing_id).await?;

                let event = AuctionEvent::AuctionEnded {
                    listing_id: listing_id.clone(),
                    winner_id: winner.as_ref().map(|bid| bid.bidder_id),
                    winning_amount: winner.as_ref().map(|bid| bid.amount),
                    timestamp: Utc::now(),
                };

                // 반환되는 낙찰 입찰은 확정된 상태를 담는다
                let winner = winner.map(|mut bid| {
                    bid.status = BidStatus::Won;
                    bid.is_winner = true;
                    bid
                });
                Ok((winner, event))
            })
        })
        .await?;

    publish_events(publisher, std::slice::from_ref(&event)).await;

    match &winner {
        Some(bid) => info!(
            "{:<12} --> 경매 종료: 낙찰자 {}, 낙찰가 {}",
            "Command", bid.bidder_id, bid.amount
        ),
        None => info!("{:<12} --> 경매 종료: 입찰 없이 종료", "Command"),
    }
    Ok(winner)
}

// endregion: --- End Auction

// region:    --- Inactivity Sweep

/// 3. 무입찰 경매 자동 종료
/// 무입찰 시간이 한도를 넘은 경매와 입찰 없이 만료된 경매를 종료한다.
/// 다른 경로가 먼저 종료한 경매(AlreadyEnded)는 성공으로 간주하고,
/// 그 외 오류는 기록만 하고 다음 주기에 자연 재시도한다.
pub async fn check_and_close_inactive_auctions(
    db_manager: &DatabaseManager,
    publisher: &impl EventPublisher,
    config: &AppConfig,
) -> Result<u32, BidError> {
    let now = Utc::now();
    let candidates =
        store::inactive_auction_ids(db_manager.pool(), now, config.inactivity_window()).await?;

    let mut closed = 0;
    for listing_id in candidates {
        match handle_end_auction(&listing_id, db_manager, publisher, config).await {
            Ok(_) => closed += 1,
            Err(BidError::AlreadyEnded) => closed += 1,
            Err(e) => error!(
                "{:<12} --> 경매 자동 종료 실패: listing={}, error={:?}",
                "Command", listing_id, e
            ),
        }
    }
    Ok(closed)
}

// endregion: --- Inactivity Sweep

// region:    --- Event Publish

/// 커밋 이후 이벤트 발행
/// 알림 전파는 최선 노력이며 실패해도 입찰 결과에는 영향을 주지 않는다
async fn publish_events(publisher: &impl EventPublisher, events: &[AuctionEvent]) {
    for event in events {
        if let Err(e) = publisher.publish(event).await {
            warn!("{:<12} --> 이벤트 발행 실패: {}", "Command", e);
        }
    }
}

// endregion: --- Event Publish

// endregion: --- Tests
