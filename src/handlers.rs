// region:    --- Imports
use crate::bidding::commands::{self, PlaceBidCommand};
use crate::bidding::error::BidError;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::message_broker::KafkaProducer;
use crate::query;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

/// 핸들러 공유 상태
pub type AppState = (Arc<DatabaseManager>, Arc<KafkaProducer>, Arc<AppConfig>);

// region:    --- Error Mapping

/// 엔진 오류를 HTTP 응답으로 변환
/// 검증 실패는 400, 중복 종료는 409, 잠금 경합은 503으로 매핑한다
fn bid_error_response(error: BidError) -> Response {
    let status = match &error {
        BidError::NotFound => StatusCode::NOT_FOUND,
        BidError::AlreadyEnded => StatusCode::CONFLICT,
        BidError::Busy => StatusCode::SERVICE_UNAVAILABLE,
        BidError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };

    let mut body = serde_json::json!({
        "error": error.to_string(),
        "code": error.code(),
    });
    // 최소 입찰가는 호출자가 재입력할 수 있도록 본문에 포함
    if let BidError::BidTooLow { min_bid } = &error {
        body["min_bid"] = serde_json::json!(min_bid);
    }

    (status, Json(body)).into_response()
}

/// 조회 오류를 HTTP 응답으로 변환
fn query_error_response(error: sqlx::Error) -> Response {
    match error {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "상품을 찾을 수 없습니다.",
                "code": "NOT_FOUND",
            })),
        )
            .into_response(),
        e => (StatusCode::INTERNAL_SERVER_ERROR, Json(e.to_string())).into_response(),
    }
}

// endregion: --- Error Mapping

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State((db_manager, kafka_producer, config)): State<AppState>,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청: {:?}", "Handler", cmd);

    match commands::handle_place_bid(cmd, &db_manager, kafka_producer.as_ref(), &config).await {
        Ok(bid) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "입찰이 성공적으로 처리되었습니다.",
                "bid": bid,
            })),
        )
            .into_response(),
        Err(e) => bid_error_response(e),
    }
}

/// 경매 종료 요청 처리
pub async fn handle_end_auction(
    State((db_manager, kafka_producer, config)): State<AppState>,
    Path(listing_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 종료 요청: {}", "Handler", listing_id);

    match commands::handle_end_auction(&listing_id, &db_manager, kafka_producer.as_ref(), &config)
        .await
    {
        Ok(winner) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "경매가 종료되었습니다.",
                "winner": winner,
            })),
        )
            .into_response(),
        Err(e) => bid_error_response(e),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 상태 조회
pub async fn handle_get_auction_status(
    State((db_manager, _, config)): State<AppState>,
    Path(listing_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 상태 조회 id: {}", "Handler", listing_id);
    match query::handlers::get_auction_status(&db_manager, &listing_id, config.inactivity_window())
        .await
    {
        Ok(status) => Json(status).into_response(),
        Err(e) => query_error_response(e),
    }
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State((db_manager, _, _)): State<AppState>,
    Path(listing_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Handler", listing_id);
    match query::handlers::get_bid_history(&db_manager, &listing_id).await {
        Ok(history) => Json(history).into_response(),
        Err(e) => query_error_response(e),
    }
}

/// 모든 상품 조회
pub async fn handle_get_listings(
    State((db_manager, _, _)): State<AppState>,
) -> impl IntoResponse {
    info!("{:<12} --> 모든 상품 조회", "Handler");
    match query::handlers::get_all_listings(&db_manager).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => query_error_response(e),
    }
}

/// 상품 조회
pub async fn handle_get_listing(
    State((db_manager, _, _)): State<AppState>,
    Path(listing_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 상품 조회 id: {}", "Handler", listing_id);
    match query::handlers::get_listing(&db_manager, &listing_id).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => query_error_response(e),
    }
}

// endregion: --- Query Handlers
