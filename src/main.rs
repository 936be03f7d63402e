// region:    --- Imports
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use bidding_service::config::AppConfig;
use bidding_service::database::DatabaseManager;
use bidding_service::handlers;
use bidding_service::message_broker::KafkaManager;
use bidding_service::scheduler::AuctionCloser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

/// 경매 이벤트 토픽
const EVENT_TOPIC: &str = "auction-events";

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드 (누락/오류는 기동 시점에 실패)
    let config = Arc::new(AppConfig::from_env()?);

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new(&config).await?);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // Kafka 매니저 생성 및 초기화
    let kafka_manager = Arc::new(KafkaManager::new(&config.kafka_brokers, EVENT_TOPIC)?);
    if let Err(e) = kafka_manager.initialize().await {
        error!("{:<12} --> Kafka 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> Kafka 초기화 성공", "Main");

    // 토픽 생성
    kafka_manager.create_topic(EVENT_TOPIC, 5, 1).await?;

    // 경매 자동 종료 스케줄러 시작
    let closer = AuctionCloser::new(
        Arc::clone(&db_manager),
        kafka_manager.get_producer(),
        Arc::clone(&config),
    );
    closer.start().await;

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        .route("/bid", post(handlers::handle_bid))
        .route("/auction/:id/end", post(handlers::handle_end_auction))
        .route(
            "/auction/:id/status",
            get(handlers::handle_get_auction_status),
        )
        .route("/auction/:id/bids", get(handlers::handle_get_bid_history))
        .route("/listings", get(handlers::handle_get_listings))
        .route("/listings/:id", get(handlers::handle_get_listing))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 20))
        .with_state((
            db_manager,
            kafka_manager.get_producer(),
            Arc::clone(&config),
        ));

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
