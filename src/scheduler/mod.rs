/// 경매 자동 종료 스케줄러
/// 마지막 입찰 후 무입찰 시간이 한도를 넘은 경매와
/// 입찰 없이 만료 시각이 지난 경매를 주기적으로 종료한다
// region:    --- Imports
use crate::bidding::commands;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::message_broker::KafkaProducer;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Auction Closer
/// 경매 자동 종료 스케줄러
pub struct AuctionCloser {
    db_manager: Arc<DatabaseManager>,
    publisher: Arc<KafkaProducer>,
    config: Arc<AppConfig>,
}

impl AuctionCloser {
    pub fn new(
        db_manager: Arc<DatabaseManager>,
        publisher: Arc<KafkaProducer>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db_manager,
            publisher,
            config,
        }
    }

    /// 스케줄러 시작
    pub async fn start(&self) {
        let db_manager = Arc::clone(&self.db_manager);
        let publisher = Arc::clone(&self.publisher);
        let config = Arc::clone(&self.config);

        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(config.sweep_interval_secs));
            loop {
                interval.tick().await;
                match commands::check_and_close_inactive_auctions(
                    &db_manager,
                    publisher.as_ref(),
                    &config,
                )
                .await
                {
                    Ok(0) => debug!("{:<12} --> 종료 대상 경매 없음", "Closer"),
                    Ok(closed) => info!("{:<12} --> 경매 {}건 자동 종료", "Closer", closed),
                    Err(e) => error!("{:<12} --> 경매 자동 종료 중 오류 발생: {:?}", "Closer", e),
                }
            }
        });
    }
}
// endregion: --- Auction Closer
