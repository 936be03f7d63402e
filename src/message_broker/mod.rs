// region:    --- Imports
use crate::auction::events::AuctionEvent;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::sync::Arc;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Event Publisher Trait
/// 경매 이벤트 발행 트레이트
/// 엔진은 커밋 이후 이 트레이트를 통해서만 외부에 이벤트를 전파한다
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), String>;
}
// endregion: --- Event Publisher Trait

// region:    --- Kafka Producer
#[derive(Clone)]
pub struct KafkaProducer {
    producer: Arc<FutureProducer>,
    topic: String,
}

/// KafkaProducer 구현
impl KafkaProducer {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, String> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| format!("Producer 생성 실패: {:?}", e))?;

        Ok(KafkaProducer {
            producer: Arc::new(producer),
            topic: topic.to_string(),
        })
    }

    /// 메시지 전송
    pub async fn send_message(&self, topic: &str, key: &str, value: &str) -> Result<(), String> {
        info!(
            "{:<12} --> Kafka 메시지 전송: topic={}, key={}",
            "Producer", topic, key
        );
        let record = FutureRecord::to(topic).key(key).payload(value);

        self.producer
            .send(record, std::time::Duration::from_secs(0))
            .await
            .map_err(|(e, _)| format!("Error sending message: {:?}", e))?;

        Ok(())
    }
}

/// 경매 이벤트를 리스팅 id를 키로 하여 발행
#[async_trait]
impl EventPublisher for KafkaProducer {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), String> {
        let payload = serde_json::to_string(event).map_err(|e| e.to_string())?;
        self.send_message(&self.topic, event.listing_id(), &payload)
            .await
    }
}

// endregion: --- Kafka Producer

// region:    --- Kafka Manager
pub struct KafkaManager {
    producer: Arc<KafkaProducer>,
    brokers: String,
}

/// KafkaManager 구현
impl KafkaManager {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, String> {
        let producer = Arc::new(KafkaProducer::new(brokers, topic)?);

        Ok(KafkaManager {
            producer,
            brokers: brokers.to_string(),
        })
    }

    /// 프로듀서 반환
    pub fn get_producer(&self) -> Arc<KafkaProducer> {
        Arc::clone(&self.producer)
    }

    /// Kafka 초기화 (브로커 연결 확인)
    pub async fn initialize(&self) -> Result<(), String> {
        info!("{:<12} --> Kafka 초기화 시작", "Manager");
        self.producer
            .send_message("init-topic", "init-key", "init-message")
            .await
    }

    /// 토픽 생성
    pub async fn create_topic(
        &self,
        topic_name: &str,
        num_partitions: i32,
        replication_factor: i32,
    ) -> Result<(), String> {
        info!("{:<12} --> Kafka 토픽 생성 시작: {}", "Manager", topic_name);

        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| format!("AdminClient 생성 실패: {:?}", e))?;

        let new_topic = NewTopic::new(
            topic_name,
            num_partitions,
            TopicReplication::Fixed(replication_factor),
        );

        match admin_client
            .create_topics(&[new_topic], &AdminOptions::new())
            .await
        {
            Ok(_) => {
                info!("{:<12} --> Kafka 토픽 생성 성공: {}", "Manager", topic_name);
                Ok(())
            }
            Err(e) => {
                error!("{:<12} --> Kafka 토픽 생성 실패: {:?}", "Manager", e);
                Err(format!("토픽 생성 실패: {:?}", e))
            }
        }
    }
}

// endregion: --- Kafka Manager
