use crate::config::KafkaConfig;
use crate::error::{Error, Result};
use crate::events::SampleEvent;
use crate::interfaces::EventPublisher;
use crate::observability::metrics::PUBLISH_FAILURES;
use crate::types::Sample;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::config::ClientConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;

/// Publishes samples to a Kafka topic keyed by symbol.
///
/// Delivery runs on a spawned task; `publish` only serializes and enqueues.
pub struct KafkaSamplePublisher {
    producer: FutureProducer,
    topic: String,
    queue_timeout: Duration,
    sequence_counter: AtomicU64,
}

impl KafkaSamplePublisher {
    pub fn new(config: &KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .set("compression.type", "lz4")
            .create()
            .map_err(|e| Error::KafkaError(e.to_string()))?;

        Ok(KafkaSamplePublisher {
            producer,
            topic: config.topic.clone(),
            queue_timeout: Duration::from_millis(config.message_timeout_ms),
            sequence_counter: AtomicU64::new(0),
        })
    }
}

impl EventPublisher for KafkaSamplePublisher {
    fn publish(&self, sample: &Sample) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| Error::RuntimeUnavailable)?;

        let sequence = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let event = SampleEvent::new(sample.clone(), sequence);
        let payload = serde_json::to_vec(&event)
            .map_err(|e| Error::SerializationError(e.to_string()))?;
        let key = sample.symbol.to_string();

        let producer = self.producer.clone();
        let topic = self.topic.clone();
        let queue_timeout = self.queue_timeout;

        runtime.spawn(async move {
            let record = FutureRecord::to(&topic)
                .payload(&payload)
                .key(&key);

            match producer.send(record, queue_timeout).await {
                Ok(_) => tracing::debug!(sequence, "Sample event delivered"),
                Err((e, _)) => {
                    PUBLISH_FAILURES.inc();
                    tracing::warn!(sequence, error = %e, "Sample event delivery failed");
                }
            }
        });

        Ok(())
    }
}
