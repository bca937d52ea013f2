pub mod log_publisher;
pub mod producer;

pub use log_publisher::LogPublisher;
pub use producer::KafkaSamplePublisher;
