pub mod config_store;
pub mod event_publisher;
pub mod sample_sink;

pub use config_store::ConfigStore;
pub use event_publisher::EventPublisher;
pub use sample_sink::{SampleHistory, SampleSink};
