pub mod poll_config;
pub mod price;
pub mod sample;
pub mod symbol;

pub use poll_config::PollConfig;
pub use price::Price;
pub use sample::{Quote, Sample};
pub use symbol::Symbol;
