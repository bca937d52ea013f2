pub mod config_api;
pub mod rest;

pub use config_api::ConfigApi;
pub use rest::{ApiState, create_router};
