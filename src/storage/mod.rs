//! Persistence for the poll config and the price samples.
//!
//! `database.url = "memory"` selects the in-process store; anything else is
//! handed to sqlx as a SQLite URL.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::interfaces::{ConfigStore, SampleHistory, SampleSink};

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

pub const MEMORY_URL: &str = "memory";

/// The three storage-facing handles the rest of the service needs.
#[derive(Clone)]
pub struct Storage {
    pub config_store: Arc<dyn ConfigStore>,
    pub sink: Arc<dyn SampleSink>,
    pub history: Arc<dyn SampleHistory>,
}

impl Storage {
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        if config.url == MEMORY_URL {
            tracing::warn!("Using in-memory storage, samples will not survive a restart");
            return Ok(Self::from_store(Arc::new(InMemoryStore::new())));
        }

        let store = SqliteStore::connect(&config.url, config.max_connections).await?;
        Ok(Self::from_store(Arc::new(store)))
    }

    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ConfigStore + SampleSink + SampleHistory + 'static,
    {
        Storage {
            config_store: store.clone(),
            sink: store.clone(),
            history: store,
        }
    }
}
