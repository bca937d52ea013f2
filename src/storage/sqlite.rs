use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use crate::error::{Error, Result};
use crate::interfaces::{ConfigStore, SampleHistory, SampleSink};
use crate::types::{PollConfig, Price, Sample, Symbol};

/// Busy timeout for writers contending on the database file.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS poll_config (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        symbol TEXT NOT NULL,
        interval_seconds INTEGER NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS price_samples (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        symbol TEXT NOT NULL,
        price_raw INTEGER NOT NULL,
        observed_at TEXT NOT NULL,
        recorded_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_price_samples_symbol ON price_samples (symbol, id)",
];

/// SQLite-backed config row and append-only sample log.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies the schema.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to an in-memory database is a separate database.
        let max_connections = if in_memory { 1 } else { max_connections.max(1) };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = SqliteStore { pool };
        store.migrate().await?;
        tracing::info!(url = %url, max_connections, "Connected to SQLite store");
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn sample_count(&self, symbol: &Symbol) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM price_samples WHERE symbol = ?")
            .bind(symbol.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ConfigStore for SqliteStore {
    async fn read_config(&self) -> Result<Option<PollConfig>> {
        let row: Option<(String, i64)> = sqlx::query_as(
            "SELECT symbol, interval_seconds FROM poll_config WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some((symbol, interval_seconds)) = row else {
            return Ok(None);
        };

        // Handed out as stored; bootstrap decides what to do with a bad row.
        let interval_seconds = u64::try_from(interval_seconds).unwrap_or(0);
        Ok(Some(PollConfig {
            symbol: Symbol::from_stored(symbol),
            interval_seconds,
        }))
    }

    async fn write_config(&self, config: &PollConfig) -> Result<()> {
        let interval_seconds = i64::try_from(config.interval_seconds)
            .map_err(|_| Error::InvalidConfig(format!("interval too large: {}", config.interval_seconds)))?;

        sqlx::query(
            r#"
            INSERT INTO poll_config (id, symbol, interval_seconds, updated_at)
            VALUES (1, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                symbol = excluded.symbol,
                interval_seconds = excluded.interval_seconds,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(config.symbol.as_str())
        .bind(interval_seconds)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SampleSink for SqliteStore {
    async fn append(&self, sample: &Sample) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO price_samples (symbol, price_raw, observed_at, recorded_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(sample.symbol.as_str())
        .bind(sample.price.raw_value())
        .bind(sample.observed_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SampleHistory for SqliteStore {
    async fn latest(&self, symbol: &Symbol) -> Result<Option<Sample>> {
        let row: Option<(i64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT price_raw, observed_at FROM price_samples
            WHERE symbol = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(symbol.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(price_raw, observed_at)| {
            Ok(Sample {
                symbol: symbol.clone(),
                price: Price::from_raw(price_raw)?,
                observed_at,
            })
        })
        .transpose()
    }
}
