use chrono::{TimeZone, Utc};
use price_poller::core::bootstrap::load_or_seed;
use price_poller::interfaces::{ConfigStore, SampleHistory, SampleSink};
use price_poller::storage::SqliteStore;
use price_poller::{PollConfig, Price, Sample, Symbol};

async fn store() -> SqliteStore {
    SqliteStore::connect("sqlite::memory:", 5).await.unwrap()
}

fn sample(symbol: &str, price: f64, secs: i64) -> Sample {
    Sample {
        symbol: Symbol::parse(symbol).unwrap(),
        price: Price::from_f64(price).unwrap(),
        observed_at: Utc.timestamp_opt(secs, 0).unwrap(),
    }
}

#[tokio::test]
async fn config_row_is_absent_until_written() {
    let store = store().await;
    assert_eq!(store.read_config().await.unwrap(), None);

    let config = PollConfig::new("AAPL", 30).unwrap();
    store.write_config(&config).await.unwrap();
    assert_eq!(store.read_config().await.unwrap(), Some(config));
}

#[tokio::test]
async fn writes_replace_the_single_row() {
    let store = store().await;
    store.write_config(&PollConfig::new("AAPL", 30).unwrap()).await.unwrap();
    store.write_config(&PollConfig::new("MSFT", 5).unwrap()).await.unwrap();

    assert_eq!(store.read_config().await.unwrap(), Some(PollConfig::new("MSFT", 5).unwrap()));
}

#[tokio::test]
async fn latest_returns_newest_sample_for_symbol() {
    let store = store().await;
    store.append(&sample("AAPL", 100.0, 1_700_000_000)).await.unwrap();
    store.append(&sample("AAPL", 101.5, 1_700_000_030)).await.unwrap();
    store.append(&sample("MSFT", 300.0, 1_700_000_031)).await.unwrap();

    let aapl = Symbol::parse("AAPL").unwrap();
    let latest = store.latest(&aapl).await.unwrap().unwrap();
    assert_eq!(latest, sample("AAPL", 101.5, 1_700_000_030));
    assert_eq!(store.sample_count(&aapl).await.unwrap(), 2);

    let tsla = Symbol::parse("TSLA").unwrap();
    assert_eq!(store.latest(&tsla).await.unwrap(), None);
}

#[tokio::test]
async fn default_is_seeded_only_once() {
    let store = store().await;
    let first_default = PollConfig::new("AAPL", 60).unwrap();
    let seeded = load_or_seed(&store, &first_default).await.unwrap();
    assert_eq!(seeded, first_default);

    let other_default = PollConfig::new("GOOG", 10).unwrap();
    let loaded = load_or_seed(&store, &other_default).await.unwrap();
    assert_eq!(loaded, first_default);
}
