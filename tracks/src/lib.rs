use std::collections::BTreeSet;
use std::str::FromStr;

use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

pub mod error;
pub mod model;

pub use error::TrackError;
pub use model::{LocationSample, Timestamp};

pub const MAX_SAMPLES: u32 = 5000;
pub const DEFAULT_DEVICE: &str = "car_01";

#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// Hard cap on samples per query. The earliest ones are kept.
    pub max_samples: u32,
    /// Device served when a caller does not name one.
    pub default_device: String,
}

impl Default for TrackConfig {
    fn default() -> Self {
        TrackConfig {
            max_samples: MAX_SAMPLES,
            default_device: DEFAULT_DEVICE.into(),
        }
    }
}

/// Lazily connecting, read-only pool. The database file is never created here;
/// a missing file shows up as an error on the first acquire.
pub fn bind(url: &str, max_conn: Option<u32>) -> Result<Pool<Sqlite>, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.read_only(true);
    Ok(SqlitePoolOptions::new()
        .max_connections(max_conn.unwrap_or(1))
        .connect_lazy_with(options))
}

pub async fn fetch_device_ids(
    mut conn: PoolConnection<Sqlite>,
) -> Result<BTreeSet<String>, sqlx::Error> {
    let ids: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT device_id FROM coordinates ORDER BY device_id;")
            .fetch_all(&mut *conn)
            .await?;
    Ok(ids.into_iter().map(|x| x.0).collect())
}

/// Earliest `limit` samples of `device`, ascending by timestamp.
pub async fn fetch_samples(
    mut conn: PoolConnection<Sqlite>,
    device: &str,
    limit: u32,
) -> Result<Vec<LocationSample>, sqlx::Error> {
    sqlx::query_as(
        "SELECT device_id, latitude, longitude, timestamp
FROM coordinates
WHERE device_id = ?
ORDER BY timestamp ASC
LIMIT ?;",
    )
    .bind(device)
    .bind(i64::from(limit))
    .fetch_all(&mut *conn)
    .await
}

/// Read side of the location store. Every call checks out its own connection
/// and hands it back to the pool before returning.
#[derive(Debug, Clone)]
pub struct TrackReader {
    pool: Pool<Sqlite>,
    config: TrackConfig,
}

impl TrackReader {
    pub fn new(pool: Pool<Sqlite>, config: TrackConfig) -> Self {
        TrackReader { pool, config }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, TrackError> {
        self.pool
            .acquire()
            .await
            .map_err(TrackError::StoreUnavailable)
    }

    pub async fn list_devices(&self) -> Result<BTreeSet<String>, TrackError> {
        let conn = self.acquire().await?;
        let ids = fetch_device_ids(conn).await?;
        log::debug!("{} distinct devices in location store", ids.len());
        Ok(ids)
    }

    /// `None` reads the configured default device. An unknown device yields an
    /// empty vec.
    pub async fn samples(&self, device: Option<&str>) -> Result<Vec<LocationSample>, TrackError> {
        let device = device.unwrap_or(&self.config.default_device);
        let conn = self.acquire().await?;
        let samples = fetch_samples(conn, device, self.config.max_samples).await?;
        log::debug!("read {} samples for device {device}", samples.len());
        Ok(samples)
    }
}
