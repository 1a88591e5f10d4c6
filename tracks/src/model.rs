use derive_more::{Display, From};
use serde::{Serialize, Serializer};
use sqlx::{sqlite::SqliteRow, FromRow, Row};

/// Whatever the `timestamp` column holds. SQLite is dynamically typed, so
/// ingest may have written epoch integers, fractional seconds or ISO text.
#[derive(Debug, Clone, PartialEq, Display, From, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Integer(i64),
    Real(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationSample {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Timestamp,
}

// on the wire a sample is just `[lat, lon, timestamp]`
impl Serialize for LocationSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.latitude, self.longitude, &self.timestamp).serialize(serializer)
    }
}

fn decode_timestamp(row: &SqliteRow) -> Result<Timestamp, sqlx::Error> {
    // try_get checks the runtime storage class, so only one of these can match
    if let Ok(v) = row.try_get::<i64, _>("timestamp") {
        return Ok(Timestamp::Integer(v));
    }
    if let Ok(v) = row.try_get::<f64, _>("timestamp") {
        return Ok(Timestamp::Real(v));
    }
    row.try_get::<String, _>("timestamp").map(Timestamp::Text)
}

impl FromRow<'_, SqliteRow> for LocationSample {
    fn from_row(row: &'_ SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(LocationSample {
            device_id: row.try_get("device_id")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            timestamp: decode_timestamp(row)?,
        })
    }
}
