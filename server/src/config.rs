use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracks::TrackConfig;
use zones::ZoneConfig;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub zone_dir: PathBuf,
    pub max_samples: u32,
    pub default_device: String,
    pub bind_address: String,
    pub port: u16,
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                var,
                value,
                expected,
            }),
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match parsed(lookup, var, default, "positive integer")? {
        0 => Err(ConfigError::Invalid {
            var,
            value: "0".into(),
            expected: "positive integer",
        }),
        n => Ok(n),
    }
}

impl Config {
    /// Reads `.env` if there is one, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let string = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.into());

        Ok(Config {
            database_url: string("DATABASE_URL", "sqlite://filtered_coordinates.db"),
            db_max_connections: positive(&lookup, "DB_MAX_CONNECTIONS", 4)?,
            zone_dir: string("ZONE_DIR", zones::DEFAULT_DIR).into(),
            max_samples: positive(&lookup, "MAX_SAMPLES", tracks::MAX_SAMPLES)?,
            default_device: string("DEFAULT_DEVICE", tracks::DEFAULT_DEVICE),
            bind_address: string("BIND_ADDRESS", "127.0.0.1"),
            port: parsed(&lookup, "PORT", 8080, "port number")?,
        })
    }

    pub fn track_config(&self) -> TrackConfig {
        TrackConfig {
            max_samples: self.max_samples,
            default_device: self.default_device.clone(),
        }
    }

    pub fn zone_config(&self) -> ZoneConfig {
        ZoneConfig {
            dir: self.zone_dir.clone(),
            ..ZoneConfig::default()
        }
    }
}
