use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod error;

pub use error::ZoneError;

pub const DEFAULT_DIR: &str = "camera_zones";
pub const DEFAULT_PREFIX: &str = "camera_zone_";
const EXTENSION: &str = ".json";

/// A user drawn zone set. The contents are never interpreted, only checked to
/// be something other than `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Zones(Value);

impl Zones {
    pub fn new(value: Value) -> Result<Self, ZoneError> {
        match value {
            Value::Null => Err(ZoneError::EmptyZones),
            v => Ok(Zones(v)),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl TryFrom<Value> for Zones {
    type Error = ZoneError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Zones::new(value)
    }
}

impl From<Zones> for Value {
    fn from(zones: Zones) -> Self {
        zones.0
    }
}

/// Name of a persisted record, also the stem of its file.
///
/// Only ASCII alphanumerics, `_`, `-` and `.` are allowed and the name may not
/// start with `.`, so a name can never leave the store directory. A name never
/// ends in `.json` either, which keeps `parse(name.as_str()) == name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Into, Serialize)]
#[serde(transparent)]
pub struct RecordName(String);

impl RecordName {
    /// Validates `stem` as is.
    pub fn new(stem: &str) -> Result<Self, ZoneError> {
        let valid = !stem.is_empty()
            && !stem.starts_with('.')
            && !stem.ends_with(EXTENSION)
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if valid {
            Ok(RecordName(stem.to_string()))
        } else {
            Err(ZoneError::InvalidName(stem.to_string()))
        }
    }

    /// Client facing: `camera_zone_1` and `camera_zone_1.json` both name the
    /// record stored as `camera_zone_1.json`.
    pub fn parse(raw: &str) -> Result<Self, ZoneError> {
        let stem = raw.strip_suffix(EXTENSION).unwrap_or(raw);
        RecordName::new(stem).map_err(|_| ZoneError::InvalidName(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn file_name(&self) -> String {
        format!("{}{EXTENSION}", self.0)
    }
}

impl FromStr for RecordName {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordName::parse(s)
    }
}

#[derive(Debug, Clone)]
pub struct ZoneConfig {
    pub dir: PathBuf,
    /// Generated names are `<prefix><n>`.
    pub prefix: String,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig {
            dir: DEFAULT_DIR.into(),
            prefix: DEFAULT_PREFIX.into(),
        }
    }
}

/// One JSON file per record in a single directory.
///
/// Generated names are `<prefix><n>` where `n` is one past both the highest
/// suffix on disk and the highest this store has handed out, and files are
/// created exclusively. A name is therefore never reused while the process
/// lives and an existing record is never overwritten. Nothing else is locked:
/// concurrent callers on the same directory may observe each other's
/// half-finished work.
#[derive(Debug)]
pub struct ZoneStore {
    config: ZoneConfig,
    issued: AtomicU64,
}

impl ZoneStore {
    pub fn open(config: ZoneConfig) -> Result<Self, ZoneError> {
        fs::create_dir_all(&config.dir)?;
        Ok(ZoneStore {
            config,
            issued: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    fn path(&self, name: &RecordName) -> PathBuf {
        self.config.dir.join(name.file_name())
    }

    fn suffix(&self, name: &RecordName) -> Option<u64> {
        name.as_str()
            .strip_prefix(self.config.prefix.as_str())?
            .parse()
            .ok()
    }

    fn names_on_disk(&self) -> Result<Vec<RecordName>, ZoneError> {
        let entries = match fs::read_dir(&self.config.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let parsed = file_name
                .to_str()
                .and_then(|f| f.strip_suffix(EXTENSION))
                .map(RecordName::new);
            match parsed {
                Some(Ok(name)) => names.push(name),
                _ => log::debug!("skipping {:?} in zone directory", file_name),
            }
        }
        Ok(names)
    }

    pub fn save(&self, zones: &Zones) -> Result<RecordName, ZoneError> {
        let on_disk = self
            .names_on_disk()?
            .iter()
            .filter_map(|n| self.suffix(n))
            .max()
            .unwrap_or(0);
        let exhausted = || ZoneError::NamesExhausted(self.config.prefix.clone());
        let mut n = on_disk
            .max(self.issued.load(Ordering::SeqCst))
            .checked_add(1)
            .ok_or_else(exhausted)?;

        loop {
            let name = RecordName(format!("{}{n}", self.config.prefix));
            let path = self.path(&name);
            let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    n = n.checked_add(1).ok_or_else(exhausted)?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            self.issued.fetch_max(n, Ordering::SeqCst);

            if let Err(e) = write_json(file, zones.as_value()) {
                // the name stays burned, the half-written file goes
                let _ = fs::remove_file(&path);
                return Err(e.into());
            }
            log::debug!("saved zone record {name}");
            return Ok(name);
        }
    }

    /// Every record currently in the directory, ordered by numeric suffix.
    /// Names without one follow, in lexical order.
    pub fn list(&self) -> Result<Vec<RecordName>, ZoneError> {
        let mut names = self.names_on_disk()?;
        names.sort_by_cached_key(|n| {
            let suffix = self.suffix(n);
            (suffix.is_none(), suffix, n.clone())
        });
        Ok(names)
    }

    pub fn load(&self, name: &RecordName) -> Result<Zones, ZoneError> {
        let bytes = match fs::read(self.path(name)) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ZoneError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let corrupt = |source: serde_json::Error| ZoneError::CorruptRecord {
            name: name.to_string(),
            source,
        };
        let value: Value = serde_json::from_slice(&bytes).map_err(corrupt)?;
        if value.is_null() {
            log::warn!("zone record {name} holds null");
            return Err(corrupt(serde::de::Error::custom("record holds null")));
        }
        Ok(Zones(value))
    }

    pub fn delete(&self, name: &RecordName) -> Result<(), ZoneError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => {
                log::debug!("deleted zone record {name}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ZoneError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_json(file: fs::File, value: &Value) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
