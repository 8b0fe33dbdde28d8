//! Persistent on-disk copy of the last BTC quote, with a TTL.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::BtcQuote;

const CACHE_FILENAME: &str = "price_cache.json";

/// A day-old price is still a better calculator default than nothing.
pub const PRICE_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCache {
    /// Unix timestamp (seconds) of the fetch this entry came from.
    pub cached_at: u64,
    pub usd: f64,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
}

impl PriceCache {
    pub fn from_quote(quote: &BtcQuote) -> Self {
        let cached_at = quote
            .fetched_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            cached_at,
            usd: quote.usd,
            usd_24h_change: quote.usd_24h_change,
        }
    }

    pub fn to_quote(&self) -> BtcQuote {
        BtcQuote {
            usd: self.usd,
            usd_24h_change: self.usd_24h_change,
            fetched_at: UNIX_EPOCH + Duration::from_secs(self.cached_at),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age() > PRICE_CACHE_TTL
    }

    pub fn age(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.cached_at))
    }

    /// Human-readable age string.
    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

/// Cache file in the platform data directory.
pub fn default_cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hashdeck")
            .join(CACHE_FILENAME)
    })
    .clone()
}

/// Load the cached quote, skipping it once it has expired.
pub fn load_price_cache(path: &Path) -> Option<PriceCache> {
    if !path.exists() {
        debug!(path = %path.display(), "no price cache on disk");
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<PriceCache>(&content) {
            Ok(cache) => {
                if cache.is_expired() {
                    info!(age = %cache.age_string(), "price cache expired");
                    return None;
                }
                debug!(age = %cache.age_string(), usd = cache.usd, "loaded price cache");
                Some(cache)
            }
            Err(e) => {
                warn!("failed to parse price cache: {e}");
                None
            }
        },
        Err(e) => {
            warn!("failed to read price cache: {e}");
            None
        }
    }
}

pub fn save_price_cache(path: &Path, cache: &PriceCache) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(cache)?;
    fs::write(path, content)?;
    debug!(usd = cache.usd, path = %path.display(), "saved price cache");
    Ok(())
}

/// Deletes the cache file. A missing file is not an error.
pub fn remove_price_cache(path: &Path) -> Result<(), std::io::Error> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed price cache");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CACHE_FILENAME);
        let quote = BtcQuote {
            usd: 61_250.0,
            usd_24h_change: Some(0.8),
            fetched_at: SystemTime::now(),
        };

        let cache = PriceCache::from_quote(&quote);
        save_price_cache(&path, &cache).unwrap();

        let loaded = load_price_cache(&path).unwrap();
        assert_eq!(loaded, cache);
        assert_eq!(loaded.to_quote().usd, 61_250.0);
        assert_eq!(loaded.to_quote().usd_24h_change, Some(0.8));
    }

    #[test]
    fn expired_entries_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE_FILENAME);
        let cache = PriceCache {
            cached_at: 1_600_000_000,
            usd: 10_000.0,
            usd_24h_change: None,
        };
        save_price_cache(&path, &cache).unwrap();

        assert!(cache.is_expired());
        assert!(load_price_cache(&path).is_none());
    }

    #[test]
    fn missing_or_corrupt_files_yield_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE_FILENAME);
        assert!(load_price_cache(&path).is_none());

        fs::write(&path, "{not json").unwrap();
        assert!(load_price_cache(&path).is_none());
    }

    #[test]
    fn removing_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE_FILENAME);
        let quote = BtcQuote {
            usd: 1.0,
            usd_24h_change: None,
            fetched_at: SystemTime::now(),
        };
        save_price_cache(&path, &PriceCache::from_quote(&quote)).unwrap();

        remove_price_cache(&path).unwrap();
        assert!(!path.exists());
        remove_price_cache(&path).unwrap();
    }

    #[test]
    fn age_string_uses_largest_unit() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let cache = PriceCache {
            cached_at: now - 2 * 3600 - 5,
            usd: 1.0,
            usd_24h_change: None,
        };
        assert_eq!(cache.age_string(), "2h");
    }
}
