//! File-backed cache for the Vicohome bearer token
//!
//! The token is stored together with an absolute expiry timestamp in
//! `~/.vicohome/auth.json`. Reads never fail: a missing, unreadable, corrupt
//! or expired entry is simply a cache miss. Expired entries are left on disk.

use crate::cache::{self, CacheError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

pub const TOKEN_CACHE_FILE_NAME: &str = "auth.json";
pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;

/// A token as persisted in the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Token cache bound to a single file.
#[derive(Debug, Clone)]
pub struct TokenCache {
    cache_file: PathBuf,
}

impl TokenCache {
    /// Create a cache in the default per-user location.
    ///
    /// Fails only when the location cannot be resolved (no home directory).
    pub fn new() -> Result<TokenCache, CacheError> {
        let cache_dir = cache::get_cache_dir()?;
        Ok(Self::in_dir(cache_dir))
    }

    /// Create a cache whose file lives in the given directory.
    pub fn in_dir(cache_dir: impl Into<PathBuf>) -> TokenCache {
        TokenCache {
            cache_file: cache_dir.into().join(TOKEN_CACHE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_file
    }

    /// Read the raw cache entry, regardless of its expiry.
    pub fn read_entry(&self) -> Option<CachedToken> {
        let data = match std::fs::read_to_string(&self.cache_file) {
            Ok(data) => data,
            Err(e) => {
                trace!("No readable token cache at {:?}: {}", self.cache_file, e);
                return None;
            }
        };

        match serde_json::from_str::<CachedToken>(&data) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Ignoring corrupt token cache {:?}: {}", self.cache_file, e);
                None
            }
        }
    }

    /// Return the cached token if one exists and has not expired.
    pub fn load(&self) -> Option<String> {
        let entry = self.read_entry()?;
        if entry.is_valid_at(Utc::now()) {
            debug!("Using cached token (expires at {})", entry.expires_at);
            Some(entry.token)
        } else {
            debug!("Cached token expired at {}", entry.expires_at);
            None
        }
    }

    /// Persist a token valid for `duration_hours` from now.
    ///
    /// Non-positive or unrepresentable durations fall back to 24 hours.
    pub fn save(&self, token: &str, duration_hours: i64) -> Result<(), CacheError> {
        let duration_hours = if duration_hours <= 0 {
            DEFAULT_TOKEN_VALIDITY_HOURS
        } else {
            duration_hours
        };

        let now = Utc::now();
        let expires_at = Duration::try_hours(duration_hours)
            .and_then(|validity| now.checked_add_signed(validity))
            .unwrap_or_else(|| now + Duration::hours(DEFAULT_TOKEN_VALIDITY_HOURS));
        let entry = CachedToken {
            token: token.to_string(),
            expires_at,
        };

        if let Some(parent) = self.cache_file.parent() {
            cache::create_private_dir(parent)?;
        }

        let data = serde_json::to_vec(&entry)?;
        cache::write_private_file(&self.cache_file, &data)?;
        debug!("Saved token to cache (expires at {})", entry.expires_at);
        Ok(())
    }

    /// Delete the cache file. A missing file is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.cache_file) {
            Ok(()) => {
                debug!("Cleared token cache {:?}", self.cache_file);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::IoError(e)),
        }
    }
}
