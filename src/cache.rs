//! Shared caching functionality for the vico-cli client.
//!
//! Holds the error type for local cache operations and the resolution of the
//! per-user cache directory.

use std::path::PathBuf;

pub const DEFAULT_CACHE_DIRECTORY_NAME: &str = ".vicohome";
pub const CACHE_DIR_ENV: &str = "VICOHOME_CACHE_DIR";

/// Common error type for cache operations
#[derive(Debug)]
pub enum CacheError {
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    HomeDirectoryNotFound,
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::IoError(e) => write!(f, "IO error: {}", e),
            CacheError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            CacheError::HomeDirectoryNotFound => {
                write!(f, "Cache error: could not determine the home directory")
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::IoError(e) => Some(e),
            CacheError::SerializationError(e) => Some(e),
            CacheError::HomeDirectoryNotFound => None,
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(error: std::io::Error) -> Self {
        CacheError::IoError(error)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        CacheError::SerializationError(error)
    }
}

/// Get the cache directory path
///
/// When `VICOHOME_CACHE_DIR` is set, that directory is used. Otherwise the
/// cache lives in `~/.vicohome`.
pub fn get_cache_dir() -> Result<PathBuf, CacheError> {
    if let Ok(cache_dir_str) = std::env::var(CACHE_DIR_ENV) {
        if !cache_dir_str.is_empty() {
            return Ok(PathBuf::from(cache_dir_str));
        }
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_CACHE_DIRECTORY_NAME))
        .ok_or(CacheError::HomeDirectoryNotFound)
}

/// Create the cache directory (and its parents) readable only by the owner.
pub fn create_private_dir(path: &std::path::Path) -> Result<(), CacheError> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)?;
    Ok(())
}

/// Write a file readable and writable only by the owner, replacing any
/// previous content.
pub fn write_private_file(path: &std::path::Path, data: &[u8]) -> Result<(), CacheError> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(())
}
