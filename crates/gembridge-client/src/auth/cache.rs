use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Fixed single-slot cache location, relative to the working directory. One
/// token per process/host context; every refresh overwrites the whole file.
pub const CACHE_FILE: &str = ".gembridge_token.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    /// Unix seconds. The credential is usable only while `now < expires_at`.
    pub expires_at: i64,
}

impl Credential {
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now.unix_timestamp() < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(OffsetDateTime::now_utc())
    }
}

/// Persists one bearer credential as JSON. Refresh is idempotent, so
/// last-writer-wins needs no locking; a lost race only costs one extra SSO
/// round trip.
#[derive(Debug, Clone)]
pub struct CredentialCache {
    path: PathBuf,
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialCache {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(CACHE_FILE),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing, unreadable, or unparseable cache file reads as "no
    /// credential", never as an error.
    pub async fn load(&self) -> Option<Credential> {
        let raw = tokio::fs::read(&self.path).await.ok()?;
        serde_json::from_slice(&raw).ok()
    }

    /// Computes the expiry from `expires_in` seconds and persists atomically
    /// (write-temp-then-rename), overwriting any prior value.
    pub async fn save(&self, token: &str, expires_in_secs: u64) -> io::Result<Credential> {
        let credential = Credential {
            token: token.to_string(),
            expires_at: OffsetDateTime::now_utc().unix_timestamp() + expires_in_secs as i64,
        };
        let payload = serde_json::to_vec(&credential)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let tmp = self.path.with_file_name(format!(
            "{}.tmp",
            self.path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(CACHE_FILE)
        ));
        tokio::fs::write(&tmp, &payload).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache() -> (tempfile::TempDir, CredentialCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::at(dir.path().join(CACHE_FILE));
        (dir, cache)
    }

    #[tokio::test]
    async fn load_returns_none_for_missing_file() {
        let (_dir, cache) = temp_cache();
        assert_eq!(cache.load().await, None);
    }

    #[tokio::test]
    async fn load_returns_none_for_garbage() {
        let (dir, cache) = temp_cache();
        tokio::fs::write(dir.path().join(CACHE_FILE), b"not json")
            .await
            .unwrap();
        assert_eq!(cache.load().await, None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (_dir, cache) = temp_cache();
        let saved = cache.save("tok-1", 3600).await.unwrap();
        let loaded = cache.load().await.unwrap();
        assert_eq!(loaded, saved);
        assert!(loaded.is_valid());
    }

    #[tokio::test]
    async fn save_overwrites_previous_credential() {
        let (_dir, cache) = temp_cache();
        cache.save("tok-1", 3600).await.unwrap();
        cache.save("tok-2", 3600).await.unwrap();
        assert_eq!(cache.load().await.unwrap().token, "tok-2");
    }

    #[tokio::test]
    async fn expired_credential_is_invalid() {
        let (_dir, cache) = temp_cache();
        cache.save("tok-1", 0).await.unwrap();
        let loaded = cache.load().await.unwrap();
        assert!(!loaded.is_valid_at(OffsetDateTime::now_utc() + time::Duration::seconds(1)));
    }
}
