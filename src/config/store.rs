//! Cached access to the broker definition file.
//!
//! # Data Flow
//! ```text
//! get(path)
//!     → lock entry
//!     → stale? (path switched, stat failed, or mtime fingerprint differs)
//!         yes → read bytes → stat → parse into scratch → swap entry
//!         no  → cache hit
//!     → deep copy of the cached configuration
//!     → unlock
//! ```
//!
//! The fingerprint is an FNV-1a hash of the modification-time string, not of
//! the file content, so touching the file forces a reload even when the bytes
//! are identical.
//!
//! A failed read or parse never touches the entry; the last good definition
//! stays cached and the next call retries the reload.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::loader::{self, ConfigError};
use crate::config::schema::Configuration;
use crate::observability::metrics;

/// Hash value meaning "no valid fingerprint"; always forces a reload.
pub const INVALID_HASH: u32 = 0;

/// Freshness metadata of the cached definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// Fingerprint of the modification time of the last read.
    pub hash: u32,
    /// Modification time of the last read, if one has succeeded.
    pub last_modified: Option<SystemTime>,
}

impl Freshness {
    /// Weak entity tag derived from the fingerprint.
    pub fn etag(&self) -> String {
        format!("W/\"{}\"", self.hash)
    }
}

/// A configuration copy together with the freshness it was read with.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub config: Configuration,
    pub freshness: Freshness,
}

#[derive(Debug, Default)]
struct CacheEntry {
    source: Option<PathBuf>,
    hash: u32,
    last_modified: Option<SystemTime>,
    config: Configuration,
}

/// Thread-safe cache of the broker definition file.
///
/// Every call takes the same lock for the full check, reload and copy, so
/// concurrent reloads are serialised and no caller ever sees a half-updated
/// entry.
#[derive(Debug, Default)]
pub struct ConfigStore {
    entry: Mutex<CacheEntry>,
}

impl ConfigStore {
    /// Create an empty store. The first `get` always reads the file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an independent copy of the definition at `path`, reloading it
    /// first if it changed on disk.
    pub fn get(&self, path: &Path) -> Result<Configuration, ConfigError> {
        self.snapshot(path).map(|snapshot| snapshot.config)
    }

    /// Like [`ConfigStore::get`], also returning the freshness metadata from
    /// the same critical section.
    pub fn snapshot(&self, path: &Path) -> Result<ConfigSnapshot, ConfigError> {
        let mut entry = self.lock();

        if is_stale(&mut entry, path) {
            reload(&mut entry, path)?;
        } else {
            tracing::debug!(path = %path.display(), "Using cached config");
            metrics::record_config_load("cached");
        }

        Ok(ConfigSnapshot {
            config: entry.config.clone(),
            freshness: Freshness {
                hash: entry.hash,
                last_modified: entry.last_modified,
            },
        })
    }

    /// Fingerprint of the last successful read, without checking the file.
    ///
    /// [`INVALID_HASH`] before the first read or after a failed stat.
    pub fn last_modified_hash(&self) -> u32 {
        self.lock().hash
    }

    /// Modification time of the last successful read, without checking the
    /// file. May lag one reload behind after a failed stat.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.lock().last_modified
    }

    // The entry is only ever replaced as a whole, so a poisoned lock still
    // guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, CacheEntry> {
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn is_stale(entry: &mut CacheEntry, path: &Path) -> bool {
    if entry.source.as_deref() != Some(path) {
        return true;
    }

    match loader::modified_at(path) {
        Ok(mtime) => fingerprint(mtime) != entry.hash,
        Err(e) => {
            tracing::warn!(error = %e, "Treating config as stale");
            entry.hash = INVALID_HASH;
            true
        }
    }
}

fn reload(entry: &mut CacheEntry, path: &Path) -> Result<(), ConfigError> {
    tracing::info!(path = %path.display(), "Reading config file and updating cache");

    let bytes = loader::read_bytes(path).inspect_err(|e| {
        tracing::error!(error = %e, "Config reload failed");
        metrics::record_config_load("read_error");
    })?;

    let (hash, last_modified) = match loader::modified_at(path) {
        Ok(mtime) => (fingerprint(mtime), Some(mtime)),
        Err(e) => {
            // Keep the previous timestamp; the sentinel hash forces the next
            // call to reload again.
            tracing::warn!(error = %e, "Config read without modification time");
            (INVALID_HASH, entry.last_modified)
        }
    };

    let config = loader::parse_config(&bytes, path).inspect_err(|e| {
        tracing::error!(error = %e, "Config reload failed, keeping last good config");
        metrics::record_config_load("parse_error");
    })?;

    tracing::info!(
        path = %path.display(),
        hash,
        targets = ?config.target_names(),
        "Config reloaded"
    );
    metrics::record_config_load("reloaded");

    *entry = CacheEntry {
        source: Some(path.to_path_buf()),
        hash,
        last_modified,
        config,
    };
    Ok(())
}

/// Fingerprint of a modification time.
pub fn fingerprint(mtime: SystemTime) -> u32 {
    let rendered = DateTime::<Utc>::from(mtime).to_rfc3339_opts(SecondsFormat::Nanos, true);
    fnv1a32(rendered.as_bytes())
}

fn fnv1a32(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    const DEFINITION: &str = r#"
server:
  basicauth:
    username: username
    password: password
cloudfoundries:
  dev:
    apiURL: https://api.dev.example.com
    uaaURL: https://uaa.dev.example.com
    username: admin
    password: secret
    labels: [dev]
"#;

    fn write_definition(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn set_mtime(path: &Path, mtime: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(fnv1a32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_first_get_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "config.yaml", DEFINITION);
        let store = ConfigStore::new();

        let config = store.get(&path).unwrap();
        assert_eq!(config.server.basic_auth.username, "username");
        assert_ne!(store.last_modified_hash(), INVALID_HASH);
        assert!(store.last_modified().is_some());
    }

    #[test]
    fn test_unchanged_file_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "config.yaml", DEFINITION);
        let store = ConfigStore::new();

        let first = store.snapshot(&path).unwrap();
        let mut second = store.snapshot(&path).unwrap();

        assert_eq!(first.freshness, second.freshness);
        assert_eq!(first.config, second.config);

        second.config.server.basic_auth.username = "bla".into();
        second
            .config
            .targets
            .get_mut("dev")
            .unwrap()
            .labels
            .push("mutated".into());

        assert_ne!(first.config, second.config);
        assert_eq!(store.get(&path).unwrap(), first.config);
    }

    #[test]
    fn test_touching_file_forces_reload() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "config.yaml", DEFINITION);
        let store = ConfigStore::new();

        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        set_mtime(&path, base);
        let before = store.snapshot(&path).unwrap().freshness;

        set_mtime(&path, base + Duration::from_secs(60));
        let after = store.snapshot(&path).unwrap().freshness;

        assert_ne!(before.hash, after.hash);
        assert_eq!(after.last_modified, Some(base + Duration::from_secs(60)));
    }

    #[test]
    fn test_switching_path_forces_reload() {
        let dir = TempDir::new().unwrap();
        let first = write_definition(&dir, "first.yaml", DEFINITION);
        let second = write_definition(
            &dir,
            "second.yaml",
            &DEFINITION.replace("username: username", "username: other"),
        );

        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        set_mtime(&first, mtime);
        set_mtime(&second, mtime);

        let store = ConfigStore::new();
        let a = store.snapshot(&first).unwrap();
        let b = store.snapshot(&second).unwrap();

        assert_eq!(a.freshness.hash, b.freshness.hash);
        assert_eq!(a.config.server.basic_auth.username, "username");
        assert_eq!(b.config.server.basic_auth.username, "other");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let store = ConfigStore::new();
        let err = store.get(Path::new("./xxx.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(store.last_modified_hash(), INVALID_HASH);
    }

    #[test]
    fn test_bad_edit_keeps_last_good_config() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "config.yaml", DEFINITION);
        let store = ConfigStore::new();

        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        set_mtime(&path, base);
        let good = store.snapshot(&path).unwrap();

        fs::write(&path, "server: [not, a, mapping]\n").unwrap();
        set_mtime(&path, base + Duration::from_secs(5));

        let err = store.get(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(store.last_modified_hash(), good.freshness.hash);
        assert_eq!(store.last_modified(), good.freshness.last_modified);

        // Still stale: the next call retries and fails again.
        assert!(store.get(&path).is_err());

        fs::write(&path, DEFINITION).unwrap();
        set_mtime(&path, base + Duration::from_secs(10));
        assert_eq!(store.get(&path).unwrap(), good.config);
        assert_ne!(store.last_modified_hash(), good.freshness.hash);
    }

    #[test]
    fn test_deleted_file_after_read_fails_and_invalidates_hash() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "config.yaml", DEFINITION);
        let store = ConfigStore::new();
        store.get(&path).unwrap();

        fs::remove_file(&path).unwrap();

        let err = store.get(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(store.last_modified_hash(), INVALID_HASH);
    }

    #[test]
    fn test_concurrent_gets_agree() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "config.yaml", DEFINITION);
        let store = Arc::new(ConfigStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let path = path.clone();
                std::thread::spawn(move || store.snapshot(&path).unwrap())
            })
            .collect();

        let snapshots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for snapshot in &snapshots {
            assert_eq!(snapshot.freshness, snapshots[0].freshness);
            assert_eq!(snapshot.config, snapshots[0].config);
        }
    }

    #[test]
    fn test_etag_format() {
        let freshness = Freshness {
            hash: 42,
            last_modified: None,
        };
        assert_eq!(freshness.etag(), "W/\"42\"");
    }
}
