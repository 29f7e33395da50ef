use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::CacheResult;

type AssetEntry = BTreeMap<String, String>;

/// Durable `(asset_id, filename) -> validator` store.
///
/// In-memory map in front of one JSON file per asset. The map lock is never
/// held across IO; instead each asset has a persistence gate that serializes
/// snapshot-and-write, so concurrent puts for files of one asset cannot land
/// an older snapshot last. Distinct assets never block each other.
#[derive(Clone)]
pub struct ValidatorCache {
    root: PathBuf,
    entries: Arc<RwLock<HashMap<String, AssetEntry>>>,
    gates: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ValidatorCache {
    /// Open a cache rooted at `<root>/cache`. Nothing is read eagerly;
    /// per-asset files load on first touch.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Arc::new(RwLock::new(HashMap::new())),
            gates: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    fn asset_path(&self, asset_id: &str) -> PathBuf {
        self.cache_dir().join(asset_id)
    }

    /// Last validator observed for `(asset_id, filename)`, if any.
    ///
    /// Unreadable or corrupt state degrades to `None` (cold start).
    pub async fn get(&self, asset_id: &str, filename: &str) -> Option<String> {
        self.ensure_loaded(asset_id).await;
        self.entries
            .read()
            .get(asset_id)
            .and_then(|entry| entry.get(filename))
            .cloned()
    }

    /// Record `validator` for `(asset_id, filename)` and persist the asset's
    /// entry. Re-recording an unchanged validator is a no-op with no disk
    /// write.
    pub async fn put(&self, asset_id: &str, filename: &str, validator: &str) -> CacheResult<()> {
        self.ensure_loaded(asset_id).await;

        // Snapshot and write under the asset's gate: each write carries every
        // record committed before it, in commit order.
        let gate = self.gate(asset_id);
        let _persisting = gate.lock().await;

        let snapshot = {
            let mut entries = self.entries.write();
            let entry = entries.entry(asset_id.to_string()).or_default();
            if entry.get(filename).map(String::as_str) == Some(validator) {
                return Ok(());
            }
            entry.insert(filename.to_string(), validator.to_string());
            entry.clone()
        };

        tokio::fs::create_dir_all(self.cache_dir()).await?;
        let body = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(self.asset_path(asset_id), body).await?;
        debug!(asset_id, filename, "cache record persisted");
        Ok(())
    }

    fn gate(&self, asset_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.gates
            .lock()
            .entry(asset_id.to_string())
            .or_default()
            .clone()
    }

    /// Load the asset's file from disk into memory, once.
    async fn ensure_loaded(&self, asset_id: &str) {
        if self.entries.read().contains_key(asset_id) {
            return;
        }
        let loaded = self.read_entry(&self.asset_path(asset_id)).await;
        self.entries
            .write()
            .entry(asset_id.to_string())
            .or_insert(loaded);
    }

    async fn read_entry(&self, path: &Path) -> AssetEntry {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return AssetEntry::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable cache entry, starting cold");
                return AssetEntry::new();
            }
        };
        match serde_json::from_slice(&data) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %path.display(), %err, "corrupt cache entry, starting cold");
                AssetEntry::new()
            }
        }
    }
}
