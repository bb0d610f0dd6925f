//! File-backed `nrows -> Dataset` store
//!
//! The whole mapping lives in one bincode file that is read fully on access
//! and rewritten fully on update. Updates go through a temporary file in the
//! same directory followed by an atomic rename, so readers never see a
//! half-written store. Concurrent writers from different processes still race:
//! the last rename wins and drops the other writer's key.

use crate::dataset::Dataset;
use crate::error::{FarecastError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

type CacheMap = BTreeMap<usize, Dataset>;

/// Shape of one stored entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSummary {
    pub nrows: usize,
    pub n_samples: usize,
    pub n_features: usize,
}

/// Persistent cache of prepared datasets keyed by `nrows`
#[derive(Debug)]
pub struct FeatureCache {
    path: PathBuf,
}

impl FeatureCache {
    /// Bind a cache to `path`, creating missing parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    FarecastError::CacheError(format!(
                        "Failed to create cache directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        debug!(path = %path.display(), "Opened feature cache");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored dataset for exactly `nrows`.
    ///
    /// A missing store file is created empty.
    pub fn get(&self, nrows: usize) -> Result<Option<Dataset>> {
        let mut map = match self.read_map()? {
            Some(map) => map,
            None => {
                let empty = CacheMap::new();
                self.write_map(&empty)?;
                debug!(path = %self.path.display(), "Created empty feature cache");
                empty
            }
        };

        Ok(map.remove(&nrows))
    }

    /// Store `dataset` under `nrows`, keeping every other key, and hand it back.
    pub fn put(&self, nrows: usize, dataset: Dataset) -> Result<Dataset> {
        let stored = self.read_map()?.unwrap_or_default();

        // Borrowed view; the new entry is never copied.
        let entries = {
            let mut map: BTreeMap<usize, &Dataset> =
                stored.iter().map(|(k, v)| (*k, v)).collect();
            map.insert(nrows, &dataset);
            self.write_map(&map)?;
            map.len()
        };

        info!(nrows, entries, "Stored dataset in cache");
        Ok(dataset)
    }

    /// Return the cached dataset for `nrows`, computing and storing it on a miss.
    pub fn load_or_compute<F>(&self, nrows: usize, compute: F) -> Result<Dataset>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        if let Some(dataset) = self.get(nrows)? {
            info!(nrows, samples = dataset.n_samples(), "Cache hit");
            return Ok(dataset);
        }

        info!(nrows, "Cache miss, computing dataset");
        let dataset = compute()?;
        self.put(nrows, dataset)
    }

    /// Stored keys in ascending order
    pub fn keys(&self) -> Result<Vec<usize>> {
        Ok(self
            .read_map()?
            .map(|map| map.into_keys().collect())
            .unwrap_or_default())
    }

    /// Shapes of all stored entries in key order
    pub fn summary(&self) -> Result<Vec<CacheSummary>> {
        Ok(self
            .read_map()?
            .unwrap_or_default()
            .iter()
            .map(|(nrows, dataset)| CacheSummary {
                nrows: *nrows,
                n_samples: dataset.n_samples(),
                n_features: dataset.n_features(),
            })
            .collect())
    }

    /// Delete the store file. The next `get` starts from an empty store.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Cleared feature cache");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FarecastError::CacheError(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Release the store. File handles never outlive a single call, so this
    /// only marks the end of use.
    pub fn close(self) {
        debug!(path = %self.path.display(), "Closed feature cache");
    }

    /// `None` when the file does not exist. Unreadable contents count as an
    /// empty store.
    fn read_map(&self) -> Result<Option<CacheMap>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FarecastError::CacheError(format!(
                    "Failed to open {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            FarecastError::CacheError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        if bytes.is_empty() {
            return Ok(Some(CacheMap::new()));
        }

        match bincode::deserialize::<CacheMap>(&bytes) {
            Ok(map) => Ok(Some(map)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cache file is unreadable, starting from an empty store"
                );
                Ok(Some(CacheMap::new()))
            }
        }
    }

    fn write_map<M: Serialize>(&self, map: &M) -> Result<()> {
        let bytes = bincode::serialize(map)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
            FarecastError::CacheError(format!(
                "Failed to create temporary file in {}: {}",
                dir.display(),
                e
            ))
        })?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;

        tmp.persist(&self.path).map_err(|e| {
            FarecastError::CacheError(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}
