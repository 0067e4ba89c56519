//! File-backed data store: touchpoints, the metadata registry, and reports.
//!
//! All state lives under one data directory:
//!
//! - `touchpoints.json` — every touchpoint, in creation order
//! - `metadata.json` — the valid categories and tags
//! - `reports/` — one markdown file per report
//!
//! Both JSON files are rewritten whole on every mutation through
//! [`atomic_write`], so readers never see a partial file.
//!
//! # Locking
//!
//! Two reader/writer locks guard the JSON files. Any operation that needs
//! both takes the touchpoint lock first and the metadata lock second, always
//! through [`Store::lock_touchpoints_then_metadata`] or its shared-mode twin
//! [`Store::read_touchpoints_then_metadata`]. Metadata operations never
//! touch the touchpoint lock.

pub mod error;
pub mod metadata;
pub mod reports;
pub mod sanitize;
pub mod stats;
pub mod touchpoints;
pub mod types;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use error::{StoreError, StoreResult};
pub use types::{Metadata, Touchpoint, TouchpointFilter, TouchpointInput};

const TOUCHPOINTS_FILE: &str = "touchpoints.json";
const METADATA_FILE: &str = "metadata.json";
const REPORTS_DIR: &str = "reports";

/// Handle to one data directory. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Store {
    data_dir: PathBuf,
    touchpoints_lock: RwLock<()>,
    metadata_lock: RwLock<()>,
}

impl Store {
    /// Open (or initialize) the store rooted at `data_dir`.
    ///
    /// Creates the directory and `reports/`, writes an empty touchpoint list
    /// if none exists, and seeds the default vocabulary if `metadata.json` is
    /// missing. Existing files are never touched.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let store = Self {
            data_dir,
            touchpoints_lock: RwLock::new(()),
            metadata_lock: RwLock::new(()),
        };

        std::fs::create_dir_all(store.reports_dir())?;

        let touchpoints_path = store.touchpoints_path();
        if !touchpoints_path.exists() {
            write_json(&touchpoints_path, &Vec::<Touchpoint>::new())?;
            tracing::info!(path = %touchpoints_path.display(), "created empty touchpoint file");
        }

        let metadata_path = store.metadata_path();
        if !metadata_path.exists() {
            let seed = Metadata::seed();
            write_json(&metadata_path, &seed)?;
            tracing::info!(
                path = %metadata_path.display(),
                categories = seed.categories.len(),
                tags = seed.tags.len(),
                "seeded default metadata"
            );
        }

        tracing::info!(data_dir = %store.data_dir.display(), "store ready");
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub(crate) fn touchpoints_path(&self) -> PathBuf {
        self.data_dir.join(TOUCHPOINTS_FILE)
    }

    pub(crate) fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(METADATA_FILE)
    }

    pub(crate) fn reports_dir(&self) -> PathBuf {
        self.data_dir.join(REPORTS_DIR)
    }

    pub(crate) fn read_touchpoints_lock(&self) -> StoreResult<RwLockReadGuard<'_, ()>> {
        self.touchpoints_lock
            .read()
            .map_err(|_| StoreError::LockPoisoned("touchpoint"))
    }

    pub(crate) fn write_touchpoints_lock(&self) -> StoreResult<RwLockWriteGuard<'_, ()>> {
        self.touchpoints_lock
            .write()
            .map_err(|_| StoreError::LockPoisoned("touchpoint"))
    }

    pub(crate) fn read_metadata_lock(&self) -> StoreResult<RwLockReadGuard<'_, ()>> {
        self.metadata_lock
            .read()
            .map_err(|_| StoreError::LockPoisoned("metadata"))
    }

    pub(crate) fn write_metadata_lock(&self) -> StoreResult<RwLockWriteGuard<'_, ()>> {
        self.metadata_lock
            .write()
            .map_err(|_| StoreError::LockPoisoned("metadata"))
    }

    /// Exclusive touchpoint lock, then shared metadata lock.
    ///
    /// Both locks are only ever taken together through this helper or
    /// [`Store::read_touchpoints_then_metadata`]; reversing the order anywhere
    /// would allow a deadlock.
    pub(crate) fn lock_touchpoints_then_metadata(
        &self,
    ) -> StoreResult<(RwLockWriteGuard<'_, ()>, RwLockReadGuard<'_, ()>)> {
        let touchpoints = self.write_touchpoints_lock()?;
        let metadata = self.read_metadata_lock()?;
        Ok((touchpoints, metadata))
    }

    /// Shared touchpoint lock, then shared metadata lock. Same order as
    /// [`Store::lock_touchpoints_then_metadata`].
    pub(crate) fn read_touchpoints_then_metadata(
        &self,
    ) -> StoreResult<(RwLockReadGuard<'_, ()>, RwLockReadGuard<'_, ()>)> {
        let touchpoints = self.read_touchpoints_lock()?;
        let metadata = self.read_metadata_lock()?;
        Ok((touchpoints, metadata))
    }
}

/// Read and decode a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Encode `value` as pretty JSON and atomically replace `path` with it.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let data = serde_json::to_vec_pretty(value)?;
    atomic_write(path, &data)
}

/// Write to a sibling temp file, then rename over `path`.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, data)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
