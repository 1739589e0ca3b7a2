//! On-disk cache of patch collections.
//!
//! The cache is gzip-compressed JSON:
//!
//! ```text
//! { "version": 1, "collection": { "patches": [...], "n_cells": N, "fingerprint": {...} } }
//! ```
//!
//! A cache is only used when its fingerprint matches the mesh being drawn.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use netcdf_parser::MpasMesh;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::builder::build_patches;
use crate::error::{PatchError, PatchResult};
use crate::{MeshFingerprint, PatchCollection};

const CACHE_VERSION: u32 = 1;

/// File name used when no cache path is configured.
pub fn default_cache_name(n_cells: usize) -> String {
    format!("mpas_patches_{}.json.gz", n_cells)
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    collection: PatchCollection,
}

/// How [`PatchCache::load_or_build`] obtained its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Read from a valid cache file
    Hit,
    /// No cache existed; built and written
    Built,
    /// Cache was unreadable or for another mesh; rebuilt and rewritten
    Rebuilt,
}

/// Patch cache stored at a single path.
#[derive(Debug, Clone)]
pub struct PatchCache {
    path: PathBuf,
}

impl PatchCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache in `dir` named after the mesh's cell count.
    pub fn in_dir(dir: impl AsRef<Path>, n_cells: usize) -> Self {
        Self::new(dir.as_ref().join(default_cache_name(n_cells)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached collection, checking it against `expected`.
    pub fn load(&self, expected: MeshFingerprint) -> PatchResult<PatchCollection> {
        let file = File::open(&self.path).map_err(|e| PatchError::io(&self.path, e))?;
        let reader = BufReader::new(GzDecoder::new(file));
        let cached: CacheFile =
            serde_json::from_reader(reader).map_err(|source| PatchError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        if cached.version != CACHE_VERSION {
            return Err(PatchError::UnsupportedVersion {
                expected: CACHE_VERSION,
                found: cached.version,
            });
        }
        let found = cached.collection.fingerprint();
        if found != expected {
            return Err(PatchError::Stale {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(cached.collection)
    }

    /// Write `collection`, replacing any previous cache.
    ///
    /// Data goes to a sibling temporary file first and is renamed into
    /// place, so readers never see a half-written cache.
    pub fn store(&self, collection: &PatchCollection) -> PatchResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PatchError::io(parent, e))?;
        }

        let tmp = self.path.with_extension("tmp");
        let file = File::create(&tmp).map_err(|e| PatchError::io(&tmp, e))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        let cached = CacheFile {
            version: CACHE_VERSION,
            collection: collection.clone(),
        };
        serde_json::to_writer(&mut encoder, &cached)?;
        encoder
            .finish()
            .and_then(|mut w| w.flush())
            .map_err(|e| PatchError::io(&tmp, e))?;

        fs::rename(&tmp, &self.path).map_err(|e| PatchError::io(&self.path, e))
    }

    /// Load the cache for `mesh`, or build the patches and write them.
    ///
    /// Problems with the cache file are logged and never fatal: a corrupt
    /// or stale cache is rebuilt, and a failed write still returns the
    /// freshly built collection.
    pub fn load_or_build(&self, mesh: &MpasMesh) -> (PatchCollection, CacheOutcome) {
        let expected = MeshFingerprint::of(mesh);

        let outcome = if self.path.exists() {
            match self.load(expected) {
                Ok(collection) => {
                    info!(
                        path = %self.path.display(),
                        patches = collection.len(),
                        "Loaded patch collection from cache"
                    );
                    return (collection, CacheOutcome::Hit);
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Rebuilding patch cache");
                    CacheOutcome::Rebuilt
                }
            }
        } else {
            CacheOutcome::Built
        };

        let start = Instant::now();
        let collection = build_patches(mesh);
        info!(
            patches = collection.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Patch collection built"
        );

        match self.store(&collection) {
            Ok(()) => info!(path = %self.path.display(), "Wrote patch cache"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Could not write patch cache"),
        }

        (collection, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plot_common::GeoPolygon;

    fn fingerprint(n_cells: usize) -> MeshFingerprint {
        MeshFingerprint {
            n_cells,
            n_vertices: 4,
            vertex_crc: 0xdead_beef,
        }
    }

    fn collection() -> PatchCollection {
        PatchCollection::new(
            vec![GeoPolygon::new(
                0,
                vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            )],
            fingerprint(1),
        )
    }

    #[test]
    fn test_default_name() {
        assert_eq!(default_cache_name(40962), "mpas_patches_40962.json.gz");
        let cache = PatchCache::in_dir("/tmp/x", 2562);
        assert_eq!(cache.path(), Path::new("/tmp/x/mpas_patches_2562.json.gz"));
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PatchCache::new(dir.path().join("nested/patches.json.gz"));
        cache.store(&collection()).unwrap();

        let loaded = cache.load(fingerprint(1)).unwrap();
        assert_eq!(loaded, collection());
        assert!(!dir.path().join("nested/patches.json.tmp").exists());
    }

    #[test]
    fn test_fingerprint_mismatch_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PatchCache::new(dir.path().join("p.json.gz"));
        cache.store(&collection()).unwrap();

        let err = cache.load(fingerprint(2)).unwrap_err();
        assert!(matches!(err, PatchError::Stale { .. }));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json.gz");
        fs::write(&path, b"not gzip at all").unwrap();

        let err = PatchCache::new(&path).load(fingerprint(1)).unwrap_err();
        assert!(matches!(err, PatchError::Corrupt { .. }));
    }
}
