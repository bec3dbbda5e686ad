//! Value-store loading with an explicit per-index cache.
//!
//! Fetching is behind the `ValueFetcher` trait so tests can count calls
//! and inject failures without touching a filesystem. The cache is
//! owned by the loader, never global: successful loads are cached until
//! invalidated, failed loads are never cached, so a transient transport
//! failure is retried on the next request instead of poisoning the
//! session.

use std::fs;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::accessor::ValueStore;
use crate::error::AtlasError;
use crate::registry::{index_definition, IndexId};
use crate::schema::{
    validate_hdi_values, validate_oecd_bli_values, validate_whr_values, HdiValues, OecdBliValues,
    WhrValues,
};

/// Source of raw value documents, one per index.
pub trait ValueFetcher {
    fn fetch(&self, id: IndexId) -> Result<String, AtlasError>;
}

/// Fetcher backed by a data directory of JSON artifacts.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    data_dir: PathBuf,
}

impl FsFetcher {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        FsFetcher {
            data_dir: data_dir.into(),
        }
    }
}

impl ValueFetcher for FsFetcher {
    fn fetch(&self, id: IndexId) -> Result<String, AtlasError> {
        let path = self.data_dir.join(index_definition(id).data_file);
        fs::read_to_string(&path)
            .map_err(|e| AtlasError::transport(path.display().to_string(), e.to_string()))
    }
}

/// Parse and range-check one raw document into its tagged store.
///
/// Any shape-contract failure of a value file is a `Validation` error,
/// the same category as an out-of-range value.
fn parse_store(id: IndexId, body: &str) -> Result<ValueStore, AtlasError> {
    let what = index_definition(id).data_file;
    match id {
        IndexId::Hdi => {
            let values: HdiValues = serde_json::from_str(body)
                .map_err(|e| AtlasError::validation(what, e.to_string()))?;
            validate_hdi_values(&values)?;
            Ok(ValueStore::Hdi(values))
        }
        IndexId::Whr => {
            let values: WhrValues = serde_json::from_str(body)
                .map_err(|e| AtlasError::validation(what, e.to_string()))?;
            validate_whr_values(&values)?;
            Ok(ValueStore::Whr(values))
        }
        IndexId::OecdBli => {
            let values: OecdBliValues = serde_json::from_str(body)
                .map_err(|e| AtlasError::validation(what, e.to_string()))?;
            validate_oecd_bli_values(&values)?;
            Ok(ValueStore::OecdBli(values))
        }
    }
}

/// Caching loader over a fetcher.
pub struct ValueLoader<F: ValueFetcher> {
    fetcher: F,
    cache: FxHashMap<IndexId, ValueStore>,
}

impl<F: ValueFetcher> ValueLoader<F> {
    pub fn new(fetcher: F) -> Self {
        ValueLoader {
            fetcher,
            cache: FxHashMap::default(),
        }
    }

    /// The store for `id`, fetching and validating on first use.
    pub fn load(&mut self, id: IndexId) -> Result<&ValueStore, AtlasError> {
        if !self.cache.contains_key(&id) {
            let body = self.fetcher.fetch(id)?;
            let store = parse_store(id, &body)?;
            debug!(index = id.as_str(), entries = store.len(), "loaded value store");
            self.cache.insert(id, store);
        }
        Ok(&self.cache[&id])
    }

    /// The cached store, without triggering a fetch.
    pub fn cached(&self, id: IndexId) -> Option<&ValueStore> {
        self.cache.get(&id)
    }

    pub fn invalidate(&mut self, id: IndexId) {
        self.cache.remove(&id);
    }

    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }
}
