use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::assets::PreparedImage;
use crate::assets::decode::decode_asset;
use crate::assets::source::ImageSource;
use crate::foundation::error::{MemoireError, MemoireResult};

/// Fetches and decodes images by reference, caching decoded results.
///
/// Preview renders run continuously, so every reference is decoded at most once per loader.
pub struct AssetLoader {
    source: Arc<dyn ImageSource>,
    cache: Mutex<HashMap<String, PreparedImage>>,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &Arc<dyn ImageSource> {
        &self.source
    }

    /// Load a single image. Failures name the reference.
    pub fn load(&self, reference: &str) -> MemoireResult<PreparedImage> {
        if let Some(hit) = self.cached(reference) {
            return Ok(hit);
        }
        let bytes = self.source.fetch(reference)?;
        let prepared = decode_asset(&bytes).map_err(|e| match e {
            MemoireError::AssetLoad { .. } => e,
            other => MemoireError::asset_load(reference, other),
        })?;
        tracing::debug!(
            reference,
            width = prepared.width,
            height = prepared.height,
            "decoded asset"
        );
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(reference.to_string(), prepared.clone());
        }
        Ok(prepared)
    }

    /// Load every reference concurrently, preserving input order.
    ///
    /// Any failure fails the whole batch; the reported error is the first failing reference in
    /// input order, independent of scheduling.
    pub fn load_all(&self, references: &[&str]) -> MemoireResult<Vec<PreparedImage>> {
        self.load_each(references).into_iter().collect()
    }

    /// Load every reference concurrently, keeping individual results.
    pub fn load_each(&self, references: &[&str]) -> Vec<MemoireResult<PreparedImage>> {
        references.par_iter().map(|r| self.load(r)).collect()
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Drop one cached reference, e.g. after its bytes were replaced.
    pub fn forget(&self, reference: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(reference);
        }
    }

    /// Forget `reference` and let the source free it if it was transient (a captured photo).
    pub fn release(&self, reference: &str) {
        self.forget(reference);
        if self.source.release(reference) {
            tracing::debug!(reference, "released photo");
        }
    }

    /// Number of decoded images currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn cached(&self, reference: &str) -> Option<PreparedImage> {
        self.cache.lock().ok()?.get(reference).cloned()
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
