//! Where image bytes come from.
//!
//! Asset references are opaque strings. A source either knows a reference or it does not;
//! [`ChainSource`] lets session-captured photos (in memory) shadow files on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::Context;

use crate::foundation::error::{MemoireError, MemoireResult};

/// Reference prefix used for images held by a [`MemoryImageSource`].
pub const MEMORY_SCHEME: &str = "memory:";

/// Load-by-reference access to encoded image bytes.
pub trait ImageSource: Send + Sync {
    /// Whether this source can resolve `reference`.
    fn contains(&self, reference: &str) -> bool;

    /// Encoded bytes for `reference`. Failures are [`MemoireError::AssetLoad`].
    fn fetch(&self, reference: &str) -> MemoireResult<Arc<Vec<u8>>>;

    /// Drop a transient entry this source minted. Returns whether anything was freed.
    ///
    /// Durable sources keep everything.
    fn release(&self, _reference: &str) -> bool {
        false
    }
}

/// Files under a root directory, addressed by relative path.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, reference: &str) -> MemoireResult<PathBuf> {
        let rel = normalize_rel_path(reference)?;
        Ok(self.root.join(rel))
    }
}

impl ImageSource for FsImageSource {
    fn contains(&self, reference: &str) -> bool {
        self.resolve(reference).is_ok_and(|p| p.is_file())
    }

    fn fetch(&self, reference: &str) -> MemoireResult<Arc<Vec<u8>>> {
        let path = self
            .resolve(reference)
            .map_err(|e| MemoireError::asset_load(reference, e))?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read {}", path.display()))
            .map_err(|e| MemoireError::asset_load(reference, format!("{e:#}")))?;
        Ok(Arc::new(bytes))
    }
}

/// Encoded images kept in memory, e.g. photos taken during the session.
#[derive(Debug, Default)]
pub struct MemoryImageSource {
    entries: RwLock<HashMap<String, Arc<Vec<u8>>>>,
    next_seq: AtomicU64,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under a fresh `memory:` reference and return it.
    pub fn put(&self, bytes: Vec<u8>) -> MemoireResult<String> {
        let n = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let reference = format!("{MEMORY_SCHEME}photo-{n}");
        self.insert(reference.clone(), bytes)?;
        Ok(reference)
    }

    pub fn insert(&self, reference: impl Into<String>, bytes: Vec<u8>) -> MemoireResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| MemoireError::render("memory image source lock poisoned"))?;
        entries.insert(reference.into(), Arc::new(bytes));
        Ok(())
    }

    pub fn remove(&self, reference: &str) -> bool {
        self.entries
            .write()
            .map(|mut e| e.remove(reference).is_some())
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut e) = self.entries.write() {
            e.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageSource for MemoryImageSource {
    fn contains(&self, reference: &str) -> bool {
        self.entries
            .read()
            .map(|e| e.contains_key(reference))
            .unwrap_or(false)
    }

    fn fetch(&self, reference: &str) -> MemoireResult<Arc<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| MemoireError::asset_load(reference, "memory source lock poisoned"))?;
        entries
            .get(reference)
            .cloned()
            .ok_or_else(|| MemoireError::asset_load(reference, "no such in-memory image"))
    }

    /// Only `memory:` references are released; entries inserted under other names stay.
    fn release(&self, reference: &str) -> bool {
        reference.starts_with(MEMORY_SCHEME) && self.remove(reference)
    }
}

/// Try each source in order; the first that contains a reference serves it.
#[derive(Clone, Default)]
pub struct ChainSource {
    sources: Vec<Arc<dyn ImageSource>>,
}

impl ChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: Arc<dyn ImageSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl ImageSource for ChainSource {
    fn contains(&self, reference: &str) -> bool {
        self.sources.iter().any(|s| s.contains(reference))
    }

    fn fetch(&self, reference: &str) -> MemoireResult<Arc<Vec<u8>>> {
        match self.sources.iter().find(|s| s.contains(reference)) {
            Some(s) => s.fetch(reference),
            None => Err(MemoireError::asset_load(reference, "not found in any source")),
        }
    }

    fn release(&self, reference: &str) -> bool {
        self.sources
            .iter()
            .fold(false, |freed, s| s.release(reference) || freed)
    }
}

impl std::fmt::Debug for ChainSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainSource")
            .field("sources", &self.sources.len())
            .finish()
    }
}

/// Normalize and validate a root-relative asset path.
///
/// The result uses `/` separators and drops `.` segments. Absolute paths and `..` are rejected.
pub fn normalize_rel_path(source: &str) -> MemoireResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(MemoireError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(MemoireError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                return Err(MemoireError::validation(
                    "asset paths must not contain '..'",
                ));
            }
            p => out.push(p),
        }
    }
    if out.is_empty() {
        return Err(MemoireError::validation("asset path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
