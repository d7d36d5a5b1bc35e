use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use super::loader::SpecLoader;
use super::model::SpecModel;
use crate::error::SpecFormatError;

/// Identity of a document on disk: modification time plus length, for the olog
/// and (when present) its intentionality companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSignature {
    modified: Option<SystemTime>,
    len: u64,
    intent: Option<(Option<SystemTime>, u64)>,
}

impl DocumentSignature {
    pub fn of(loader: &SpecLoader, path: &Path) -> Result<Self, SpecFormatError> {
        let meta = std::fs::metadata(path).map_err(|source| SpecFormatError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let intent = loader
            .intentionality_path(path)
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| (m.modified().ok(), m.len()));
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
            intent,
        })
    }
}

struct CacheEntry {
    signature: DocumentSignature,
    model: Arc<SpecModel>,
}

/// Load-once cache of parsed ologs, keyed by path and document signature.
///
/// Construct one per process (or per test); there is no global instance. An
/// unchanged document yields the same `Arc` on every call; a changed one is
/// re-parsed and replaces the entry, while callers holding the old `Arc` keep
/// reading the old model.
pub struct SpecCache {
    loader: SpecLoader,
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl SpecCache {
    pub fn new(loader: SpecLoader) -> Self {
        Self {
            loader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn loader(&self) -> &SpecLoader {
        &self.loader
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Arc<SpecModel>, SpecFormatError> {
        let key = cache_key(path);
        let signature = DocumentSignature::of(&self.loader, &key)?;

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(&key)
            && entry.signature == signature
        {
            tracing::debug!(path = %key.display(), "olog cache hit");
            return Ok(Arc::clone(&entry.model));
        }

        let model = Arc::new(self.loader.load_path(&key)?);
        entries.insert(
            key,
            CacheEntry {
                signature,
                model: Arc::clone(&model),
            },
        );
        Ok(model)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&self, path: &Path) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&cache_key(path)).is_some()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SpecCache {
    fn default() -> Self {
        Self::new(SpecLoader::default())
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Live-reloadable model holder.
///
/// Wraps `SpecModel` in an `ArcSwap` so readers never block and a reload
/// atomically swaps the pointer. A request that took a snapshot with
/// [`SpecHandle::load_full`] finishes against that snapshot even if a reload
/// lands mid-request.
pub struct SpecHandle {
    inner: Arc<ArcSwap<SpecModel>>,
    signature: Arc<Mutex<DocumentSignature>>,
    loader: SpecLoader,
    path: PathBuf,
}

impl SpecHandle {
    pub fn open(loader: SpecLoader, path: impl Into<PathBuf>) -> Result<Self, SpecFormatError> {
        let path = path.into();
        let signature = DocumentSignature::of(&loader, &path)?;
        let model = loader.load_path(&path)?;
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(model)),
            signature: Arc::new(Mutex::new(signature)),
            loader,
            path,
        })
    }

    /// Current snapshot. Lock-free.
    pub fn load(&self) -> arc_swap::Guard<Arc<SpecModel>> {
        self.inner.load()
    }

    pub fn load_full(&self) -> Arc<SpecModel> {
        self.inner.load_full()
    }

    /// Re-read the document and swap it in. On error the active model is
    /// left untouched.
    pub fn reload(&self) -> Result<(), SpecFormatError> {
        let mut signature = self.lock_signature();
        self.reload_locked(&mut signature)
    }

    /// Reload only when the document signature changed. Returns whether a
    /// new model was swapped in.
    pub fn reload_if_changed(&self) -> Result<bool, SpecFormatError> {
        let mut signature = self.lock_signature();
        if *signature == DocumentSignature::of(&self.loader, &self.path)? {
            return Ok(false);
        }
        self.reload_locked(&mut signature)?;
        Ok(true)
    }

    /// Swap in a model built elsewhere.
    pub fn store(&self, model: SpecModel) {
        let _writer = self.lock_signature();
        self.inner.store(Arc::new(model));
    }

    // The signature lock doubles as the writer lock: the stored model and
    // its signature always change together.
    fn lock_signature(&self) -> MutexGuard<'_, DocumentSignature> {
        self.signature.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reload_locked(&self, signature: &mut DocumentSignature) -> Result<(), SpecFormatError> {
        let current = DocumentSignature::of(&self.loader, &self.path)?;
        let fresh = self.loader.load_path(&self.path)?;
        self.inner.store(Arc::new(fresh));
        *signature = current;
        tracing::info!(path = %self.path.display(), "olog hot-reloaded");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clone for SpecHandle {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            signature: Arc::clone(&self.signature),
            loader: self.loader.clone(),
            path: self.path.clone(),
        }
    }
}
