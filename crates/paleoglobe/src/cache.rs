//! Cache abstractions for fetched payloads.
//!
//! Elevation grids and rotation catalogs are fetched once per session, but a
//! reload (or a second service pointed at the same source) should not hit the
//! network again.
//!
//! # Implementations
//!
//! - [`MemoryCache`]: In-memory cache with an optional byte budget
//! - [`NoCache`]: Passthrough implementation that caches nothing

use crate::error::{Error, Result};
use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    pin::Pin,
    sync::{Arc, PoisonError, RwLock},
};

/// Future type for cache get operations.
pub type GetFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>>> + Send + 'a>>;

/// Future type for cache put/remove operations.
pub type CacheFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Future type for cache contains operations.
pub type ContainsFuture<'a> = Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>>;

/// A store for raw payload bytes, keyed by source.
///
/// Keys are the canonical form of a [`Source`](crate::Source): the resolved
/// URL, or a `file://` path.
pub trait Cache: Send + Sync {
    /// Look up a payload. `Ok(None)` means not cached.
    fn get(&self, key: &str) -> GetFuture<'_>;

    /// Store a payload under `key`, replacing any previous one.
    fn put(&self, key: &str, data: Vec<u8>) -> CacheFuture<'_>;

    /// Check for a payload without retrieving it.
    fn contains(&self, key: &str) -> ContainsFuture<'_>;

    /// Drop the payload stored under `key`, if any.
    fn remove(&self, key: &str) -> CacheFuture<'_>;

    /// Drop every payload.
    fn clear(&self) -> CacheFuture<'_>;
}

/// A cache that stores nothing.
#[derive(Debug, Clone, Default)]
pub struct NoCache;

impl NoCache {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Cache for NoCache {
    fn get(&self, _key: &str) -> GetFuture<'_> {
        Box::pin(async { Ok(None) })
    }

    fn put(&self, _key: &str, _data: Vec<u8>) -> CacheFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn contains(&self, _key: &str) -> ContainsFuture<'_> {
        Box::pin(async { Ok(false) })
    }

    fn remove(&self, _key: &str) -> CacheFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn clear(&self) -> CacheFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

/// An in-memory cache shared between clones.
///
/// With a byte budget set, storing a payload first evicts the oldest entries
/// until the new one fits. A payload larger than the whole budget is still
/// stored, alone.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    inner: Arc<RwLock<MemoryCacheInner>>,
    max_size: Option<usize>,
}

#[derive(Debug, Default)]
struct MemoryCacheInner {
    entries: HashMap<String, Vec<u8>>,
    /// Keys from oldest to newest insertion.
    order: VecDeque<String>,
    current_size: usize,
}

impl MemoryCacheInner {
    fn remove(&mut self, key: &str) {
        if let Some(old) = self.entries.remove(key) {
            self.current_size -= old.len();
            self.order.retain(|k| k != key);
        }
    }
}

fn poisoned<T>(operation: &'static str) -> impl FnOnce(PoisonError<T>) -> Error {
    move |e| Error::Cache {
        operation,
        message: e.to_string(),
    }
}

impl MemoryCache {
    /// Create an unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `max_size` bytes of payload.
    #[must_use]
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            inner: Arc::default(),
            max_size: Some(max_size),
        }
    }

    /// Total payload bytes currently held.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current_size
    }

    /// Number of cached payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_sync(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let inner = self.inner.read().map_err(poisoned("get"))?;
        Ok(inner.entries.get(key).cloned())
    }

    fn put_sync(&self, key: &str, data: Vec<u8>) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned("put"))?;
        inner.remove(key);

        let data_size = data.len();
        if let Some(max_size) = self.max_size {
            while inner.current_size + data_size > max_size {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                if let Some(old) = inner.entries.remove(&oldest) {
                    inner.current_size -= old.len();
                    tracing::trace!(key = %oldest, "evicted cached payload");
                }
            }
        }

        inner.entries.insert(key.to_owned(), data);
        inner.order.push_back(key.to_owned());
        inner.current_size += data_size;
        Ok(())
    }

    fn contains_sync(&self, key: &str) -> Result<bool> {
        let inner = self.inner.read().map_err(poisoned("contains"))?;
        Ok(inner.entries.contains_key(key))
    }

    fn remove_sync(&self, key: &str) -> Result<()> {
        self.inner.write().map_err(poisoned("remove"))?.remove(key);
        Ok(())
    }

    fn clear_sync(&self) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned("clear"))?;
        inner.entries.clear();
        inner.order.clear();
        inner.current_size = 0;
        Ok(())
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> GetFuture<'_> {
        let result = self.get_sync(key);
        Box::pin(async move { result })
    }

    fn put(&self, key: &str, data: Vec<u8>) -> CacheFuture<'_> {
        let result = self.put_sync(key, data);
        Box::pin(async move { result })
    }

    fn contains(&self, key: &str) -> ContainsFuture<'_> {
        let result = self.contains_sync(key);
        Box::pin(async move { result })
    }

    fn remove(&self, key: &str) -> CacheFuture<'_> {
        let result = self.remove_sync(key);
        Box::pin(async move { result })
    }

    fn clear(&self) -> CacheFuture<'_> {
        let result = self.clear_sync();
        Box::pin(async move { result })
    }
}
