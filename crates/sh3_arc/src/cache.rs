//! Shared loaded assets keyed by their path
//!
//! The cache is single threaded: handles are reference counted with [`Rc`] and the map lives in a
//! [`RefCell`]. Dropping the last handle to an asset evicts it synchronously. Sharing across
//! threads would need every insert and removal to go through one owning task, with loads
//! completing asynchronously.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Debug},
    ops::Deref,
    rc::{Rc, Weak},
};
use tracing::{debug, trace};

type Entries<T> = RefCell<HashMap<Box<str>, Weak<T>>>;

/// A cache of loaded assets
pub struct AssetCache<T> {
    entries: Rc<Entries<T>>,
}

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl<T> Debug for AssetCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AssetCache({} entries)", self.len())
    }
}

impl<T> AssetCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the asset at `path`, loading it with `loader` if it is not cached
    pub fn load<E>(
        &self,
        path: &str,
        loader: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<CacheHandle<T>, E> {
        if let Some(asset) = self.get(path) {
            return Ok(asset);
        }

        debug!(path, "loading asset");
        let asset = Rc::new(loader(path)?);
        self.entries
            .borrow_mut()
            .insert(path.into(), Rc::downgrade(&asset));

        Ok(CacheHandle {
            path: path.into(),
            asset,
            entries: Rc::downgrade(&self.entries),
        })
    }

    /// Get the asset at `path` if it is cached
    pub fn get(&self, path: &str) -> Option<CacheHandle<T>> {
        let asset = self.entries.borrow().get(path)?.upgrade()?;
        trace!(path, "cache hit");
        Some(CacheHandle {
            path: path.into(),
            asset,
            entries: Rc::downgrade(&self.entries),
        })
    }

    /// Whether `path` is cached
    pub fn contains(&self, path: &str) -> bool {
        self.entries.borrow().contains_key(path)
    }

    /// Number of cached assets
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no asset is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A reference to a cached asset
pub struct CacheHandle<T> {
    path: Box<str>,
    asset: Rc<T>,
    entries: Weak<Entries<T>>,
}

impl<T> CacheHandle<T> {
    /// Path the asset was loaded from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether two handles refer to the same loaded asset
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.asset, &other.asset)
    }
}

impl<T> Clone for CacheHandle<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            asset: Rc::clone(&self.asset),
            entries: Weak::clone(&self.entries),
        }
    }
}

impl<T> Deref for CacheHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.asset
    }
}

impl<T: Debug> Debug for CacheHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("path", &self.path)
            .field("asset", &self.asset)
            .finish()
    }
}

impl<T> Drop for CacheHandle<T> {
    fn drop(&mut self) {
        if Rc::strong_count(&self.asset) != 1 {
            return;
        }
        if let Some(entries) = self.entries.upgrade() {
            debug!(path = %self.path, "unloading asset");
            entries.borrow_mut().remove(&self.path);
        }
    }
}
