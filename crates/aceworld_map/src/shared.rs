//! # Shared Map Handle
//!
//! [`VoxelMap`] has no internal locking. Embedders that touch the map from
//! several threads wrap it here: one writer, many readers.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::grid::VoxelMap;

/// Cloneable, lock-protected map handle.
#[derive(Clone, Debug)]
pub struct SharedMap {
    inner: Arc<RwLock<VoxelMap>>,
}

impl SharedMap {
    /// Takes ownership of `map`.
    #[must_use]
    pub fn new(map: VoxelMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Acquires shared read access.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, VoxelMap> {
        self.inner.read()
    }

    /// Acquires exclusive write access.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, VoxelMap> {
        self.inner.write()
    }
}

impl From<VoxelMap> for SharedMap {
    fn from(map: VoxelMap) -> Self {
        Self::new(map)
    }
}
