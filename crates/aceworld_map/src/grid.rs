//! # Voxel Grid Store
//!
//! A dense `X x Y x 64` grid of solid flags and ARGB colors.
//!
//! ## Layout
//!
//! Two parallel arrays share one index, `x + y*X + z*X*Y`:
//!
//! ```text
//! solid: [u8]   0 = air, 1 = solid
//! color: [u32]  ARGB, always 0 for air
//! ```
//!
//! Both are allocated zeroed once at creation and never reallocated.
//!
//! ## Mutation Policy
//!
//! Point mutation is rejected (returns `false`, no change) outside the grid
//! or above `max_modifiable_z`. Floor filling and map loading write storage
//! directly and are only bounds-checked.

use aceworld_shared::{DEFAULT_GROUND_COLOR, MAP_X, MAP_Z};

use crate::clip::AceMap;
use crate::config::{MapConfig, MAX_MAP_SIZE};
use crate::error::MapResult;
use crate::observer::{BlockEvent, BlockObserver};

/// Dense mutable voxel map.
pub struct VoxelMap {
    size_x: i32,
    size_y: i32,
    size_z: i32,
    solid: Box<[u8]>,
    color: Box<[u32]>,
    total_blocks: u64,
    max_modifiable_z: i32,
    floor_color: u32,
    observers: Vec<Box<dyn BlockObserver>>,
}

impl VoxelMap {
    /// Creates an all-air map of `size x size x 64`.
    ///
    /// A size of zero, or one above [`MAX_MAP_SIZE`], yields a map where
    /// every access is out of range.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let edge = if size > MAX_MAP_SIZE {
            tracing::warn!("map size {} exceeds {}, creating an empty map", size, MAX_MAP_SIZE);
            0
        } else {
            size as i32
        };
        let cells = (edge as usize) * (edge as usize) * (MAP_Z as usize);
        tracing::debug!("creating {}x{}x{} voxel map", edge, edge, MAP_Z);
        Self {
            size_x: edge,
            size_y: edge,
            size_z: MAP_Z,
            solid: vec![0u8; cells].into_boxed_slice(),
            color: vec![0u32; cells].into_boxed_slice(),
            total_blocks: 0,
            max_modifiable_z: MAP_Z,
            floor_color: DEFAULT_GROUND_COLOR,
            observers: Vec::new(),
        }
    }

    /// Creates a map from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns whatever [`MapConfig::validate`] rejects.
    pub fn from_config(config: &MapConfig) -> MapResult<Self> {
        config.validate()?;
        let mut map = Self::new(config.size);
        map.max_modifiable_z = config.max_modifiable_z;
        map.floor_color = config.floor_color;
        Ok(map)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Grid extent `(X, Y, Z)`.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (i32, i32, i32) {
        (self.size_x, self.size_y, self.size_z)
    }

    /// Number of solid cells.
    #[inline]
    #[must_use]
    pub fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    /// Highest layer (inclusive) point mutation may touch.
    #[inline]
    #[must_use]
    pub fn max_modifiable_z(&self) -> i32 {
        self.max_modifiable_z
    }

    /// Sets the mutation cutoff.
    pub fn set_max_modifiable_z(&mut self, z: i32) {
        self.max_modifiable_z = z;
    }

    /// Color used by [`VoxelMap::initialise_floor`].
    #[inline]
    #[must_use]
    pub fn floor_color(&self) -> u32 {
        self.floor_color
    }

    /// Linear index of an in-range cell.
    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 || x >= self.size_x || y >= self.size_y || z >= self.size_z {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        let (sx, sy) = (self.size_x as usize, self.size_y as usize);
        Some(x + y * sx + z * sx * sy)
    }

    /// Index of a cell that point mutation may touch.
    #[inline]
    fn writable_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if z > self.max_modifiable_z {
            return None;
        }
        self.index(x, y, z)
    }

    /// Solidity of a cell; `false` out of range.
    #[inline]
    #[must_use]
    pub fn get_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.index(x, y, z).is_some_and(|i| self.solid[i] != 0)
    }

    /// Bounds-checked solidity read.
    #[inline]
    #[must_use]
    pub fn check_only(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_solid(x, y, z)
    }

    /// ARGB color of a cell; `0` for air or out of range.
    #[inline]
    #[must_use]
    pub fn get_color(&self, x: i32, y: i32, z: i32) -> u32 {
        self.index(x, y, z).map_or(0, |i| self.color[i])
    }

    // =========================================================================
    // Point Mutation
    // =========================================================================

    /// Makes a cell solid with `color`.
    ///
    /// Returns `false` without change when the cell is out of range or above
    /// `max_modifiable_z`.
    pub fn set_point(&mut self, x: i32, y: i32, z: i32, color: u32) -> bool {
        let Some(i) = self.writable_index(x, y, z) else {
            return false;
        };
        if self.solid[i] == 0 {
            self.total_blocks += 1;
        }
        self.solid[i] = 1;
        self.color[i] = color;
        self.notify(&BlockEvent::Added { x, y, z, color });
        true
    }

    /// Clears a cell. Returns whether a solid block was removed.
    pub fn remove_point(&mut self, x: i32, y: i32, z: i32) -> bool {
        let Some(i) = self.writable_index(x, y, z) else {
            return false;
        };
        if self.solid[i] == 0 {
            return false;
        }
        self.solid[i] = 0;
        self.color[i] = 0;
        self.total_blocks -= 1;
        self.notify(&BlockEvent::Removed { x, y, z });
        true
    }

    /// Sets (`value = true`) or clears a cell.
    ///
    /// Returns `true` when the call was accepted by the mutation policy,
    /// whether or not the cell changed.
    pub fn set_point_value(&mut self, x: i32, y: i32, z: i32, value: bool, color: u32) -> bool {
        if self.writable_index(x, y, z).is_none() {
            return false;
        }
        if value {
            self.set_point(x, y, z, color);
        } else {
            self.remove_point(x, y, z);
        }
        true
    }

    // =========================================================================
    // Bulk Mutation
    // =========================================================================

    /// Fills layer `z` solid with the floor color.
    ///
    /// Not gated by `max_modifiable_z`. Out-of-range `z` is a no-op.
    pub fn initialise_floor(&mut self, z: i32) {
        if z < 0 || z >= self.size_z {
            return;
        }
        let layer = (self.size_x as usize) * (self.size_y as usize);
        let start = z as usize * layer;
        let mut added = 0u64;
        for i in start..start + layer {
            if self.solid[i] == 0 {
                added += 1;
            }
            self.solid[i] = 1;
            self.color[i] = self.floor_color;
        }
        self.total_blocks += added;
        self.notify(&BlockEvent::LayerFilled { z });
    }

    /// Writes a solid cell during map loading, ignoring `max_modifiable_z`.
    ///
    /// Returns whether the cell was previously air.
    pub(crate) fn load_cell(&mut self, x: i32, y: i32, z: i32, color: u32) -> bool {
        let Some(i) = self.index(x, y, z) else {
            return false;
        };
        let was_air = self.solid[i] == 0;
        if was_air {
            self.total_blocks += 1;
        }
        self.solid[i] = 1;
        self.color[i] = color;
        was_air
    }

    /// Recomputes `total_blocks` from storage and returns it.
    pub fn recount_blocks(&mut self) -> u64 {
        self.total_blocks = self.solid.iter().filter(|&&s| s != 0).count() as u64;
        self.total_blocks
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Registers an observer for subsequent mutations.
    pub fn add_observer(&mut self, observer: Box<dyn BlockObserver>) {
        self.observers.push(observer);
    }

    /// Sends `event` to every observer.
    pub(crate) fn notify(&self, event: &BlockEvent) {
        for observer in &self.observers {
            observer.on_block_event(event);
        }
    }
}

impl Default for VoxelMap {
    fn default() -> Self {
        Self::new(MAP_X as u32)
    }
}

impl std::fmt::Debug for VoxelMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelMap")
            .field("dimensions", &self.dimensions())
            .field("total_blocks", &self.total_blocks)
            .field("max_modifiable_z", &self.max_modifiable_z)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl AceMap for VoxelMap {
    #[inline]
    fn get_solid(&self, x: i32, y: i32, z: i32) -> bool {
        VoxelMap::get_solid(self, x, y, z)
    }

    #[inline]
    fn extent(&self) -> (i32, i32, i32) {
        self.dimensions()
    }
}
