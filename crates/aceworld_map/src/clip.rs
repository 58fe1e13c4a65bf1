//! # Collision Queries
//!
//! Two boundary-aware solidity tests over any [`AceMap`].
//!
//! | input            | `clipbox` | `clipworld` |
//! |------------------|-----------|-------------|
//! | x or y outside   | solid     | air         |
//! | z < 0            | air       | air         |
//! | z == Z-1         | reads Z-2 | reads Z-2   |
//! | z >= Z           | solid     | solid       |
//!
//! `clipbox` takes world-space floats and treats the map edge as a wall, so
//! bodies cannot leave the map. `clipworld` takes voxel coordinates and
//! treats the outside as open, so rays pass off the edge.

use aceworld_shared::{MAP_X, MAP_Y, MAP_Z};

/// Read access to voxel solidity.
///
/// Collision and physics are written against this trait so they can run on
/// test grids as well as [`VoxelMap`](crate::VoxelMap).
pub trait AceMap {
    /// Solidity of a cell. Out-of-range cells read as air.
    fn get_solid(&self, x: i32, y: i32, z: i32) -> bool;

    /// Grid extent `(X, Y, Z)`.
    fn extent(&self) -> (i32, i32, i32) {
        (MAP_X, MAP_Y, MAP_Z)
    }
}

/// Maps a truncated height onto the layer that is actually read.
///
/// Returns `Err(solid)` when the answer is decided without a lookup.
#[inline]
fn resolve_z(z: i32, size_z: i32) -> Result<i32, bool> {
    if z == size_z - 1 {
        Ok(size_z - 2)
    } else if z >= size_z {
        Err(true)
    } else {
        Ok(z)
    }
}

/// Solidity test for moving bodies in world-space coordinates.
#[inline]
#[must_use]
pub fn clipbox<M: AceMap + ?Sized>(map: &M, x: f64, y: f64, z: f64) -> bool {
    let (size_x, size_y, size_z) = map.extent();
    if x < 0.0 || x >= f64::from(size_x) || y < 0.0 || y >= f64::from(size_y) {
        return true;
    }
    if z < 0.0 {
        return false;
    }
    match resolve_z(z as i32, size_z) {
        Ok(sz) => map.get_solid(x as i32, y as i32, sz),
        Err(solid) => solid,
    }
}

/// Solidity test for voxel coordinates. Outside the map is open.
#[inline]
#[must_use]
pub fn clipworld<M: AceMap + ?Sized>(map: &M, x: i32, y: i32, z: i32) -> bool {
    let (size_x, size_y, size_z) = map.extent();
    if x < 0 || x >= size_x || y < 0 || y >= size_y {
        return false;
    }
    if z < 0 {
        return false;
    }
    match resolve_z(z, size_z) {
        Ok(sz) => map.get_solid(x, y, sz),
        Err(solid) => solid,
    }
}
