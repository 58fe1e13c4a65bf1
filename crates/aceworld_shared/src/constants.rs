//! # Map Constants
//!
//! Fixed dimensions of the on-disk map format.
//!
//! **CRITICAL:** The column format carries no length prefix or version tag.
//! Readers and writers agree on these values implicitly.

// =============================================================================
// MAP DIMENSIONS
// =============================================================================

/// Default map width in voxels.
pub const MAP_X: i32 = 512;

/// Default map depth in voxels.
pub const MAP_Y: i32 = 512;

/// Map height in voxels. Not configurable.
pub const MAP_Z: i32 = 64;

// =============================================================================
// COLORS
// =============================================================================

/// Gray-with-alpha used for floors and as the fallback ground color.
pub const DEFAULT_GROUND_COLOR: u32 = 0x7F7F_7F7F;
