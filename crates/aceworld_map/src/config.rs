//! # Map Configuration
//!
//! Construction-time settings for a [`VoxelMap`](crate::VoxelMap), loaded
//! once at startup from TOML.
//!
//! ```toml
//! size = 512
//! max_modifiable_z = 62
//! floor_color = 0x7F7F7F7F
//! ```

use aceworld_shared::{DEFAULT_GROUND_COLOR, MAP_X, MAP_Z};
use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// Largest accepted horizontal edge length.
pub const MAX_MAP_SIZE: u32 = 4096;

/// Settings for building a map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Horizontal edge length (X and Y) in voxels.
    pub size: u32,
    /// Highest layer (inclusive) that point mutation may touch.
    pub max_modifiable_z: i32,
    /// Color written by [`VoxelMap::initialise_floor`](crate::VoxelMap::initialise_floor).
    pub floor_color: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            size: MAP_X as u32,
            max_modifiable_z: MAP_Z,
            floor_color: DEFAULT_GROUND_COLOR,
        }
    }
}

impl MapConfig {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] on malformed TOML and any error from
    /// [`MapConfig::validate`].
    pub fn from_toml_str(text: &str) -> MapResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its accepted range.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidDimensions`] when `size` is zero or above
    /// [`MAX_MAP_SIZE`]; [`MapError::InvalidConfig`] when
    /// `max_modifiable_z` is outside `0..=64`.
    pub fn validate(&self) -> MapResult<()> {
        if self.size == 0 || self.size > MAX_MAP_SIZE {
            return Err(MapError::InvalidDimensions { size: self.size });
        }
        if !(0..=MAP_Z).contains(&self.max_modifiable_z) {
            return Err(MapError::InvalidConfig(format!(
                "max_modifiable_z must be within 0..={MAP_Z}, got {}",
                self.max_modifiable_z
            )));
        }
        Ok(())
    }
}
