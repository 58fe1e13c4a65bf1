//! # Ground Colors
//!
//! Terrain color palette supplied by the map author.

use aceworld_shared::DEFAULT_GROUND_COLOR;
use serde::{Deserialize, Serialize};

/// Palette capacity.
pub const MAX_GROUND_COLORS: usize = 256;

/// One RGBA palette entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundColor {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl GroundColor {
    /// Packs as ARGB.
    #[inline]
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Up to [`MAX_GROUND_COLORS`] ground colors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundColorTable {
    colors: Vec<GroundColor>,
}

impl GroundColorTable {
    /// Creates an empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a color. Returns `false` once the palette is full.
    pub fn add(&mut self, r: u8, g: u8, b: u8, a: u8) -> bool {
        if self.colors.len() >= MAX_GROUND_COLORS {
            return false;
        }
        self.colors.push(GroundColor { r, g, b, a });
        true
    }

    /// Removes every color.
    pub fn reset(&mut self) {
        self.colors.clear();
    }

    /// Colors in insertion order.
    #[must_use]
    pub fn colors(&self) -> &[GroundColor] {
        &self.colors
    }

    /// ARGB ground color: the first entry, or the default gray when empty.
    #[must_use]
    pub fn ground_color(&self) -> u32 {
        self.colors.first().map_or(DEFAULT_GROUND_COLOR, |c| c.to_argb())
    }
}
