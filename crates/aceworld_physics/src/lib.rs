//! # ACEWORLD Physics
//!
//! Tick-driven integrators over the voxel map.
//!
//! - [`PlayerState`]: walking, jumping, climbing and fall damage
//! - [`GrenadeState`]: ballistic flight with a single-axis bounce
//! - [`cast_ray`]: first solid voxel along a ray
//!
//! Every integrator borrows the map for the duration of one call through
//! [`AceMap`](aceworld_map::AceMap). The caller owns the clock: `dt` is the
//! tick length and `time` the wall-clock stamp recorded on climbs.
//!
//! ## Example
//!
//! ```rust
//! use aceworld_map::VoxelMap;
//! use aceworld_physics::PlayerState;
//! use aceworld_shared::Vector3;
//!
//! let mut map = VoxelMap::new(64);
//! map.initialise_floor(62);
//!
//! let mut player = PlayerState::new(Vector3::new(32.5, 32.5, 40.0));
//! player.airborne = true;
//! let mut damage = 0;
//! for tick in 0..400 {
//!     damage = player.update(&map, 1.0 / 60.0, f64::from(tick) / 60.0);
//!     if !player.airborne {
//!         break;
//!     }
//! }
//! assert!(!player.airborne);
//! assert!(damage > 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod grenade;
pub mod player;
pub mod raycast;

pub use grenade::GrenadeState;
pub use player::{PlayerInput, PlayerState};
pub use raycast::{cast_ray, RayHit};
