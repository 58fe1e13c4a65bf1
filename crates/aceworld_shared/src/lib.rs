//! # ACEWORLD Shared
//!
//! Common math and lookup tables used by the map store and the physics
//! integrators.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER hold world state. Everything here is either a plain
//! value type or an immutable table built once by an explicit constructor.
//!
//! ## Example
//!
//! ```rust
//! use aceworld_shared::{Tables, Vector3};
//!
//! let tables = Tables::initialize();
//! let up = tables.directions.direction_from_index(255);
//! assert!((up.magnitude() - 1.0).abs() < 1e-5);
//! assert_eq!(tables.crc.checksum(b"123456789", 0), 0xCBF4_3926);
//! assert_eq!(Vector3::new(3.0, 4.0, 0.0).magnitude(), 5.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;
pub mod tables;

pub use constants::{DEFAULT_GROUND_COLOR, MAP_X, MAP_Y, MAP_Z};
pub use math::{IntVector3, Matrix4, Vector3};
pub use tables::{Crc32Table, DirectionTable, Tables};
