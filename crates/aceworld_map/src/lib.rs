//! # ACEWORLD Map
//!
//! Voxel storage and collision queries for a destructible-terrain world.
//!
//! ## Components
//!
//! - [`VoxelMap`]: dense solid/color grid with policy-gated mutation
//! - [`codec`]: run-length column format, decode and encode
//! - [`clipbox`] / [`clipworld`]: boundary-aware solidity over any [`AceMap`]
//! - [`BlockObserver`]: change notifications for meshing and replication
//! - [`SharedMap`]: external locking for multi-threaded embedders
//!
//! ## Example
//!
//! ```rust
//! use aceworld_map::{clipbox, VoxelMap};
//!
//! let mut map = VoxelMap::new(512);
//! map.initialise_floor(62);
//! assert!(map.set_point(100, 100, 61, 0xFF00_00FF));
//! assert!(clipbox(&map, 100.5, 100.5, 61.2));
//!
//! let bytes = map.save_vxl();
//! let (copy, report) = VoxelMap::from_vxl(&bytes);
//! assert!(!report.truncated);
//! assert_eq!(copy.total_blocks(), map.total_blocks());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod clip;
pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod ground;
pub mod observer;
pub mod shared;

pub use clip::{clipbox, clipworld, AceMap};
pub use codec::{read_column, vxl_size, Column, LoadReport, Span, SpanHeader, EMPTY_COLUMN};
pub use config::MapConfig;
pub use error::{MapError, MapResult};
pub use grid::VoxelMap;
pub use ground::{GroundColor, GroundColorTable};
pub use observer::{BlockEvent, BlockObserver, ChannelObserver};
pub use shared::SharedMap;
