//! # Block Change Notifications
//!
//! Mesh builders, shadow caches and network replication live outside this
//! crate. They learn about grid changes through [`BlockObserver`] and never
//! write back.
//!
//! ## Event Flow
//! ```text
//! set_point / remove_point / initialise_floor / load_vxl
//!        │
//!        └──> VoxelMap::notify ──> every registered BlockObserver
//!                                        │
//!                                        └──> ChannelObserver ──> Receiver<BlockEvent>
//! ```

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};

/// A change to the voxel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockEvent {
    /// A cell became (or stayed) solid with a new color.
    Added {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
        /// ARGB color written.
        color: u32,
    },

    /// A solid cell was cleared.
    Removed {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
    },

    /// A whole layer was filled solid.
    LayerFilled {
        /// Layer height.
        z: i32,
    },

    /// A full map decode finished.
    Loaded,
}

/// Receives grid mutations.
///
/// Called synchronously from the mutating call. Implementations must not
/// block.
pub trait BlockObserver: Send + Sync {
    /// Handles one event.
    fn on_block_event(&self, event: &BlockEvent);
}

/// Forwards events into a crossbeam channel.
///
/// Bounded channels drop events when full instead of stalling the writer.
pub struct ChannelObserver {
    sender: Sender<BlockEvent>,
}

impl ChannelObserver {
    /// Creates an observer backed by a bounded channel.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<BlockEvent>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }

    /// Creates an observer backed by an unbounded channel.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<BlockEvent>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    /// Wraps an existing sender.
    #[must_use]
    pub fn from_sender(sender: Sender<BlockEvent>) -> Self {
        Self { sender }
    }
}

impl BlockObserver for ChannelObserver {
    fn on_block_event(&self, event: &BlockEvent) {
        match self.sender.try_send(*event) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("block event channel full, dropping {:?}", event);
            }
        }
    }
}
