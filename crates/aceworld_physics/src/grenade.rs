//! # Grenade Ballistics
//!
//! A point projectile with gravity, air drag and a single-axis bounce.
//!
//! Each tick samples the trajectory at 8 evenly spaced points. The first
//! sample inside a solid voxel is the impact; the impact axis is whichever
//! axis moved more than 0.1 voxels, checked x, then y, then z.

use aceworld_map::{clipbox, AceMap};
use aceworld_shared::Vector3;
use serde::{Deserialize, Serialize};

/// Velocity retained (with sign) along the impact axis, before doubling.
pub const BOUNCE: f64 = -0.36;

/// Trajectory samples per tick.
const SAMPLES: f64 = 8.0;

/// Minimum movement on an axis for it to count as the impact axis.
const NORMAL_EPSILON: f64 = 0.1;

/// First solid sample along a tick's trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Impact {
    /// Time from tick start to the impact.
    eta: f64,
    /// Sampled position inside the solid voxel.
    position: Vector3,
}

/// One grenade's physical state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrenadeState {
    /// Position.
    pub position: Vector3,
    /// Velocity in voxels per time unit.
    pub velocity: Vector3,
}

impl GrenadeState {
    /// Creates a grenade.
    #[must_use]
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self { position, velocity }
    }

    /// Advances one tick.
    ///
    /// Returns `true` when the grenade is embedded in a block and should
    /// stop simulating.
    pub fn update<M: AceMap + ?Sized>(&mut self, map: &M, dt: f64, time: f64) -> bool {
        let Some(impact) = self.next_collision(map, dt) else {
            self.position = self.position + self.velocity * dt;
            self.velocity.z += dt * 32.0;
            let drag = 1.0 + dt;
            self.velocity.x /= drag;
            self.velocity.y /= drag;
            self.velocity.z /= drag;
            return false;
        };

        let delta = impact.position - self.position;
        let normal = if delta.x < -NORMAL_EPSILON {
            Vector3::new(1.0, 0.0, 0.0)
        } else if delta.x > NORMAL_EPSILON {
            Vector3::new(-1.0, 0.0, 0.0)
        } else if delta.y < -NORMAL_EPSILON {
            Vector3::new(0.0, 1.0, 0.0)
        } else if delta.y > NORMAL_EPSILON {
            Vector3::new(0.0, -1.0, 0.0)
        } else if delta.z < -NORMAL_EPSILON {
            Vector3::new(0.0, 0.0, 1.0)
        } else if delta.z > NORMAL_EPSILON {
            Vector3::new(0.0, 0.0, -1.0)
        } else {
            tracing::trace!("grenade embedded at {:?}", self.position);
            return true;
        };

        let v = &mut self.velocity;
        v.x += normal.x * v.x * BOUNCE * 2.0;
        v.y += normal.y * v.y * BOUNCE * 2.0;
        v.z += normal.z * v.z * BOUNCE * 2.0;
        self.position = impact.position;
        tracing::trace!("grenade bounce at {:?}, normal {:?}", impact.position, normal);

        self.update(map, dt - impact.eta, time)
    }

    /// Finds the first solid sample within `dt`.
    fn next_collision<M: AceMap + ?Sized>(&self, map: &M, dt: f64) -> Option<Impact> {
        let p = self.position;
        let v = self.velocity;
        let end = dt * 32.0;
        let step = end / SAMPLES;

        let mut t = 0.0;
        while t < end {
            let sample = Vector3::new(p.x + v.x * t / 32.0, p.y + v.y * t / 32.0, p.z + v.z * t / 32.0);
            if clipbox(map, sample.x, sample.y, sample.z) {
                return Some(Impact {
                    eta: t / 32.0,
                    position: sample,
                });
            }
            t += step;
        }
        None
    }
}
