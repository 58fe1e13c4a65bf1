//! # Player Kinematics
//!
//! Kinematic character controller over the voxel map.
//!
//! Coordinates are map voxels with `z` pointing DOWN: gravity increases
//! `v_z`, a jump makes it negative.
//!
//! ## Tick Order
//!
//! 1. Jump impulse
//! 2. Intent acceleration along the forward/side basis
//! 3. Air, ground and water friction
//! 4. Swept box move: X, then Y, then vertical
//! 5. Eye placement and landing/fall-damage signal

use aceworld_map::{clipbox, AceMap};
use aceworld_shared::Vector3;
use serde::{Deserialize, Serialize};

/// Vertical velocity set by a jump.
pub const JUMP_VELOCITY: f64 = -0.36;

/// Landing speed above which horizontal speed is halved.
pub const FALL_SLOW_DOWN: f64 = 0.24;

/// Landing speed above which damage is dealt.
pub const FALL_DAMAGE_VELOCITY: f64 = 0.58;

/// Multiplier applied to the squared excess landing speed.
pub const FALL_DAMAGE_SCALAR: f64 = 4096.0;

/// Half the footprint edge.
const HALF_WIDTH: f64 = 0.45;

/// Spacing of the vertical probes along a leading edge.
const PROBE_STEP: f64 = 0.9;

/// Lowest probe offset for a plain move.
const PROBE_FLOOR: f64 = -1.36;

/// Probe range for a climb attempt.
const CLIMB_PROBE_TOP: f64 = 0.35;
const CLIMB_PROBE_FLOOR: f64 = -2.36;

/// Forward `z` at or above which the player cannot climb (looking down).
const CLIMB_MAX_FORWARD_Z: f64 = 0.5;

/// Height below which a grounded player is wading.
const WATER_LEVEL: f64 = 61.0;

// ============================================================================
// INPUT
// ============================================================================

/// Movement and action intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Move forward.
    pub forward: bool,
    /// Move back.
    pub back: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Jump. Cleared by the tick that consumes it.
    pub jump: bool,
    /// Crouch.
    pub crouch: bool,
    /// Sneak (slow walk).
    pub sneak: bool,
    /// Sprint.
    pub sprint: bool,
    /// Primary fire held.
    pub primary_fire: bool,
    /// Secondary fire held.
    pub secondary_fire: bool,
    /// A weapon is equipped. With `secondary_fire` this is aiming.
    pub weapon: bool,
}

// ============================================================================
// PLAYER STATE
// ============================================================================

/// One player's physical state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Body position.
    pub position: Vector3,
    /// Velocity in voxels per 1/32 time unit.
    pub velocity: Vector3,
    /// Eye position, refreshed every tick.
    pub eye: Vector3,
    /// Look direction.
    pub forward: Vector3,
    /// Horizontal strafe axis.
    pub side: Vector3,
    /// Camera up axis.
    pub up: Vector3,
    /// Current intent.
    pub input: PlayerInput,
    /// Not standing on anything.
    pub airborne: bool,
    /// Landed below the water line.
    pub wade: bool,
    /// Alive.
    pub alive: bool,
    /// Time of the last climb.
    pub last_climb: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            eye: Vector3::ZERO,
            forward: Vector3::new(1.0, 0.0, 0.0),
            side: Vector3::new(0.0, 1.0, 0.0),
            up: Vector3::new(0.0, 0.0, 1.0),
            input: PlayerInput::default(),
            airborne: false,
            wade: false,
            alive: true,
            last_climb: 0.0,
        }
    }
}

/// Runs the probe column `top, top-0.9, ...` down to `floor`.
///
/// Returns `true` when every probe is clear at both sample points.
#[inline]
fn probes_clear<M, F>(map: &M, top: f64, floor: f64, base_z: f64, sample: F) -> bool
where
    M: AceMap + ?Sized,
    F: Fn(&M, f64) -> bool,
{
    let mut z = top;
    while z >= floor && !sample(map, base_z + z) {
        z -= PROBE_STEP;
    }
    z < floor
}

impl PlayerState {
    /// Creates a player at `position` with the default basis.
    #[must_use]
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            eye: position,
            ..Self::default()
        }
    }

    /// Rebuilds the basis from a look direction.
    ///
    /// When the direction is vertical the previous side axis is kept.
    pub fn set_orientation(&mut self, fx: f64, fy: f64, fz: f64) {
        self.forward = Vector3::new(fx, fy, fz);

        let h = fx.hypot(fy);
        if h > 0.0 {
            self.side = Vector3::new(-fy / h, fx / h, 0.0);
        }

        let s = self.side;
        self.up = Vector3::new(-fz * s.y, fz * s.x, fx * s.y - fy * s.x);
    }

    /// Body offset from position to the box center, and the probe height.
    #[inline]
    fn box_extent(&self) -> (f64, f64) {
        if self.input.crouch {
            (0.45, 0.9)
        } else {
            (0.9, 1.35)
        }
    }

    /// Advances one tick.
    ///
    /// Returns `0` normally. On a hard landing returns `-1` (no damage) or
    /// the fall damage, `(v - 0.58)^2 * 4096` truncated.
    pub fn update<M: AceMap + ?Sized>(&mut self, map: &M, dt: f64, time: f64) -> i64 {
        if self.input.jump {
            self.input.jump = false;
            self.velocity.z = JUMP_VELOCITY;
        }

        self.accelerate(dt);

        self.velocity.z += dt;
        self.velocity.z /= 1.0 + dt;
        let friction = if self.wade {
            Some(1.0 + dt * 6.0)
        } else if !self.airborne {
            Some(1.0 + dt * 4.0)
        } else {
            None
        };
        if let Some(f) = friction {
            self.velocity.x /= f;
            self.velocity.y /= f;
        }

        let fall = self.velocity.z;
        self.box_clip_move(map, dt, time);

        if self.velocity.z == 0.0 && fall > FALL_SLOW_DOWN {
            self.velocity.x *= 0.5;
            self.velocity.y *= 0.5;

            if fall > FALL_DAMAGE_VELOCITY {
                let excess = fall - FALL_DAMAGE_VELOCITY;
                let damage = (excess * excess * FALL_DAMAGE_SCALAR) as i64;
                tracing::trace!("hard landing at {:.3}, damage {}", fall, damage);
                return damage;
            }
            tracing::trace!("landing at {:.3}", fall);
            return -1;
        }
        0
    }

    /// Adds intent acceleration to horizontal velocity.
    fn accelerate(&mut self, dt: f64) {
        let input = self.input;
        let mut f = dt;
        if self.airborne {
            f *= 0.1;
        } else if input.crouch {
            f *= 0.3;
        } else if (input.secondary_fire && input.weapon) || input.sneak {
            f *= 0.5;
        } else if input.sprint {
            f *= 1.3;
        }

        if (input.forward || input.back) && (input.left || input.right) {
            f *= std::f64::consts::FRAC_1_SQRT_2;
        }

        if input.forward {
            self.velocity.x += self.forward.x * f;
            self.velocity.y += self.forward.y * f;
        } else if input.back {
            self.velocity.x -= self.forward.x * f;
            self.velocity.y -= self.forward.y * f;
        }

        if input.right {
            self.velocity.x += self.side.x * f;
            self.velocity.y += self.side.y * f;
        } else if input.left {
            self.velocity.x -= self.side.x * f;
            self.velocity.y -= self.side.y * f;
        }
    }

    /// Moves the box along X, then Y, then Z against the map.
    fn box_clip_move<M: AceMap + ?Sized>(&mut self, map: &M, dt: f64, time: f64) {
        let (offset, mut m) = self.box_extent();
        let scale = dt * 32.0;
        let nx = scale * self.velocity.x + self.position.x;
        let ny = scale * self.velocity.y + self.position.y;
        let mut nz = self.position.z + offset;
        let can_climb = !self.input.crouch
            && self.forward.z < CLIMB_MAX_FORWARD_Z
            && !self.input.sprint;
        let mut climb = false;

        // X axis: leading edge at nx +- 0.45, both Y corners.
        let edge = if self.velocity.x < 0.0 { -HALF_WIDTH } else { HALF_WIDTH };
        let py = self.position.y;
        let hit_x = |map: &M, z: f64| {
            clipbox(map, nx + edge, py - HALF_WIDTH, z) || clipbox(map, nx + edge, py + HALF_WIDTH, z)
        };
        if probes_clear(map, m, PROBE_FLOOR, nz, hit_x) {
            self.position.x = nx;
        } else if can_climb && probes_clear(map, CLIMB_PROBE_TOP, CLIMB_PROBE_FLOOR, nz, hit_x) {
            self.position.x = nx;
            climb = true;
        } else {
            self.velocity.x = 0.0;
        }

        // Y axis: uses the X position just committed.
        let edge = if self.velocity.y < 0.0 { -HALF_WIDTH } else { HALF_WIDTH };
        let px = self.position.x;
        let hit_y = |map: &M, z: f64| {
            clipbox(map, px - HALF_WIDTH, ny + edge, z) || clipbox(map, px + HALF_WIDTH, ny + edge, z)
        };
        if probes_clear(map, m, PROBE_FLOOR, nz, hit_y) {
            self.position.y = ny;
        } else if can_climb
            && !climb
            && probes_clear(map, CLIMB_PROBE_TOP, CLIMB_PROBE_FLOOR, nz, hit_y)
        {
            self.position.y = ny;
            climb = true;
        } else if !climb {
            self.velocity.y = 0.0;
        }

        if climb {
            self.velocity.x *= 0.5;
            self.velocity.y *= 0.5;
            self.last_climb = time;
            nz -= 1.0;
            m = -1.35;
        } else {
            if self.velocity.z < 0.0 {
                m = -m;
            }
            nz += self.velocity.z * dt * 32.0;
        }

        self.airborne = true;
        let (px, py) = (self.position.x, self.position.y);
        let probe_z = nz + m;
        let blocked = clipbox(map, px - HALF_WIDTH, py - HALF_WIDTH, probe_z)
            || clipbox(map, px - HALF_WIDTH, py + HALF_WIDTH, probe_z)
            || clipbox(map, px + HALF_WIDTH, py - HALF_WIDTH, probe_z)
            || clipbox(map, px + HALF_WIDTH, py + HALF_WIDTH, probe_z);

        if blocked {
            if self.velocity.z >= 0.0 {
                self.wade = self.position.z > WATER_LEVEL;
                self.airborne = false;
            }
            self.velocity.z = 0.0;
        } else {
            self.position.z = nz - offset;
        }

        self.reposition();
    }

    /// Places the eye above the body.
    fn reposition(&mut self) {
        let height = if self.input.crouch { 0.45 } else { 0.9 };
        self.eye = self.position;
        self.eye.z -= height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Map defined by a closure.
    struct FnMap<F: Fn(i32, i32, i32) -> bool>(F);

    impl<F: Fn(i32, i32, i32) -> bool> AceMap for FnMap<F> {
        fn get_solid(&self, x: i32, y: i32, z: i32) -> bool {
            (self.0)(x, y, z)
        }
    }

    /// Flat floor at layer 62 (layer 63 reads as 62).
    fn floor_map() -> FnMap<impl Fn(i32, i32, i32) -> bool> {
        FnMap(|_, _, z| z >= 62)
    }

    /// Player standing just above the floor with horizontal probes clear.
    fn standing() -> PlayerState {
        PlayerState::new(Vector3::new(256.5, 256.5, 59.74))
    }

    fn expected_damage(v0: f64, dt: f64) -> i64 {
        let fall = (v0 + dt) / (1.0 + dt);
        let excess = fall - FALL_DAMAGE_VELOCITY;
        (excess * excess * FALL_DAMAGE_SCALAR) as i64
    }

    #[test]
    fn test_defaults() {
        let p = PlayerState::default();
        assert_eq!(p.forward, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(p.side, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(p.up, Vector3::new(0.0, 0.0, 1.0));
        assert!(p.alive);
        assert!(!p.airborne);
        assert_eq!(p.input, PlayerInput::default());
    }

    #[test]
    fn test_hard_landing_damage() {
        let map = floor_map();
        let mut p = standing();
        p.velocity.z = 0.9;
        let damage = p.update(&map, 0.01, 0.0);
        assert_eq!(damage, expected_damage(0.9, 0.01));
        assert!(damage > 400 && damage < 440);
        assert_eq!(p.velocity.z, 0.0);
        assert!(!p.airborne);
    }

    #[test]
    fn test_soft_landing_and_no_landing() {
        let map = floor_map();

        let mut p = standing();
        p.velocity.z = 0.4;
        p.velocity.x = 0.02;
        assert_eq!(p.update(&map, 0.01, 0.0), -1);
        // Friction first, then the landing halves horizontal speed.
        assert!((p.velocity.x - 0.02 / 1.04 * 0.5).abs() < 1e-12);

        let mut p = standing();
        p.velocity.z = 0.1;
        assert_eq!(p.update(&map, 0.01, 0.0), 0);
        assert_eq!(p.velocity.z, 0.0);
    }

    #[test]
    fn test_free_fall_returns_zero() {
        let map = FnMap(|_, _, _| false);
        let mut p = PlayerState::new(Vector3::new(100.5, 100.5, 10.0));
        p.airborne = true;
        assert_eq!(p.update(&map, 0.05, 0.0), 0);
        assert!(p.position.z > 10.0);
        assert!(p.velocity.z > 0.0);
        assert!(p.airborne);
        assert!((p.eye.z - (p.position.z - 0.9)).abs() < 1e-12);
    }

    #[test]
    fn test_jump_consumes_flag_and_rises() {
        let map = floor_map();
        let mut p = standing();
        p.input.jump = true;
        p.update(&map, 0.05, 0.0);
        assert!(!p.input.jump);
        assert!(p.velocity.z < 0.0);
        assert!(p.position.z < 59.74);
        assert!(p.airborne);
    }

    #[test]
    fn test_ground_friction_and_airborne_drift() {
        let map = floor_map();
        let mut p = standing();
        p.velocity.x = 0.1;
        p.update(&map, 0.1, 0.0);
        assert!((p.velocity.x - 0.1 / 1.4).abs() < 1e-12);
        assert!(!p.airborne);

        let map = FnMap(|_, _, _| false);
        let mut p = PlayerState::new(Vector3::new(100.5, 100.5, 10.0));
        p.airborne = true;
        p.velocity.x = 0.1;
        p.update(&map, 0.1, 0.0);
        assert!((p.velocity.x - 0.1).abs() < 1e-12);
        assert!((p.position.x - (100.5 + 3.2 * 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_wading_friction() {
        let map = FnMap(|_, _, z| z >= 63);
        let mut p = PlayerState::new(Vector3::new(50.5, 50.5, 61.5));
        p.wade = true;
        p.velocity.y = 0.1;
        p.update(&map, 0.1, 0.0);
        assert!((p.velocity.y - 0.1 / 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_forward_beats_back_and_right_beats_left() {
        let mut p = PlayerState::default();
        p.airborne = true;
        p.input.forward = true;
        p.input.back = true;
        p.accelerate(1.0);
        assert!((p.velocity.x - 0.1).abs() < 1e-12);

        let mut p = PlayerState::default();
        p.airborne = true;
        p.input.left = true;
        p.input.right = true;
        p.accelerate(1.0);
        assert!((p.velocity.y - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_speed_modifiers() {
        let cases = [
            (PlayerInput { forward: true, crouch: true, sprint: true, ..Default::default() }, 0.3),
            (PlayerInput { forward: true, sneak: true, sprint: true, ..Default::default() }, 0.5),
            (PlayerInput { forward: true, secondary_fire: true, weapon: true, ..Default::default() }, 0.5),
            (PlayerInput { forward: true, secondary_fire: true, ..Default::default() }, 1.0),
            (PlayerInput { forward: true, sprint: true, ..Default::default() }, 1.3),
            (
                PlayerInput { forward: true, right: true, ..Default::default() },
                std::f64::consts::FRAC_1_SQRT_2,
            ),
        ];
        for (input, scale) in cases {
            let mut p = PlayerState::default();
            p.input = input;
            p.accelerate(1.0);
            assert!((p.velocity.x - scale).abs() < 1e-12, "{input:?}");
        }
    }

    #[test]
    fn test_wall_stops_axis() {
        let map = FnMap(|x, _, z| z >= 62 || x == 257);
        let mut p = standing();
        p.input.sprint = true;
        p.velocity.x = 0.5;
        p.velocity.y = 0.01;
        p.update(&map, 0.05, 0.0);
        assert_eq!(p.velocity.x, 0.0);
        assert_eq!(p.position.x, 256.5);
        assert!(p.position.y > 256.5);
    }

    #[test]
    fn test_climbs_single_step() {
        let map = FnMap(|x, _, z| z >= 62 || (x == 257 && z == 61));
        let mut p = standing();
        p.velocity.x = 0.1;
        p.update(&map, 0.05, 7.5);

        let vx = 0.1 / 1.2;
        assert!((p.position.x - (256.5 + 1.6 * vx)).abs() < 1e-9);
        assert!((p.velocity.x - vx * 0.5).abs() < 1e-12);
        assert!((p.position.z - 58.74).abs() < 1e-9);
        assert_eq!(p.last_climb, 7.5);
    }

    #[test]
    fn test_no_climb_when_looking_down() {
        let map = FnMap(|x, _, z| z >= 62 || (x == 257 && z == 61));
        let mut p = standing();
        p.set_orientation(0.5, 0.0, 0.8);
        p.velocity.x = 0.1;
        p.update(&map, 0.05, 7.5);
        assert_eq!(p.velocity.x, 0.0);
        assert_eq!(p.last_climb, 0.0);
    }

    #[test]
    fn test_set_orientation_basis() {
        let mut p = PlayerState::default();
        p.set_orientation(0.0, 1.0, 0.0);
        assert_eq!(p.side, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(p.up, Vector3::new(0.0, 0.0, 1.0));

        p.set_orientation(0.6, 0.0, 0.8);
        assert!((p.side.y - 1.0).abs() < 1e-12);
        assert!((p.up.x + 0.8).abs() < 1e-12);
        assert!((p.up.z - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_orientation_keeps_side() {
        let mut p = PlayerState::default();
        p.set_orientation(0.0, 1.0, 0.0);
        p.set_orientation(0.0, 0.0, 1.0);
        assert_eq!(p.side, Vector3::new(-1.0, 0.0, 0.0));
        assert!(p.up.x.is_finite() && p.up.y.is_finite() && p.up.z.is_finite());
    }

    #[test]
    fn test_crouched_eye_height() {
        let map = floor_map();
        let mut p = PlayerState::new(Vector3::new(10.5, 10.5, 60.2));
        p.input.crouch = true;
        p.update(&map, 0.01, 0.0);
        assert!((p.eye.z - (p.position.z - 0.45)).abs() < 1e-12);
    }
}
