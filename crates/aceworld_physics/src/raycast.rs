//! # Voxel Ray Casting
//!
//! Grid traversal (DDA) over [`clipworld`], used for block selection and
//! line-of-sight checks. Rays leave the map freely through its sides and
//! end once they can no longer reach a solid voxel, whatever the length.

use aceworld_map::{clipworld, AceMap};
use aceworld_shared::{IntVector3, Vector3};

/// Directions shorter than this are treated as zero.
const MIN_DIRECTION: f64 = 1e-4;

/// Result of a ray cast against the voxel map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The voxel that was hit.
    pub voxel: IntVector3,
    /// Face normal of the hit (-1, 0 or 1 per axis). Zero when the ray
    /// starts inside a solid voxel.
    pub normal: IntVector3,
    /// Distance from the origin to the entry point.
    pub distance: f64,
    /// Entry point in world space.
    pub point: Vector3,
}

/// Casts a ray and returns the first solid voxel within `length`.
///
/// With `is_direction` false, `dir` is a target point and the ray aims at
/// it from `origin`.
#[must_use]
pub fn cast_ray<M: AceMap + ?Sized>(
    map: &M,
    origin: Vector3,
    dir: Vector3,
    length: f64,
    is_direction: bool,
) -> Option<RayHit> {
    let dir = if is_direction { dir } else { dir - origin };
    let len = dir.magnitude();
    if len < MIN_DIRECTION {
        return None;
    }
    let dir = dir * (1.0 / len);
    let d = dir.get();
    let o = origin.get();

    let mut voxel = [o[0].floor() as i32, o[1].floor() as i32, o[2].floor() as i32];
    let mut step = [0i32; 3];
    let mut t_delta = [f64::INFINITY; 3];
    let mut t_max = [f64::INFINITY; 3];
    for axis in 0..3 {
        if d[axis].abs() < MIN_DIRECTION {
            continue;
        }
        step[axis] = if d[axis] > 0.0 { 1 } else { -1 };
        t_delta[axis] = (1.0 / d[axis]).abs();
        let boundary = if d[axis] > 0.0 {
            f64::from(voxel[axis]) + 1.0
        } else {
            f64::from(voxel[axis])
        };
        t_max[axis] = (boundary - o[axis]) / d[axis];
    }

    let mut distance = 0.0;
    let mut normal = [0i32; 3];
    while distance <= length {
        if clipworld(map, voxel[0], voxel[1], voxel[2]) {
            return Some(RayHit {
                voxel: IntVector3::new(voxel[0], voxel[1], voxel[2]),
                normal: IntVector3::new(normal[0], normal[1], normal[2]),
                distance,
                point: origin + dir * distance,
            });
        }

        if has_escaped(map, voxel, step) {
            break;
        }

        let axis = if t_max[0] < t_max[1] && t_max[0] < t_max[2] {
            0
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        if !t_max[axis].is_finite() {
            break;
        }
        distance = t_max[axis];
        t_max[axis] += t_delta[axis];
        voxel[axis] += step[axis];
        normal = [0; 3];
        normal[axis] = -step[axis];
    }

    None
}

/// Whether the ray is outside the open sides of the map and not heading
/// back in. Everything such a ray can visit is open.
fn has_escaped<M: AceMap + ?Sized>(map: &M, voxel: [i32; 3], step: [i32; 3]) -> bool {
    let (size_x, size_y, _) = map.extent();
    let away = |v: i32, s: i32, size: i32| (v < 0 && s <= 0) || (v >= size && s >= 0);
    away(voxel[0], step[0], size_x) || away(voxel[1], step[1], size_y) || (voxel[2] < 0 && step[2] <= 0)
}
