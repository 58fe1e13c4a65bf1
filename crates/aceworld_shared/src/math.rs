//! Vector and matrix algebra used by the map and physics crates.
//!
//! All types are plain `Copy` values. Doubles are used throughout; the
//! physics integrators depend on the per-axis arithmetic staying exact.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Below this `sin(theta)` slerp falls back to linear blending.
const SLERP_LINEAR_THRESHOLD: f64 = 0.001;

// ============================================================================
// VECTOR3
// ============================================================================

/// 3D vector - position, velocity, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new Vector3
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the components as an array.
    #[inline]
    #[must_use]
    pub const fn get(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Overwrites all three components.
    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Copies the components of `other` into `self`.
    pub fn set_vector(&mut self, other: Self) -> &mut Self {
        *self = other;
        self
    }

    /// Returns a copy offset by the given deltas.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared length (avoids sqrt)
    #[must_use]
    pub fn sq_magnitude(self) -> f64 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.sq_magnitude().sqrt()
    }

    /// Squared distance to another point
    #[must_use]
    pub fn sq_distance(self, other: Self) -> f64 {
        (self - other).sq_magnitude()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.sq_distance(other).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[must_use]
    pub fn norm(self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self::new(self.x / mag, self.y / mag, self.z / mag)
        } else {
            Self::ZERO
        }
    }

    /// Clamps every component into `[min, max]`.
    #[must_use]
    pub fn clamp(self, min: f64, max: f64) -> Self {
        Self::new(
            min.max(self.x.min(max)),
            min.max(self.y.min(max)),
            min.max(self.z.min(max)),
        )
    }

    /// Clamps each component into its own `[min.axis, max.axis]` range.
    #[must_use]
    pub fn clamp_per_axis(self, min: Self, max: Self) -> Self {
        Self::new(
            min.x.max(self.x.min(max.x)),
            min.y.max(self.y.min(max.y)),
            min.z.max(self.z.min(max.z)),
        )
    }

    /// Spherical interpolation from `self` towards `other`.
    ///
    /// The angle is measured between the normalized inputs but the weights
    /// are applied to the original (unnormalized) vectors. Nearly parallel
    /// inputs blend linearly. A zero-length input returns `self` unchanged.
    #[must_use]
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let mag1 = self.magnitude();
        let mag2 = other.magnitude();
        if mag1 == 0.0 || mag2 == 0.0 {
            return self;
        }

        let cos_theta = (self * (1.0 / mag1)).dot(other * (1.0 / mag2)).clamp(-1.0, 1.0);
        let theta = cos_theta.acos();
        let sin_theta = theta.sin();

        let (a, b) = if sin_theta < SLERP_LINEAR_THRESHOLD {
            (1.0 - t, t)
        } else {
            (
                ((1.0 - t) * theta).sin() / sin_theta,
                (t * theta).sin() / sin_theta,
            )
        };

        self * a + other * b
    }
}

impl std::ops::Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f64> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

// ============================================================================
// INTVECTOR3
// ============================================================================

/// Integer voxel coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct IntVector3 {
    /// X component
    pub x: i32,
    /// Y component
    pub y: i32,
    /// Z component
    pub z: i32,
}

impl IntVector3 {
    /// Creates a new IntVector3
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the components as an array.
    #[inline]
    #[must_use]
    pub const fn get(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Overwrites all three components.
    pub fn set(&mut self, x: i32, y: i32, z: i32) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Copies the components of `other` into `self`.
    pub fn set_vector(&mut self, other: Self) -> &mut Self {
        *self = other;
        self
    }

    /// Rotates about the Z axis in quarter turns (`angle & 3`).
    #[must_use]
    pub const fn rotate_z(self, angle: i32) -> Self {
        match angle & 3 {
            1 => Self::new(-self.y, self.x, self.z),
            2 => Self::new(-self.x, -self.y, self.z),
            3 => Self::new(self.y, -self.x, self.z),
            _ => self,
        }
    }

    /// Rotates about the X axis in quarter turns (`angle & 3`).
    #[must_use]
    pub const fn rotate_x(self, angle: i32) -> Self {
        match angle & 3 {
            1 => Self::new(self.x, -self.z, self.y),
            2 => Self::new(self.x, -self.y, -self.z),
            3 => Self::new(self.x, self.z, -self.y),
            _ => self,
        }
    }

    /// Rotates about the Y axis in quarter turns (`angle & 3`).
    #[must_use]
    pub const fn rotate_y(self, angle: i32) -> Self {
        match angle & 3 {
            1 => Self::new(self.z, self.y, -self.x),
            2 => Self::new(-self.x, self.y, -self.z),
            3 => Self::new(-self.z, self.y, self.x),
            _ => self,
        }
    }
}

// ============================================================================
// MATRIX4
// ============================================================================

/// 4x4 homogeneous transform.
///
/// Storage is a flat array of 16 doubles; the translation lives in
/// elements 12..15 and `multiply_vector` treats the array column-major.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix4 {
    /// Raw elements.
    pub data: [f64; 16],
}

impl Matrix4 {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Creates an identity matrix.
    #[must_use]
    pub const fn new() -> Self {
        Self::IDENTITY
    }

    /// Resets to identity.
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Composes an axis-angle rotation (radians) onto this matrix.
    ///
    /// The axis is normalized first; a zero axis is used as-is.
    /// The result is `self * rot`, not a replacement.
    pub fn rotate(&mut self, angle: f64, x: f64, y: f64, z: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        let axis = Vector3::new(x, y, z);
        let len = axis.magnitude();
        let Vector3 { x, y, z } = if len > 0.0 { axis * (1.0 / len) } else { axis };

        let mut rot = Self::IDENTITY;
        rot.data[0] = t * x * x + c;
        rot.data[1] = t * x * y - s * z;
        rot.data[2] = t * x * z + s * y;

        rot.data[4] = t * x * y + s * z;
        rot.data[5] = t * y * y + c;
        rot.data[6] = t * y * z - s * x;

        rot.data[8] = t * x * z - s * y;
        rot.data[9] = t * y * z + s * x;
        rot.data[10] = t * z * z + c;

        let mut result = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                result[i * 4 + j] = (0..4)
                    .map(|k| self.data[i * 4 + k] * rot.data[k * 4 + j])
                    .sum();
            }
        }
        self.data = result;
        self
    }

    /// Overwrites the translation component.
    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.data[12] = x;
        self.data[13] = y;
        self.data[14] = z;
        self
    }

    /// Rebuilds the rotational block from a forward and an up hint.
    ///
    /// Right is `up x forward`, the corrected up is `forward x right`.
    /// Translation is cleared.
    pub fn orientation(&mut self, forward: Vector3, up: Vector3) -> &mut Self {
        let f = forward.norm();
        let r = up.cross(f).norm();
        let u = f.cross(r);

        self.data = [
            r.x, u.x, f.x, 0.0, //
            r.y, u.y, f.y, 0.0, //
            r.z, u.z, f.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        self
    }

    /// Transforms a point. Divides by `w` only when it is neither 0 nor 1.
    #[must_use]
    pub fn multiply_vector(&self, v: Vector3) -> Vector3 {
        let d = &self.data;
        let mut x = v.x * d[0] + v.y * d[4] + v.z * d[8] + d[12];
        let mut y = v.x * d[1] + v.y * d[5] + v.z * d[9] + d[13];
        let mut z = v.x * d[2] + v.y * d[6] + v.z * d[10] + d[14];
        let w = v.x * d[3] + v.y * d[7] + v.z * d[11] + d[15];

        if w != 1.0 && w != 0.0 {
            x /= w;
            y /= w;
            z /= w;
        }
        Vector3::new(x, y, z)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
