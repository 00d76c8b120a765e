#![warn(missing_docs)]

//! Math types for the RICH geometry kernel.
//!
//! Thin wrappers around nalgebra providing the point, vector and
//! direction types used by the detector geometry, an affine transform
//! for placing components into a sector frame, and the small set of
//! spherical-coordinate helpers the layer model relies on.

use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Magnitude below which a vector is treated as having no direction.
pub const ZERO_LENGTH: f64 = 1e-12;

/// Midpoint of the segment `a`-`b`.
#[inline]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Spherical-coordinate and projection helpers on [`Vec3`].
///
/// The polar convention is physics-style: `theta` is measured from +z,
/// `phi` is the azimuth in the XY plane measured from +x.
pub trait VecExt {
    /// Polar angle from +z in `[0, π]`. Zero for the zero vector.
    fn theta(&self) -> f64;

    /// Azimuthal angle `atan2(y, x)` in `(-π, π]`.
    fn phi(&self) -> f64;

    /// Unsigned angle to `other` in `[0, π]`. Zero if either vector is zero.
    fn angle_to(&self, other: &Vec3) -> f64;

    /// Rotate about `axis` by `angle` radians (right-hand rule).
    ///
    /// A zero-length axis leaves the vector unchanged.
    fn rotated(&self, axis: &Vec3, angle: f64) -> Vec3;

    /// Vector projection onto `axis`. Zero if `axis` is zero.
    fn projection(&self, axis: &Vec3) -> Vec3;

    /// Unit vector along `self`, or `None` for a zero-length vector.
    fn as_unit(&self) -> Option<Dir3>;
}

impl VecExt for Vec3 {
    fn theta(&self) -> f64 {
        let mag = self.norm();
        if mag < ZERO_LENGTH {
            return 0.0;
        }
        (self.z / mag).clamp(-1.0, 1.0).acos()
    }

    fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }

    fn angle_to(&self, other: &Vec3) -> f64 {
        let prod = self.norm() * other.norm();
        if prod < ZERO_LENGTH {
            return 0.0;
        }
        (self.dot(other) / prod).clamp(-1.0, 1.0).acos()
    }

    fn rotated(&self, axis: &Vec3, angle: f64) -> Vec3 {
        match axis.as_unit() {
            Some(axis) => Transform::rotation_about_axis(&axis, angle).apply_vec(self),
            None => *self,
        }
    }

    fn projection(&self, axis: &Vec3) -> Vec3 {
        let den = axis.norm_squared();
        if den < ZERO_LENGTH * ZERO_LENGTH {
            return Vec3::zeros();
        }
        axis * (self.dot(axis) / den)
    }

    fn as_unit(&self) -> Option<Dir3> {
        Dir3::try_new(*self, ZERO_LENGTH)
    }
}

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    ///
    /// Sectors of the detector are related by rotations about the beam (z) axis.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Rotation about an arbitrary axis through the origin by `angle` radians.
    ///
    /// Uses Rodrigues' rotation formula.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
        let mut m = Matrix4::identity();
        m[(0, 0)] = t * x * x + c;
        m[(0, 1)] = t * x * y - s * z;
        m[(0, 2)] = t * x * z + s * y;
        m[(1, 0)] = t * x * y + s * z;
        m[(1, 1)] = t * y * y + c;
        m[(1, 2)] = t * y * z - s * x;
        m[(2, 0)] = t * x * z - s * y;
        m[(2, 1)] = t * y * z + s * x;
        m[(2, 2)] = t * z * z + c;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation, applies rotation/scale).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Uniform scale factor of the linear part, taken as the length of the
    /// transformed x axis.
    pub fn scale_factor(&self) -> f64 {
        self.apply_vec(&Vec3::x()).norm()
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
