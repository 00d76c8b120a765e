//! Ray representation.

use rich_kernel_math::{Dir3, Point3, Vec3, VecExt};

/// A ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// The direction will be normalized. A zero direction yields NaN
    /// components; use [`Ray::try_new`] when the input is not trusted.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: Dir3::new_normalize(direction),
        }
    }

    /// Create a ray, or `None` if `direction` has zero length.
    pub fn try_new(origin: Point3, direction: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.as_unit()?,
        })
    }

    /// The ray starting at `from` and pointing towards `to`.
    ///
    /// `None` if the two points coincide.
    pub fn through(from: &Point3, to: &Point3) -> Option<Self> {
        Self::try_new(*from, to - from)
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Cosine of the direction's polar angle (its z component).
    #[inline]
    pub fn cos_theta(&self) -> f64 {
        self.direction.as_ref().z
    }
}
