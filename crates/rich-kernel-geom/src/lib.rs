#![warn(missing_docs)]

//! Surface types for the RICH geometry kernel.
//!
//! Detector components are described by triangulated tracking surfaces
//! produced upstream by the solid builder. Curved optical elements also
//! carry the sphere the triangulation approximates.

use rich_kernel_math::{Dir3, Point3, Transform, Vec3, VecExt};

// =============================================================================
// Face
// =============================================================================

/// A triangular face with ordered corners.
///
/// The corner order defines the normal `(b - a) × (c - a)`. Mesh builders
/// must keep it consistent so that normals point out of the material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// The three corners in winding order.
    pub corners: [Point3; 3],
}

impl Face {
    /// Create a face from three corners.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { corners: [a, b, c] }
    }

    /// Corner `i` (0, 1 or 2).
    #[inline]
    pub fn corner(&self, i: usize) -> &Point3 {
        &self.corners[i]
    }

    /// Unnormalized normal from the ordered cross product.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = &self.corners;
        (b - a).cross(&(c - a))
    }

    /// Unit normal, or `None` for a degenerate (zero-area) face.
    pub fn unit_normal(&self) -> Option<Dir3> {
        self.normal().as_unit()
    }

    /// Centroid of the three corners.
    pub fn centroid(&self) -> Point3 {
        let [a, b, c] = &self.corners;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Apply an affine transform to every corner.
    pub fn transformed(&self, t: &Transform) -> Self {
        let [a, b, c] = &self.corners;
        Self::new(t.apply_point(a), t.apply_point(b), t.apply_point(c))
    }
}

// =============================================================================
// Surface
// =============================================================================

/// An ordered triangle mesh.
///
/// Face order is meaningful: normal lookups return the first face with a
/// matching orientation, so builders put preferred faces first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    faces: Vec<Face>,
}

impl Surface {
    /// An empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface made of the given faces, in order.
    pub fn from_faces(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Fan triangulation of a planar convex polygon.
    ///
    /// The polygon winding gives the face normals. Fewer than three
    /// corners give an empty surface.
    pub fn from_polygon(corners: &[Point3]) -> Self {
        let mut surface = Self::new();
        if corners.len() < 3 {
            return surface;
        }
        let apex = corners[0];
        for pair in corners[1..].windows(2) {
            surface.push(Face::new(apex, pair[0], pair[1]));
        }
        surface
    }

    /// Append a face.
    pub fn push(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Append all faces of `other`, keeping their order.
    pub fn append(&mut self, other: &Surface) {
        self.faces.extend_from_slice(&other.faces);
    }

    /// The faces in order.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Face `i`.
    #[inline]
    pub fn face(&self, i: usize) -> &Face {
        &self.faces[i]
    }

    /// Number of faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True if the surface has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterate over every corner of every face (with repetitions).
    pub fn vertices(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.faces.iter().flat_map(|f| f.corners.iter())
    }

    /// Apply an affine transform to every face.
    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            faces: self.faces.iter().map(|f| f.transformed(t)).collect(),
        }
    }
}

impl FromIterator<Face> for Surface {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        Self {
            faces: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Sphere
// =============================================================================

/// The sphere a curved component's tracking surface approximates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius of the sphere.
    pub radius: f64,
}

impl Sphere {
    /// Create a sphere from center and radius.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Outward unit normal at `point` (direction from the center).
    ///
    /// `None` when `point` coincides with the center.
    pub fn normal_at(&self, point: &Point3) -> Option<Dir3> {
        (point - self.center).as_unit()
    }

    /// Distance of `point` from the sphere surface, positive outside.
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.center).norm() - self.radius
    }

    /// Apply an affine transform. The radius follows the transform's scale.
    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            center: t.apply_point(&self.center),
            radius: self.radius * t.scale_factor(),
        }
    }
}

// =============================================================================
// Plane
// =============================================================================

/// An infinite plane defined by an origin point and a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Origin point on the plane.
    pub origin: Point3,
    /// Unit normal.
    pub normal_dir: Dir3,
}

impl Plane {
    /// Create a plane through `origin` with the given normal.
    ///
    /// `None` if the normal has zero length.
    pub fn from_normal(origin: Point3, normal: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            normal_dir: normal.as_unit()?,
        })
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal_dir.as_ref())
    }

    /// Orthogonal projection of a point onto the plane.
    pub fn project(&self, p: &Point3) -> Point3 {
        p - self.signed_distance(p) * self.normal_dir.as_ref()
    }
}
