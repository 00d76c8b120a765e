//! Ray-surface intersection algorithms.
//!
//! Each primitive has a dedicated intersector returning line parameters.
//! [`intersect_surface`] runs the triangle intersector over a whole mesh.

mod plane;
mod sphere;
mod triangle;

pub use plane::intersect_plane;
pub use sphere::intersect_sphere;
pub use triangle::intersect_triangle;

use rich_kernel_geom::Face;
use rich_kernel_math::Point3;
use crate::Ray;

/// A crossing of a ray with one face of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Signed parameter along the ray.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
    /// Index of the face in the slice that was intersected.
    pub face: usize,
}

/// Intersect a ray with every face of a mesh.
///
/// Hits are returned in face order, one per crossed face. A ray through a
/// shared edge is reported once for each face touching it.
pub fn intersect_surface(ray: &Ray, faces: &[Face]) -> Vec<SurfaceHit> {
    faces
        .iter()
        .enumerate()
        .filter_map(|(face, f)| {
            intersect_triangle(ray, f).map(|t| SurfaceHit {
                t,
                point: ray.at(t),
                face,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rich_kernel_geom::Surface;
    use rich_kernel_math::Vec3;

    fn square(z: f64) -> Surface {
        Surface::from_polygon(&[
            Point3::new(-10.0, -10.0, z),
            Point3::new(10.0, -10.0, z),
            Point3::new(10.0, 10.0, z),
            Point3::new(-10.0, 10.0, z),
        ])
    }

    #[test]
    fn test_surface_hits_both_sides_of_origin() {
        let mut mesh = square(0.0);
        mesh.append(&square(20.0));
        let ray = Ray::new(Point3::new(1.0, 2.0, 10.0), Vec3::z());
        let hits = intersect_surface(&ray, mesh.faces());
        assert_eq!(hits.len(), 2);
        let ts: Vec<f64> = hits.iter().map(|h| h.t).collect();
        assert!(ts.iter().any(|t| (t + 10.0).abs() < 1e-10));
        assert!(ts.iter().any(|t| (t - 10.0).abs() < 1e-10));
        for h in &hits {
            assert!((h.point.x - 1.0).abs() < 1e-10);
            assert!((h.point.y - 2.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_surface_hit_on_shared_edge() {
        // The fan diagonal runs through the square center.
        let mesh = square(0.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, -100.0), Vec3::z());
        let hits = intersect_surface(&ray, mesh.faces());
        assert!(!hits.is_empty());
        for h in &hits {
            assert!((h.t - 100.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_surface_miss() {
        let mesh = square(0.0);
        let ray = Ray::new(Point3::new(50.0, 0.0, -100.0), Vec3::z());
        assert!(intersect_surface(&ray, mesh.faces()).is_empty());
    }
}
