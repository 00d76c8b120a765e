//! Ray-triangle intersection (Möller-Trumbore).

use rich_kernel_geom::Face;
use crate::Ray;

/// Barycentric slack so that crossings on a shared edge are not lost
/// between two adjacent faces.
const EDGE_EPS: f64 = 1e-9;

/// Determinant magnitude below which the ray is parallel to the face.
const PARALLEL_EPS: f64 = 1e-12;

/// Intersect the line of a ray with a triangle.
///
/// Returns the signed parameter `t` of the crossing, which may be negative
/// (behind the origin). Returns `None` if the line misses the triangle, is
/// parallel to it, or the triangle is degenerate.
pub fn intersect_triangle(ray: &Ray, face: &Face) -> Option<f64> {
    let [v0, v1, v2] = &face.corners;
    let d = ray.direction.as_ref();

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = d.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < PARALLEL_EPS {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(-EDGE_EPS..=1.0 + EDGE_EPS).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * d.dot(&q);
    if v < -EDGE_EPS || u + v > 1.0 + EDGE_EPS {
        return None;
    }

    Some(f * edge2.dot(&q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rich_kernel_math::{Point3, Vec3};

    fn tri() -> Face {
        Face::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        )
    }

    #[test]
    fn test_ray_triangle_front() {
        let ray = Ray::new(Point3::new(1.0, 1.0, -5.0), Vec3::z());
        let t = intersect_triangle(&ray, &tri()).unwrap();
        assert!((t - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_ray_triangle_behind_origin() {
        let ray = Ray::new(Point3::new(1.0, 1.0, 5.0), Vec3::z());
        let t = intersect_triangle(&ray, &tri()).unwrap();
        assert!((t + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_ray_triangle_winding_irrelevant() {
        let f = tri();
        let back = Face::new(f.corners[0], f.corners[2], f.corners[1]);
        let ray = Ray::new(Point3::new(1.0, 1.0, -5.0), Vec3::z());
        assert!(intersect_triangle(&ray, &back).is_some());
    }

    #[test]
    fn test_ray_triangle_miss() {
        let ray = Ray::new(Point3::new(3.0, 3.0, -5.0), Vec3::z());
        assert!(intersect_triangle(&ray, &tri()).is_none());
    }

    #[test]
    fn test_ray_triangle_parallel() {
        let ray = Ray::new(Point3::new(1.0, 1.0, 0.0), Vec3::x());
        assert!(intersect_triangle(&ray, &tri()).is_none());
    }

    #[test]
    fn test_ray_triangle_on_edge() {
        // Hypotenuse x + y = 4
        let ray = Ray::new(Point3::new(2.0, 2.0, -1.0), Vec3::z());
        let t = intersect_triangle(&ray, &tri()).unwrap();
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ray_triangle_oblique() {
        let ray = Ray::new(Point3::new(0.0, 0.5, 3.0), Vec3::new(1.0, 0.0, -1.0));
        let t = intersect_triangle(&ray, &tri()).unwrap();
        assert!((t - 3.0 * 2.0_f64.sqrt()).abs() < 1e-10);
        let p = ray.at(t);
        assert!((p.x - 3.0).abs() < 1e-10);
        assert!(p.z.abs() < 1e-10);
    }
}
