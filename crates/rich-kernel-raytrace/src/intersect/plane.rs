//! Ray-plane intersection (closed-form).

use rich_kernel_geom::Plane;
use crate::Ray;

/// Intersect the line of a ray with a plane.
///
/// Returns the signed parameter of the crossing, or `None` if the ray is
/// parallel to the plane.
pub fn intersect_plane(ray: &Ray, plane: &Plane) -> Option<f64> {
    let normal = plane.normal_dir.as_ref();
    let denom = ray.direction.as_ref().dot(normal);

    // Ray is parallel to plane
    if denom.abs() < 1e-12 {
        return None;
    }

    Some((plane.origin - ray.origin).dot(normal) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rich_kernel_math::{Point3, Vec3};

    fn xy() -> Plane {
        Plane::from_normal(Point3::origin(), Vec3::z()).unwrap()
    }

    #[test]
    fn test_ray_plane_perpendicular() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let t = intersect_plane(&ray, &xy()).unwrap();
        assert!((t - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_plane_parallel() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_plane(&ray, &xy()).is_none());
    }

    #[test]
    fn test_ray_plane_behind() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        let t = intersect_plane(&ray, &xy()).unwrap();
        assert!((t + 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_plane_angled() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 0.0, -1.0));
        let t = intersect_plane(&ray, &xy()).unwrap();
        // Diagonal travel: 10 units down in z means 10·√2 along the ray
        assert!((t - 10.0 * 2.0_f64.sqrt()).abs() < 1e-10);
    }
}
