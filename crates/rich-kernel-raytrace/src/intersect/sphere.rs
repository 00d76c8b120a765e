//! Ray-sphere intersection (quadratic equation).

use rich_kernel_geom::Sphere;
use crate::Ray;

/// Relative discriminant below which the line is treated as tangent.
const TANGENT_EPS: f64 = 1e-12;

/// Intersect the line of a ray with a sphere.
///
/// Returns 0, 1 (tangent) or 2 signed parameters, sorted by t. Crossings
/// behind the origin are included.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Vec<f64> {
    let oc = ray.origin - sphere.center;
    let d = ray.direction.as_ref();

    // Quadratic: |oc + t*d|^2 = r^2 with |d| = 1
    let b = oc.dot(d);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - c;
    let scale = (sphere.radius * sphere.radius).max(1.0);
    if discriminant < -TANGENT_EPS * scale {
        return Vec::new();
    }
    if discriminant.abs() <= TANGENT_EPS * scale {
        return vec![-b];
    }

    let sqrt_disc = discriminant.sqrt();
    vec![-b - sqrt_disc, -b + sqrt_disc]
}
