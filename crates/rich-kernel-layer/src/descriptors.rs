//! Barycenters, normals and main axes of layers and components.

use rich_kernel_geom::{Face, Plane, Sphere};
use rich_kernel_math::{midpoint, Dir3, Point3, Vec3, VecExt};
use rich_kernel_raytrace::intersect::{intersect_plane, intersect_sphere};
use rich_kernel_raytrace::Ray;

use crate::kind::LayerKind;
use crate::layer::Layer;

/// Corners of the faces whose normal points along `orientation`
/// (strictly positive dot product), deduplicated with `tolerance`.
pub fn select_vertices(faces: &[Face], orientation: &Vec3, tolerance: f64) -> Vec<Point3> {
    let corners = faces
        .iter()
        .filter(|f| f.normal().dot(orientation) > 0.0)
        .flat_map(|f| f.corners.iter().copied());
    dedup_points(corners, tolerance)
}

/// Keep each point unless an already accepted point lies closer than
/// `tolerance`. Input order is preserved.
pub fn dedup_points(points: impl IntoIterator<Item = Point3>, tolerance: f64) -> Vec<Point3> {
    let mut accepted: Vec<Point3> = Vec::new();
    for p in points {
        if accepted.iter().all(|q| (p - q).norm() >= tolerance) {
            accepted.push(p);
        }
    }
    accepted
}

/// Arithmetic mean of a point set, `None` if empty.
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Crossing of the line `center -> estimate` with `sphere` nearest to
/// `estimate`, if closer than `max_deviation`.
fn reproject_on_sphere(sphere: &Sphere, estimate: &Point3, max_deviation: f64) -> Option<Point3> {
    let ray = Ray::through(&sphere.center, estimate)?;
    let best = intersect_sphere(&ray, sphere)
        .into_iter()
        .map(|t| ray.at(t))
        .min_by(|a, b| (a - estimate).norm().total_cmp(&(b - estimate).norm()))?;
    let deviation = (best - estimate).norm();
    if deviation > max_deviation {
        log::debug!("sphere re-projection rejected: deviation {deviation:.3} > {max_deviation}");
        return None;
    }
    Some(best)
}

impl Layer {
    /// Deduplicated corners of the faces of `component` (whole layer for
    /// `None`) oriented along `orientation`.
    pub fn select_vertices(&self, component: Option<usize>, orientation: &Vec3) -> Vec<Point3> {
        select_vertices(self.faces(component), orientation, self.params().vertex_tolerance)
    }

    /// Barycenter of the vertices of the faces oriented along `orientation`.
    ///
    /// On spherical mirrors the planar estimate is moved onto the sphere
    /// along the line from the sphere center. `None` when no face qualifies,
    /// when the sphere model is missing, or when the re-projection lands
    /// further than `max_sphere_deviation` away.
    pub fn surface_barycenter(&self, component: Option<usize>, orientation: &Vec3) -> Option<Point3> {
        let vertices = self.select_vertices(component, orientation);
        let Some(estimate) = centroid(&vertices) else {
            log::warn!(
                "layer {} component {:?}: no face oriented along {:?}, no barycenter",
                self.id(),
                component,
                orientation
            );
            return None;
        };

        match self.kind() {
            LayerKind::SphericalMirror => {
                let Some(sphere) = self.sphere(component) else {
                    log::warn!("layer {} component {:?}: no sphere model", self.id(), component);
                    return None;
                };
                reproject_on_sphere(sphere, &estimate, self.params().max_sphere_deviation)
            }
            LayerKind::Aerogel(_) | LayerKind::PlanarMirror(_) | LayerKind::PhotoDetector => {
                Some(estimate)
            }
        }
    }

    /// Center of component `index`: mean of the barycenters of its inward
    /// and outward sides.
    pub fn component_barycenter(&self, index: usize) -> Option<Point3> {
        let inward = self.inward().into_inner();
        let front = self.surface_barycenter(Some(index), &inward)?;
        let back = self.surface_barycenter(Some(index), &-inward)?;
        Some(midpoint(&front, &back))
    }

    /// Unit normal of the first face (mesh order) of `component` whose
    /// normal points along `orientation`.
    pub fn component_normal(&self, component: Option<usize>, orientation: &Vec3) -> Option<Dir3> {
        self.faces(component)
            .iter()
            .filter(|f| f.normal().dot(orientation) > 0.0)
            .find_map(Face::unit_normal)
    }

    /// Normal of the whole layer along its inward vector.
    pub fn layer_normal(&self) -> Option<Dir3> {
        self.component_normal(None, &self.inward().into_inner())
    }

    /// Outward unit normal of arena face `face`. `None` for degenerate
    /// faces and out-of-range indices.
    pub fn face_normal(&self, face: usize) -> Option<Dir3> {
        self.global_surface().faces().get(face)?.unit_normal()
    }

    /// True if `ray` enters the material through arena face `face`.
    pub fn is_entering(&self, ray: &Ray, face: usize) -> bool {
        self.face_normal(face)
            .is_some_and(|n| ray.direction.dot(n.as_ref()) <= 0.0)
    }

    /// True if `ray` leaves the material through arena face `face`.
    pub fn is_leaving(&self, ray: &Ray, face: usize) -> bool {
        self.face_normal(face)
            .is_some_and(|n| ray.direction.dot(n.as_ref()) >= 0.0)
    }

    /// Reference direction the main axis is compared against: global Z
    /// for lateral mirrors, global Y otherwise.
    pub fn main_axis_reference(&self) -> Vec3 {
        if self.kind().is_lateral_mirror() {
            Vec3::z()
        } else {
            Vec3::y()
        }
    }

    /// Longest barycenter-to-edge-midpoint vector within
    /// `main_axis_cutoff_deg` of `reference`.
    ///
    /// Pairs of selected vertices closer than `vertex_tolerance` are
    /// skipped, as are midpoints coinciding with the barycenter.
    pub fn main_axis(&self, component: Option<usize>, orientation: &Vec3, reference: &Vec3) -> Option<Dir3> {
        let bary = self.surface_barycenter(component, orientation)?;
        let vertices = self.select_vertices(component, orientation);
        let params = self.params();
        let cutoff = params.main_axis_cutoff_deg.to_radians();

        let mut best: Option<Vec3> = None;
        for (i, a) in vertices.iter().enumerate() {
            for b in &vertices[i + 1..] {
                if (b - a).norm() < params.vertex_tolerance {
                    continue;
                }
                let vm = midpoint(a, b) - bary;
                if vm.norm() < params.vertex_tolerance || vm.angle_to(reference) >= cutoff {
                    continue;
                }
                if best.map_or(true, |v| vm.norm() > v.norm()) {
                    best = Some(vm);
                }
            }
        }
        best?.as_unit()
    }

    /// All vertices of `component` lie no further than
    /// `sphere_check_tolerance` outside its sphere model. False without a
    /// sphere model.
    pub fn sphere_consistent(&self, component: Option<usize>) -> bool {
        let Some(sphere) = self.sphere(component) else {
            return false;
        };
        let tolerance = self.params().sphere_check_tolerance;
        let vertices = self.select_vertices(component, &self.inward().into_inner());
        let worst = vertices
            .iter()
            .map(|v| sphere.signed_distance(v))
            .fold(f64::NEG_INFINITY, f64::max);
        if worst > tolerance {
            log::debug!(
                "layer {} component {:?}: vertex {worst:.3} outside sphere",
                self.id(),
                component
            );
        }
        worst <= tolerance
    }

    /// Plane the trajectory crossing is reported on: through the layer
    /// barycenter, normal to the layer, both taken on the side facing the
    /// interaction point (the opposite side for the photo-detector).
    pub fn trajectory_plane(&self) -> Option<Plane> {
        let inward = self.inward().into_inner();
        let toward = match self.kind() {
            LayerKind::PhotoDetector => inward,
            LayerKind::Aerogel(_) | LayerKind::PlanarMirror(_) | LayerKind::SphericalMirror => -inward,
        };
        let origin = self.surface_barycenter(None, &toward)?;
        let normal = self.component_normal(None, &toward)?;
        Plane::from_normal(origin, normal.into_inner())
    }

    /// Crossing of the line of `ray` with [`Layer::trajectory_plane`].
    pub fn trajectory_crossing(&self, ray: &Ray) -> Option<Point3> {
        let plane = self.trajectory_plane()?;
        intersect_plane(ray, &plane).map(|t| ray.at(t))
    }
}
