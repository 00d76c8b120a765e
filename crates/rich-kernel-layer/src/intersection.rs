//! Entrance and exit crossings of trajectories with layers.
//!
//! A query scans the line of the ray against the candidate faces, keeps the
//! crossings that match the requested side and progression, and picks the
//! first entrance or the last exit along the beam axis (z). On aerogel and
//! spherical mirrors the planar crossing can then be moved onto the sphere
//! the tracking mesh approximates.

use rich_kernel_geom::Sphere;
use rich_kernel_math::{Dir3, Point3};
use rich_kernel_raytrace::intersect::intersect_sphere;
use rich_kernel_raytrace::{intersect_surface, Ray};

use crate::kind::LayerKind;
use crate::layer::Layer;

/// Which crossing of the material is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The ray goes into the material (against the outward face normal).
    Entrance,
    /// The ray comes out of the material (along the outward face normal).
    Exit,
}

/// Which half of the line is searched, relative to the ray's z progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Progression {
    /// Crossings ahead of the origin along the beam axis.
    Forward,
    /// Crossings behind the origin along the beam axis.
    Backward,
}

/// Parameters of a [`Layer::find_intersection`] query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntersectionQuery {
    /// Requested side.
    pub side: Side,
    /// Searched half of the line.
    pub progression: Progression,
    /// Move the crossing onto the sphere model on curved layers.
    pub refine: bool,
}

impl IntersectionQuery {
    /// Build a query.
    pub fn new(side: Side, progression: Progression, refine: bool) -> Self {
        Self {
            side,
            progression,
            refine,
        }
    }
}

/// A resolved crossing of a ray with a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Sector of the layer.
    pub sector: u8,
    /// Layer id.
    pub layer: u32,
    /// Component owning the crossed face.
    pub component: Option<usize>,
    /// Crossed face (index in the layer's face arena).
    pub face: usize,
    /// Side of the crossing.
    pub side: Side,
    /// Crossing position.
    pub position: Point3,
    /// Unit normal pointing into the material.
    pub normal: Dir3,
    /// Refractive index on the incoming side (aerogel exits).
    pub n_in: Option<f64>,
    /// Refractive index on the outgoing side (aerogel entrances).
    pub n_out: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    face: usize,
    point: Point3,
    outward: Dir3,
}

fn flipped(d: Dir3) -> Dir3 {
    Dir3::new_unchecked(-d.into_inner())
}

impl Layer {
    /// Resolve the crossing of `ray` with the layer, or with `component`
    /// on aerogel and spherical mirrors.
    ///
    /// With `c` the ray's z direction, a forward query keeps crossings with
    /// `c * (z - z0) >= 0`; among those an entrance query keeps the one with
    /// the smallest `c * z`, an exit query the largest. Crossings closer than
    /// `min_ray_step` to the origin are ignored.
    ///
    /// A refined query on a curved layer returns `None` when no sphere
    /// crossing lies within `max_sphere_deviation` of the planar one.
    ///
    /// # Panics
    ///
    /// Panics if `component` is out of range.
    pub fn find_intersection(
        &self,
        ray: &Ray,
        component: Option<usize>,
        query: IntersectionQuery,
    ) -> Option<Intersection> {
        let kind = self.kind();
        let scope = component.filter(|_| kind.is_curved());
        if let Some(i) = component {
            self.component(i);
        }
        let faces = self.faces(scope);
        let offset = self.face_offset(scope);
        let params = self.params();
        let c = ray.cos_theta();

        let mut best: Option<Candidate> = None;
        for hit in intersect_surface(ray, faces) {
            let face = offset + hit.face;
            if hit.t.abs() < params.min_ray_step {
                log::debug!("layer {} face {face}: crossing at t = {:.4} too close to origin", self.id(), hit.t);
                continue;
            }

            let dz = hit.point.z - ray.origin.z;
            let wrong_way = match query.progression {
                Progression::Forward => c * dz < 0.0,
                Progression::Backward => c * dz > 0.0,
            };
            if wrong_way {
                log::debug!("layer {} face {face}: crossing against {:?} progression", self.id(), query.progression);
                continue;
            }

            let Some(outward) = self.face_normal(face) else {
                log::debug!("layer {} face {face}: degenerate face", self.id());
                continue;
            };
            let dn = ray.direction.dot(outward.as_ref());
            let wrong_side = match query.side {
                Side::Entrance => dn > 0.0,
                Side::Exit => dn < 0.0,
            };
            if wrong_side {
                log::debug!("layer {} face {face}: not an {:?} (dir.n = {dn:.4})", self.id(), query.side);
                continue;
            }

            let better = match &best {
                None => true,
                Some(b) => {
                    let ahead = c * (hit.point.z - b.point.z);
                    match query.side {
                        Side::Entrance => ahead < 0.0,
                        Side::Exit => ahead > 0.0,
                    }
                }
            };
            if better {
                best = Some(Candidate {
                    face,
                    point: hit.point,
                    outward,
                });
            }
        }

        let best = best?;
        let owner = self.component_of_face(best.face);
        let (position, normal) = if query.refine && kind.is_curved() {
            let sphere = self.sphere(owner).or_else(|| self.sphere(None));
            let Some(sphere) = sphere else {
                log::debug!("layer {} component {owner:?}: no sphere model to refine on", self.id());
                return None;
            };
            self.refine_on_sphere(ray, sphere, &best.point)?
        } else {
            (best.point, flipped(best.outward))
        };

        let n = owner.and_then(|i| self.component(i).refractive_index());
        let (n_in, n_out) = match (kind, query.side) {
            (LayerKind::Aerogel(_), Side::Entrance) => (None, n),
            (LayerKind::Aerogel(_), Side::Exit) => (n, None),
            _ => (None, None),
        };

        Some(Intersection {
            sector: self.sector(),
            layer: self.id(),
            component: owner,
            face: best.face,
            side: query.side,
            position,
            normal,
            n_in,
            n_out,
        })
    }

    /// Sphere crossing of the line of `ray` nearest to `planar`, with the
    /// sphere normal pointing into the material.
    fn refine_on_sphere(&self, ray: &Ray, sphere: &Sphere, planar: &Point3) -> Option<(Point3, Dir3)> {
        let max_deviation = self.params().max_sphere_deviation;
        let Some(point) = intersect_sphere(ray, sphere)
            .into_iter()
            .map(|t| ray.at(t))
            .min_by(|a, b| (a - planar).norm().total_cmp(&(b - planar).norm()))
        else {
            log::debug!("layer {}: ray misses the sphere model", self.id());
            return None;
        };
        let deviation = (point - planar).norm();
        if deviation > max_deviation {
            log::debug!(
                "layer {}: sphere crossing {deviation:.3} away from planar hit (max {max_deviation})",
                self.id()
            );
            return None;
        }
        let outward = sphere.normal_at(&point)?;
        Some((point, flipped(outward)))
    }

    /// Forward entrance, refined on curved layers when possible.
    pub fn find_entrance(&self, ray: &Ray, component: Option<usize>) -> Option<Intersection> {
        self.find_with_fallback(ray, component, Side::Entrance)
    }

    /// Forward exit, refined on curved layers when possible.
    pub fn find_exit(&self, ray: &Ray, component: Option<usize>) -> Option<Intersection> {
        self.find_with_fallback(ray, component, Side::Exit)
    }

    /// Forward entrance on the sphere model only.
    pub fn find_entrance_curved(&self, ray: &Ray, component: Option<usize>) -> Option<Intersection> {
        self.find_intersection(ray, component, IntersectionQuery::new(Side::Entrance, Progression::Forward, true))
    }

    /// Forward exit on the sphere model only.
    pub fn find_exit_curved(&self, ray: &Ray, component: Option<usize>) -> Option<Intersection> {
        self.find_intersection(ray, component, IntersectionQuery::new(Side::Exit, Progression::Forward, true))
    }

    fn find_with_fallback(&self, ray: &Ray, component: Option<usize>, side: Side) -> Option<Intersection> {
        let refined = self.find_intersection(ray, component, IntersectionQuery::new(side, Progression::Forward, true));
        if refined.is_some() || !self.kind().is_curved() {
            return refined;
        }
        log::debug!("layer {}: falling back to the planar {side:?}", self.id());
        self.find_intersection(ray, component, IntersectionQuery::new(side, Progression::Forward, false))
    }
}
