//! Local reference frames of layers and components.

use rich_kernel_math::{Dir3, Point3, Vec3, VecExt};

use crate::error::{GeomError, Result};
use crate::kind::LayerKind;
use crate::layer::Layer;

/// Right-handed orthonormal frame attached to a layer element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    /// Frame origin (the element barycenter).
    pub origin: Point3,
    /// In-plane axis orthogonal to the main axis.
    pub x: Dir3,
    /// Main axis.
    pub y: Dir3,
    /// Element normal.
    pub z: Dir3,
}

impl LocalFrame {
    /// Frame with normal `z` whose `y` is the projection of `y_hint` on the
    /// plane orthogonal to `z`. `None` if `y_hint` is parallel to `z`.
    pub fn new(origin: Point3, y_hint: &Vec3, z: Dir3) -> Option<Self> {
        let x = y_hint.cross(z.as_ref()).as_unit()?;
        let y = z.cross(x.as_ref()).as_unit()?;
        Some(Self { origin, x, y, z })
    }

    /// Coordinates of a global point in this frame.
    pub fn to_local(&self, p: &Point3) -> Point3 {
        let d = p - self.origin;
        Point3::from(self.to_local_vec(&d))
    }

    /// Components of a global vector in this frame.
    pub fn to_local_vec(&self, v: &Vec3) -> Vec3 {
        Vec3::new(v.dot(self.x.as_ref()), v.dot(self.y.as_ref()), v.dot(self.z.as_ref()))
    }

    /// Global position of local coordinates.
    pub fn to_global(&self, p: &Point3) -> Point3 {
        self.origin + self.x.as_ref() * p.x + self.y.as_ref() * p.y + self.z.as_ref() * p.z
    }
}

impl Layer {
    /// Local frame of `component` (whole layer for `None`) built from the
    /// faces oriented along `orientation`.
    ///
    /// The origin is the surface barycenter. The normal is the sphere's
    /// outward normal at the origin on spherical mirrors, the first oriented
    /// face normal otherwise. The main axis is compared against
    /// [`Layer::main_axis_reference`].
    pub fn local_frame(&self, component: Option<usize>, orientation: &Vec3) -> Result<LocalFrame> {
        let layer = self.id();
        let sphere = match self.kind() {
            LayerKind::SphericalMirror => Some(
                self.sphere(component)
                    .ok_or(GeomError::MissingSphere { layer, component })?,
            ),
            LayerKind::Aerogel(_) | LayerKind::PlanarMirror(_) | LayerKind::PhotoDetector => None,
        };

        let origin = self
            .surface_barycenter(component, orientation)
            .ok_or(GeomError::NoBarycenter { layer, component })?;

        let z = match sphere {
            Some(sphere) => sphere.normal_at(&origin),
            None => self.component_normal(component, orientation),
        }
        .ok_or(GeomError::NoOrientedFace { layer, component })?;

        let y = self
            .main_axis(component, orientation, &self.main_axis_reference())
            .ok_or(GeomError::NoMainAxis { layer, component })?;

        LocalFrame::new(origin, &y, z).ok_or(GeomError::NoMainAxis { layer, component })
    }
}
