//! Rigid sub-elements of a layer.

use std::ops::Range;

use rich_kernel_geom::{Sphere, Surface};

/// Classification codes of a component, as delivered by the geometry builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentClass {
    /// Volume type code.
    pub volume_type: i32,
    /// True for optically active elements.
    pub optical: bool,
    /// Mirror type code (0 for non-mirrors).
    pub mirror_type: i32,
}

/// A component as handed over by the geometry builder, before the layer
/// is frozen.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    /// Component identifier.
    pub id: u32,
    /// Classification codes.
    pub class: ComponentClass,
    /// Refractive index (refractive components only).
    pub refractive_index: Option<f64>,
    /// Side length overriding the layer's reference tile dimension.
    pub tile_dimension: Option<f64>,
    /// Triangulated tracking surface.
    pub surface: Surface,
    /// Sphere approximated by the tracking surface (curved components only).
    pub sphere: Option<Sphere>,
}

impl ComponentSpec {
    /// A component with the given tracking surface and default classification.
    pub fn new(id: u32, surface: Surface) -> Self {
        Self {
            id,
            class: ComponentClass::default(),
            refractive_index: None,
            tile_dimension: None,
            surface,
            sphere: None,
        }
    }

    /// Set the classification codes.
    pub fn with_class(mut self, class: ComponentClass) -> Self {
        self.class = class;
        self
    }

    /// Set the refractive index.
    pub fn with_refractive_index(mut self, n: f64) -> Self {
        self.refractive_index = Some(n);
        self
    }

    /// Override the reference tile dimension (shortened tiles).
    pub fn with_tile_dimension(mut self, dim: f64) -> Self {
        self.tile_dimension = Some(dim);
        self
    }

    /// Attach a sphere model.
    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.sphere = Some(sphere);
        self
    }
}

/// A frozen component. Its faces live in the owning layer's face arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub(crate) id: u32,
    pub(crate) layer_id: u32,
    pub(crate) index: usize,
    pub(crate) class: ComponentClass,
    pub(crate) refractive_index: Option<f64>,
    pub(crate) tile_dimension: Option<f64>,
    pub(crate) sphere: Option<Sphere>,
    pub(crate) faces: Range<usize>,
}

impl Component {
    /// Component identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Id of the owning layer.
    pub fn layer_id(&self) -> u32 {
        self.layer_id
    }

    /// Position in the layer's component list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Classification codes.
    pub fn class(&self) -> ComponentClass {
        self.class
    }

    /// True for optically active elements.
    pub fn is_optical(&self) -> bool {
        self.class.optical
    }

    /// Refractive index, if the component is refractive.
    pub fn refractive_index(&self) -> Option<f64> {
        self.refractive_index
    }

    /// Tile side length override.
    pub fn tile_dimension(&self) -> Option<f64> {
        self.tile_dimension
    }

    /// Sphere model, if curved.
    pub fn sphere(&self) -> Option<&Sphere> {
        self.sphere.as_ref()
    }

    /// Range of this component's faces in the layer's face arena.
    pub fn face_range(&self) -> Range<usize> {
        self.faces.clone()
    }
}
