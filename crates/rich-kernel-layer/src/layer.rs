//! Layers: ordered components sharing a classification and orientation.
//!
//! All component faces live in one face arena (the layer's global surface).
//! Component `i` owns the contiguous range `offsets[i]..offsets[i + 1]`, so
//! the owner of any face is found by binary search on the offset table.

use std::fmt;

use rich_kernel_geom::{Face, Sphere, Surface};
use rich_kernel_math::{Dir3, Vec3, VecExt};

use crate::component::{Component, ComponentSpec};
use crate::error::{GeomError, Result};
use crate::kind::{LayerKind, LayerTable, LayerType, Orientation};
use crate::params::GeoParameters;

/// A detector layer.
///
/// Built once through [`LayerBuilder`]; queries take `&self` and may run
/// concurrently. The few setup mutators take `&mut self`.
#[derive(Debug, Clone)]
pub struct Layer {
    sector: u8,
    layer_type: LayerType,
    inward: Dir3,
    params: GeoParameters,
    components: Vec<Component>,
    arena: Surface,
    offsets: Vec<usize>,
    sphere: Option<Sphere>,
    nominal_plane: Option<Surface>,
}

/// Single-threaded construction of a [`Layer`].
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    sector: u8,
    layer_type: LayerType,
    inward: Option<Vec3>,
    params: GeoParameters,
    components: Vec<ComponentSpec>,
    sphere: Option<Sphere>,
    nominal_plane: Option<Surface>,
}

impl LayerBuilder {
    /// Start a layer of the given type in `sector`.
    pub fn new(sector: u8, layer_type: LayerType) -> Self {
        Self {
            sector,
            layer_type,
            inward: None,
            params: GeoParameters::default(),
            components: Vec::new(),
            sphere: None,
            nominal_plane: None,
        }
    }

    /// Use these parameters instead of the defaults.
    pub fn params(mut self, params: GeoParameters) -> Self {
        self.params = params;
        self
    }

    /// Override the inward vector resolved from the orientation label.
    pub fn inward(mut self, inward: Vec3) -> Self {
        self.inward = Some(inward);
        self
    }

    /// Append a component.
    pub fn component(mut self, spec: ComponentSpec) -> Self {
        self.components.push(spec);
        self
    }

    /// Append several components, in order.
    pub fn components(mut self, specs: impl IntoIterator<Item = ComponentSpec>) -> Self {
        self.components.extend(specs);
        self
    }

    /// Sphere model used by whole-layer queries on curved layers.
    pub fn sphere(mut self, sphere: Sphere) -> Self {
        self.sphere = Some(sphere);
        self
    }

    /// Nominal plane of the layer.
    pub fn nominal_plane(mut self, plane: Surface) -> Self {
        self.nominal_plane = Some(plane);
        self
    }

    /// Freeze the layer: validate, then move every component mesh into the
    /// face arena.
    pub fn build(self) -> Result<Layer> {
        self.params.validate()?;
        let id = self.layer_type.id;
        if self.components.is_empty() {
            return Err(GeomError::EmptyLayer(id));
        }
        let inward = self
            .inward
            .unwrap_or_else(|| self.layer_type.orientation.inward())
            .as_unit()
            .ok_or(GeomError::DegenerateInward(id))?;

        let mut arena = Surface::new();
        let mut offsets = Vec::with_capacity(self.components.len() + 1);
        let mut components = Vec::with_capacity(self.components.len());
        offsets.push(0);
        for (index, spec) in self.components.into_iter().enumerate() {
            let start = arena.len();
            arena.append(&spec.surface);
            offsets.push(arena.len());
            components.push(Component {
                id: spec.id,
                layer_id: id,
                index,
                class: spec.class,
                refractive_index: spec.refractive_index,
                tile_dimension: spec.tile_dimension,
                sphere: spec.sphere,
                faces: start..arena.len(),
            });
        }

        log::debug!(
            "built layer {} ({}) sector {}: {} components, {} faces",
            id,
            self.layer_type.name,
            self.sector,
            components.len(),
            arena.len()
        );

        Ok(Layer {
            sector: self.sector,
            layer_type: self.layer_type,
            inward,
            params: self.params,
            components,
            arena,
            offsets,
            sphere: self.sphere,
            nominal_plane: self.nominal_plane,
        })
    }
}

impl Layer {
    /// Start building a layer.
    pub fn builder(sector: u8, layer_type: LayerType) -> LayerBuilder {
        LayerBuilder::new(sector, layer_type)
    }

    /// Start building the layer `id` of a layer-type table.
    pub fn from_table(table: &LayerTable, sector: u8, id: u32) -> Result<LayerBuilder> {
        Ok(LayerBuilder::new(sector, table.get(id)?.clone()))
    }

    /// Layer id in the reconstruction.
    pub fn id(&self) -> u32 {
        self.layer_type.id
    }

    /// Layer id in the geometry database.
    pub fn db_id(&self) -> u32 {
        self.layer_type.db_id
    }

    /// Sector number.
    pub fn sector(&self) -> u8 {
        self.sector
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.layer_type.name
    }

    /// Layer classification.
    pub fn kind(&self) -> LayerKind {
        self.layer_type.kind
    }

    /// Nominal orientation label.
    pub fn orientation(&self) -> Orientation {
        self.layer_type.orientation
    }

    /// The full layer-type row.
    pub fn layer_type(&self) -> &LayerType {
        &self.layer_type
    }

    /// Unit vector pointing into the detector volume.
    pub fn inward(&self) -> Dir3 {
        self.inward
    }

    /// Tunable parameters.
    pub fn params(&self) -> &GeoParameters {
        &self.params
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True if the layer has no components. Never true for a built layer.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components in order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Component `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range: that is a geometry build defect.
    pub fn component(&self, index: usize) -> &Component {
        match self.components.get(index) {
            Some(c) => c,
            None => panic!(
                "component index {} out of range for layer {} ({} components)",
                index,
                self.id(),
                self.components.len()
            ),
        }
    }

    /// True if the first component is optically active.
    pub fn is_optical(&self) -> bool {
        self.components.first().is_some_and(Component::is_optical)
    }

    /// The merged surface of all components (the face arena).
    pub fn global_surface(&self) -> &Surface {
        &self.arena
    }

    /// Faces of one component, or of the whole layer for `None`.
    pub fn faces(&self, component: Option<usize>) -> &[Face] {
        match component {
            Some(i) => &self.arena.faces()[self.component(i).face_range()],
            None => self.arena.faces(),
        }
    }

    /// First arena index of the faces returned by [`Layer::faces`].
    pub(crate) fn face_offset(&self, component: Option<usize>) -> usize {
        component.map_or(0, |i| self.offsets[i])
    }

    /// Face `face` of the arena.
    pub fn face(&self, face: usize) -> &Face {
        self.arena.face(face)
    }

    /// Index of the component owning arena face `face`, or `None` if the
    /// index is outside the arena.
    pub fn component_of_face(&self, face: usize) -> Option<usize> {
        if face >= self.arena.len() {
            return None;
        }
        Some(self.offsets.partition_point(|&start| start <= face) - 1)
    }

    /// Sphere model of a component, or the layer-level sphere for `None`.
    pub fn sphere(&self, component: Option<usize>) -> Option<&Sphere> {
        match component {
            Some(i) => self.component(i).sphere(),
            None => self.sphere.as_ref(),
        }
    }

    /// Nominal plane, if supplied.
    pub fn nominal_plane(&self) -> Option<&Surface> {
        self.nominal_plane.as_ref()
    }

    /// Replace the tracking surface of component `index` and rebuild the
    /// face arena.
    pub fn replace_component_surface(&mut self, index: usize, surface: Surface) {
        self.component(index);
        let old = std::mem::take(&mut self.arena);
        self.offsets.clear();
        self.offsets.push(0);
        for component in &mut self.components {
            let start = self.arena.len();
            if component.index == index {
                self.arena.append(&surface);
            } else {
                for face in &old.faces()[component.faces.clone()] {
                    self.arena.push(*face);
                }
            }
            component.faces = start..self.arena.len();
            self.offsets.push(self.arena.len());
        }
    }

    /// Attach or remove the sphere model of component `index`.
    pub fn set_component_sphere(&mut self, index: usize, sphere: Option<Sphere>) {
        self.component(index);
        self.components[index].sphere = sphere;
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Layer id {:3}  {}  sector {}  size {:4}  faces {:5}",
            self.id(),
            self.name(),
            self.sector,
            self.len(),
            self.arena.len()
        )?;
        for c in &self.components {
            writeln!(
                f,
                "  --> comp # {:3}  id {:3}  voltype {:3}  optical {}  mirror {:3}  n {:6.3}  faces {:?}",
                c.index,
                c.id,
                c.class.volume_type,
                c.class.optical,
                c.class.mirror_type,
                c.refractive_index.unwrap_or(0.0),
                c.faces
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentClass;
    use rich_kernel_math::Point3;

    fn square(z: f64) -> Surface {
        Surface::from_polygon(&[
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(-1.0, 1.0, z),
        ])
    }

    fn three_tile_layer() -> Layer {
        let table = LayerTable::builtin();
        Layer::from_table(&table, 1, 4)
            .unwrap()
            .component(ComponentSpec::new(10, square(0.0)))
            .component(ComponentSpec::new(11, Surface::new()))
            .component(ComponentSpec::new(12, {
                let mut s = square(1.0);
                s.append(&square(2.0));
                s
            }))
            .build()
            .unwrap()
    }

    #[test]
    fn test_arena_offsets() {
        let layer = three_tile_layer();
        assert_eq!(layer.global_surface().len(), 6);
        assert_eq!(layer.component(0).face_range(), 0..2);
        assert_eq!(layer.component(1).face_range(), 2..2);
        assert_eq!(layer.component(2).face_range(), 2..6);
        assert_eq!(layer.component_of_face(0), Some(0));
        assert_eq!(layer.component_of_face(1), Some(0));
        // empty component 1 owns nothing
        assert_eq!(layer.component_of_face(2), Some(2));
        assert_eq!(layer.component_of_face(5), Some(2));
        assert_eq!(layer.component_of_face(6), None);
        assert_eq!(layer.faces(Some(2)).len(), 4);
        assert_eq!(layer.face_offset(Some(2)), 2);
    }

    #[test]
    fn test_lookup_covers_every_face() {
        let layer = three_tile_layer();
        for face in 0..layer.global_surface().len() {
            let owner = layer.component_of_face(face).unwrap();
            assert!(layer.component(owner).face_range().contains(&face));
        }
    }

    #[test]
    fn test_inward_from_orientation() {
        let layer = three_tile_layer();
        assert!((layer.inward().as_ref().z - 1.0).abs() < 1e-12);
        assert_eq!(layer.kind().type_code(), 2);
        assert_eq!(layer.db_id(), 301);
        assert_eq!(layer.name(), "mirror_front_b1");
    }

    #[test]
    fn test_replace_surface_rebuilds_arena() {
        let mut layer = three_tile_layer();
        layer.replace_component_surface(1, square(5.0));
        assert_eq!(layer.global_surface().len(), 8);
        assert_eq!(layer.component(1).face_range(), 2..4);
        assert_eq!(layer.component(2).face_range(), 4..8);
        assert!((layer.face(2).corners[0].z - 5.0).abs() < 1e-12);
        assert!((layer.face(4).corners[0].z - 1.0).abs() < 1e-12);
        assert_eq!(layer.component_of_face(3), Some(1));
    }

    #[test]
    fn test_empty_layer_rejected() {
        let table = LayerTable::builtin();
        let err = Layer::from_table(&table, 1, 0).unwrap().build().unwrap_err();
        assert!(matches!(err, GeomError::EmptyLayer(0)));
    }

    #[test]
    fn test_zero_inward_rejected() {
        let table = LayerTable::builtin();
        let err = Layer::from_table(&table, 1, 0)
            .unwrap()
            .inward(Vec3::zeros())
            .component(ComponentSpec::new(1, square(0.0)))
            .build()
            .unwrap_err();
        assert!(matches!(err, GeomError::DegenerateInward(0)));
    }

    #[test]
    fn test_unknown_layer_id() {
        let table = LayerTable::builtin();
        assert!(matches!(Layer::from_table(&table, 1, 42), Err(GeomError::UnknownLayer(42))));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_component_out_of_range_panics() {
        let layer = three_tile_layer();
        layer.component(3);
    }

    #[test]
    fn test_optical_flag_and_display() {
        let table = LayerTable::builtin();
        let layer = Layer::from_table(&table, 2, 12)
            .unwrap()
            .component(
                ComponentSpec::new(7, square(0.0)).with_class(ComponentClass {
                    volume_type: 1,
                    optical: true,
                    mirror_type: 0,
                }),
            )
            .build()
            .unwrap();
        assert!(layer.is_optical());
        let text = layer.to_string();
        assert!(text.contains("mapmts"));
        assert!(text.contains("comp #   0"));
    }

    #[test]
    fn test_layer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Layer>();
    }
}
