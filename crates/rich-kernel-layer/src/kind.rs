//! Layer classification and the layer-type table.

use std::fmt;
use std::str::FromStr;

use rich_kernel_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{GeomError, Result};

/// Aerogel thickness class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AerogelGrade {
    /// 2 cm tiles (forward bank).
    Cm2,
    /// 3 cm tiles (lateral bank).
    Cm3,
}

/// Placement of a planar mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorWall {
    /// Front wall, next to the aerogel.
    Front,
    /// Left, right or bottom wall.
    Lateral,
}

/// What a layer is made of. Selects the algorithm branch of every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Refractive aerogel radiator tiles.
    Aerogel(AerogelGrade),
    /// Flat mirrors.
    PlanarMirror(MirrorWall),
    /// Spherical mirror tiles.
    SphericalMirror,
    /// Photo-detector (MA-PMT) plane.
    PhotoDetector,
}

impl LayerKind {
    /// Numeric type code: aerogel 1, front mirror 2, planar mirror 3,
    /// spherical mirror 4, photo-detector 5.
    pub fn type_code(&self) -> u8 {
        match self {
            LayerKind::Aerogel(_) => 1,
            LayerKind::PlanarMirror(MirrorWall::Front) => 2,
            LayerKind::PlanarMirror(MirrorWall::Lateral) => 3,
            LayerKind::SphericalMirror => 4,
            LayerKind::PhotoDetector => 5,
        }
    }

    /// True for aerogel of either grade.
    pub fn is_aerogel(&self) -> bool {
        matches!(self, LayerKind::Aerogel(_))
    }

    /// True for 2 cm aerogel.
    pub fn is_2cm_aerogel(&self) -> bool {
        matches!(self, LayerKind::Aerogel(AerogelGrade::Cm2))
    }

    /// True for 3 cm aerogel.
    pub fn is_3cm_aerogel(&self) -> bool {
        matches!(self, LayerKind::Aerogel(AerogelGrade::Cm3))
    }

    /// True for any mirror.
    pub fn is_mirror(&self) -> bool {
        self.is_planar_mirror() || self.is_spherical_mirror()
    }

    /// True for front or lateral planar mirrors.
    pub fn is_planar_mirror(&self) -> bool {
        matches!(self, LayerKind::PlanarMirror(_))
    }

    /// True for the front planar mirrors.
    pub fn is_front_mirror(&self) -> bool {
        matches!(self, LayerKind::PlanarMirror(MirrorWall::Front))
    }

    /// True for left, right and bottom planar mirrors.
    pub fn is_lateral_mirror(&self) -> bool {
        matches!(self, LayerKind::PlanarMirror(MirrorWall::Lateral))
    }

    /// True for the spherical mirror.
    pub fn is_spherical_mirror(&self) -> bool {
        matches!(self, LayerKind::SphericalMirror)
    }

    /// True for the photo-detector plane.
    pub fn is_photo_detector(&self) -> bool {
        matches!(self, LayerKind::PhotoDetector)
    }

    /// Kinds whose tracking meshes approximate a sphere and whose
    /// intersections need per-component bookkeeping.
    pub fn is_curved(&self) -> bool {
        match self {
            LayerKind::Aerogel(_) | LayerKind::SphericalMirror => true,
            LayerKind::PlanarMirror(_) | LayerKind::PhotoDetector => false,
        }
    }
}

/// Nominal orientation label of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Front wall.
    Front,
    /// Left wall.
    Left,
    /// Right wall.
    Right,
    /// Bottom wall.
    Bottom,
    /// Spherical mirror.
    Sphere,
    /// Back (photo-detector) plane.
    Back,
}

impl Orientation {
    /// Unit vector pointing into the detector volume from this wall.
    pub fn inward(&self) -> Vec3 {
        match self {
            Orientation::Front => Vec3::new(0.0, 0.0, 1.0),
            Orientation::Left => Vec3::new(1.0, 0.0, 0.0),
            Orientation::Right => Vec3::new(-1.0, 0.0, 0.0),
            Orientation::Bottom => Vec3::new(0.0, 1.0, 0.0),
            Orientation::Sphere => Vec3::new(0.0, 0.0, -1.0),
            Orientation::Back => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// The label as written in configuration.
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Front => "front",
            Orientation::Left => "left",
            Orientation::Right => "right",
            Orientation::Bottom => "bottom",
            Orientation::Sphere => "sphere",
            Orientation::Back => "back",
        }
    }
}

impl FromStr for Orientation {
    type Err = GeomError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "front" => Ok(Orientation::Front),
            "left" => Ok(Orientation::Left),
            "right" => Ok(Orientation::Right),
            "bottom" => Ok(Orientation::Bottom),
            "sphere" => Ok(Orientation::Sphere),
            "back" => Ok(Orientation::Back),
            other => Err(GeomError::UnknownOrientation(other.to_string())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the layer-type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerType {
    /// Layer id used by the reconstruction.
    pub id: u32,
    /// Layer id used by the geometry database.
    pub db_id: u32,
    /// Layer name.
    pub name: String,
    /// Layer classification.
    pub kind: LayerKind,
    /// Nominal orientation label.
    pub orientation: Orientation,
}

impl LayerType {
    fn new(id: u32, db_id: u32, name: &str, kind: LayerKind, orientation: Orientation) -> Self {
        Self {
            id,
            db_id,
            name: name.to_string(),
            kind,
            orientation,
        }
    }
}

#[derive(Deserialize)]
struct RawTable {
    layer: Vec<LayerType>,
}

/// Lookup of layer types by id.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTable {
    types: Vec<LayerType>,
}

impl LayerTable {
    /// The 13 layers of one RICH sector.
    pub fn builtin() -> Self {
        use AerogelGrade::*;
        use LayerKind::*;
        use MirrorWall::*;
        use Orientation as O;
        Self {
            types: vec![
                LayerType::new(0, 201, "aerogel_2cm_b1", Aerogel(Cm2), O::Front),
                LayerType::new(1, 202, "aerogel_2cm_b2", Aerogel(Cm2), O::Front),
                LayerType::new(2, 203, "aerogel_3cm_l1", Aerogel(Cm3), O::Front),
                LayerType::new(3, 204, "aerogel_3cm_l2", Aerogel(Cm3), O::Front),
                LayerType::new(4, 301, "mirror_front_b1", PlanarMirror(Front), O::Front),
                LayerType::new(5, 302, "mirror_front_b2", PlanarMirror(Front), O::Front),
                LayerType::new(6, 303, "mirror_left_l1", PlanarMirror(Lateral), O::Left),
                LayerType::new(7, 304, "mirror_left_l2", PlanarMirror(Lateral), O::Left),
                LayerType::new(8, 305, "mirror_right_r1", PlanarMirror(Lateral), O::Right),
                LayerType::new(9, 306, "mirror_right_r2", PlanarMirror(Lateral), O::Right),
                LayerType::new(10, 307, "mirror_bottom", PlanarMirror(Lateral), O::Bottom),
                LayerType::new(11, 308, "mirror_sphere", SphericalMirror, O::Sphere),
                LayerType::new(12, 401, "mapmts", PhotoDetector, O::Back),
            ],
        }
    }

    /// Build a table from explicit rows. Ids must be unique.
    pub fn new(types: Vec<LayerType>) -> Result<Self> {
        for (i, t) in types.iter().enumerate() {
            if types[..i].iter().any(|o| o.id == t.id) {
                return Err(GeomError::DuplicateLayer(t.id));
            }
        }
        Ok(Self { types })
    }

    /// Parse a table from TOML `[[layer]]` entries.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let raw: RawTable = toml::from_str(s)?;
        Self::new(raw.layer)
    }

    /// Layer type for `id`.
    pub fn get(&self, id: u32) -> Result<&LayerType> {
        self.types
            .iter()
            .find(|t| t.id == id)
            .ok_or(GeomError::UnknownLayer(id))
    }

    /// Layer type by name.
    pub fn by_name(&self, name: &str) -> Option<&LayerType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// All rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = &LayerType> + '_ {
        self.types.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for LayerTable {
    fn default() -> Self {
        Self::builtin()
    }
}
