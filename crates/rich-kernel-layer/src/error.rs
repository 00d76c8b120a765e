//! Error types for layer construction and geometric queries.

use thiserror::Error;

/// Errors raised while building layers or deriving layer descriptors.
///
/// Geometric misses (no crossing, no oriented face) are not errors; those
/// queries return `Option`.
#[derive(Error, Debug)]
pub enum GeomError {
    /// Layer id not present in the layer-type table.
    #[error("unknown layer id {0}")]
    UnknownLayer(u32),

    /// Orientation label not in the fixed lookup.
    #[error("unknown orientation label '{0}'")]
    UnknownOrientation(String),

    /// Duplicate layer id in a layer-type table.
    #[error("layer id {0} defined twice")]
    DuplicateLayer(u32),

    /// Invalid tunable parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed TOML configuration.
    #[error("configuration parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Layer built without components.
    #[error("layer {0} has no components")]
    EmptyLayer(u32),

    /// Inward orientation of zero length.
    #[error("layer {0} has a zero-length inward vector")]
    DegenerateInward(u32),

    /// No vertex selected, or curved re-projection failed.
    #[error("no barycenter for layer {layer} component {component:?}")]
    NoBarycenter {
        /// Layer id.
        layer: u32,
        /// Component index, `None` for the whole layer.
        component: Option<usize>,
    },

    /// No face oriented along the requested direction.
    #[error("no face of layer {layer} component {component:?} faces the requested orientation")]
    NoOrientedFace {
        /// Layer id.
        layer: u32,
        /// Component index, `None` for the whole layer.
        component: Option<usize>,
    },

    /// No vertex pair within the main-axis angular cutoff.
    #[error("no main axis for layer {layer} component {component:?}")]
    NoMainAxis {
        /// Layer id.
        layer: u32,
        /// Component index, `None` for the whole layer.
        component: Option<usize>,
    },

    /// Spherical element without a sphere model.
    #[error("layer {layer} component {component:?} has no sphere model")]
    MissingSphere {
        /// Layer id.
        layer: u32,
        /// Component index, `None` for the whole layer.
        component: Option<usize>,
    },

    /// No edge matches the reference tile dimension.
    #[error("no tile calibration edge for layer {layer} component {component}")]
    NoTileCalibration {
        /// Layer id.
        layer: u32,
        /// Component index.
        component: usize,
    },
}

/// Result type for layer operations.
pub type Result<T> = std::result::Result<T, GeomError>;
