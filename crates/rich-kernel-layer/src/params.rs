//! Tunable geometry parameters.

use serde::{Deserialize, Serialize};

use crate::error::{GeomError, Result};

/// Numeric parameters of the layer model and intersection engine.
///
/// Lengths are in the units of the supplied meshes, angles in degrees.
/// Missing keys in a TOML table take their default values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoParameters {
    /// Two vertices closer than this are the same vertex.
    pub vertex_tolerance: f64,
    /// Crossings closer than this to the ray origin are ignored.
    pub min_ray_step: f64,
    /// Maximum distance between a planar estimate and its sphere re-projection.
    pub max_sphere_deviation: f64,
    /// Angular cutoff for main-axis candidates (degrees).
    pub main_axis_cutoff_deg: f64,
    /// Allowed mismatch between a vertex pair and the tile dimension.
    pub tile_match_tolerance: f64,
    /// Maximum offset along the frame y axis for a same-row vertex pair.
    pub tile_row_tolerance: f64,
    /// Reference side length of an aerogel tile.
    pub aerogel_tile_dimension: f64,
    /// Maximum distance of a vertex outside its sphere model.
    pub sphere_check_tolerance: f64,
    /// Largest accepted subdivision count per tile side.
    pub max_tile_subdivisions: usize,
}

impl Default for GeoParameters {
    fn default() -> Self {
        Self {
            vertex_tolerance: 1e-3,
            min_ray_step: 1e-2,
            max_sphere_deviation: 10.0,
            main_axis_cutoff_deg: 30.0,
            tile_match_tolerance: 0.2,
            tile_row_tolerance: 10.0,
            aerogel_tile_dimension: 20.0,
            sphere_check_tolerance: 1.0,
            max_tile_subdivisions: 15,
        }
    }
}

impl GeoParameters {
    /// Parse parameters from a TOML document and validate them.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let params: Self = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("vertex_tolerance", self.vertex_tolerance),
            ("max_sphere_deviation", self.max_sphere_deviation),
            ("tile_match_tolerance", self.tile_match_tolerance),
            ("tile_row_tolerance", self.tile_row_tolerance),
            ("aerogel_tile_dimension", self.aerogel_tile_dimension),
            ("sphere_check_tolerance", self.sphere_check_tolerance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeomError::InvalidParameter(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if !self.min_ray_step.is_finite() || self.min_ray_step < 0.0 {
            return Err(GeomError::InvalidParameter(format!(
                "min_ray_step must be non-negative and finite, got {}",
                self.min_ray_step
            )));
        }
        if !(self.main_axis_cutoff_deg > 0.0 && self.main_axis_cutoff_deg <= 180.0) {
            return Err(GeomError::InvalidParameter(format!(
                "main_axis_cutoff_deg must be in (0, 180], got {}",
                self.main_axis_cutoff_deg
            )));
        }
        if self.max_tile_subdivisions == 0 {
            return Err(GeomError::InvalidParameter(
                "max_tile_subdivisions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
