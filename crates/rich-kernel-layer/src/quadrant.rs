//! Sub-tile (quadrant) indexing of aerogel tiles.

use rich_kernel_math::{Point3, Vec3, VecExt};

use crate::error::{GeomError, Result};
use crate::layer::Layer;

/// Tile rectangle anchored at its lower-left corner in the local frame.
struct TileGrid {
    origin: Point3,
    step_x: Vec3,
    step_y: Vec3,
}

impl TileGrid {
    /// Truncated cell coordinate of `d` along `step`, clamped to `[0, n - 1]`.
    fn cell(d: &Vec3, step: &Vec3, n: usize) -> usize {
        let frac = d.dot(step) / step.norm_squared();
        let idx = (frac * n as f64) as i64;
        idx.clamp(0, n as i64 - 1) as usize
    }

    fn index(&self, point: &Point3, n: usize) -> usize {
        let d = point - self.origin;
        let col = Self::cell(&d, &self.step_x, n);
        let row = Self::cell(&d, &self.step_y, n);
        row * n + col
    }
}

impl Layer {
    /// Index of the `n` x `n` sub-tile of component `component` containing
    /// `point`, counted row-major from the tile's lower-left corner in its
    /// local frame.
    ///
    /// `n` outside `1..=max_tile_subdivisions` is replaced by 1. Points
    /// outside the tile are clamped to the nearest border cell.
    ///
    /// # Panics
    ///
    /// Panics if `component` is out of range.
    pub fn tile_quadrant(&self, n: usize, component: usize, point: &Point3) -> Result<usize> {
        let params = self.params();
        let n = if (1..=params.max_tile_subdivisions).contains(&n) {
            n
        } else {
            log::warn!(
                "layer {} component {component}: {n} subdivisions out of range, using 1",
                self.id()
            );
            1
        };

        let layer = self.id();
        let dimension = self
            .component(component)
            .tile_dimension()
            .unwrap_or(params.aerogel_tile_dimension);
        let inward = self.inward().into_inner();
        let frame = self.local_frame(Some(component), &inward)?;
        let vertices = self.select_vertices(Some(component), &inward);
        let uncalibrated = || GeomError::NoTileCalibration { layer, component };

        let (start, step_x) = vertices
            .iter()
            .enumerate()
            .flat_map(|(i, a)| vertices[i + 1..].iter().map(move |b| (a, b)))
            .find_map(|(a, b)| {
                let d = b - a;
                let same_length = (d.norm() - dimension).abs() < params.tile_match_tolerance;
                let same_row = d.dot(frame.y.as_ref()).abs() < params.tile_row_tolerance;
                (same_length && same_row).then_some((*a, d))
            })
            .ok_or_else(uncalibrated)?;

        let across = frame.z.cross(&step_x).as_unit().ok_or_else(uncalibrated)?;
        let across = if across.dot(&(frame.origin - start)) < 0.0 {
            -across.into_inner()
        } else {
            across.into_inner()
        };
        let extent = vertices
            .iter()
            .map(|v| (v - start).dot(&across))
            .fold(0.0, f64::max);
        if extent < params.vertex_tolerance {
            return Err(uncalibrated());
        }
        let step_y = across * extent;

        let phi = frame.to_local_vec(&(step_x + step_y)).phi().to_degrees();
        let grid = if phi > 0.0 && phi <= 90.0 {
            TileGrid { origin: start, step_x, step_y }
        } else if phi > 90.0 {
            TileGrid { origin: start + step_x, step_x: -step_x, step_y }
        } else if phi <= -90.0 {
            TileGrid { origin: start + step_x + step_y, step_x: -step_x, step_y: -step_y }
        } else {
            TileGrid { origin: start + step_y, step_x, step_y: -step_y }
        };

        let index = grid.index(point, n);
        log::debug!("layer {layer} component {component}: point {point:?} in quadrant {index} of {n}x{n}");
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentSpec;
    use crate::kind::LayerTable;
    use rich_kernel_geom::Surface;

    fn tile(x0: f64, y0: f64, side: f64) -> Surface {
        Surface::from_polygon(&[
            Point3::new(x0, y0, 0.0),
            Point3::new(x0 + side, y0, 0.0),
            Point3::new(x0 + side, y0 + side, 0.0),
            Point3::new(x0, y0 + side, 0.0),
        ])
    }

    fn aerogel(specs: Vec<ComponentSpec>) -> Layer {
        let table = LayerTable::builtin();
        Layer::from_table(&table, 1, 0).unwrap().components(specs).build().unwrap()
    }

    #[test]
    fn test_quadrants_of_2x2() {
        let l = aerogel(vec![ComponentSpec::new(0, tile(0.0, 0.0, 20.0))]);
        let q = |x, y| l.tile_quadrant(2, 0, &Point3::new(x, y, 0.0)).unwrap();
        assert_eq!(q(5.0, 5.0), 0);
        assert_eq!(q(15.0, 5.0), 1);
        assert_eq!(q(5.0, 15.0), 2);
        assert_eq!(q(15.0, 15.0), 3);
    }

    #[test]
    fn test_clamping_outside_tile() {
        let l = aerogel(vec![ComponentSpec::new(0, tile(0.0, 0.0, 20.0))]);
        assert_eq!(l.tile_quadrant(4, 0, &Point3::new(-30.0, -30.0, 0.0)).unwrap(), 0);
        assert_eq!(l.tile_quadrant(4, 0, &Point3::new(90.0, 90.0, 0.0)).unwrap(), 15);
    }

    #[test]
    fn test_subdivisions_out_of_range() {
        let l = aerogel(vec![ComponentSpec::new(0, tile(0.0, 0.0, 20.0))]);
        let p = Point3::new(15.0, 15.0, 0.0);
        assert_eq!(l.tile_quadrant(0, 0, &p).unwrap(), 0);
        assert_eq!(l.tile_quadrant(16, 0, &p).unwrap(), 0);
        assert_eq!(l.tile_quadrant(15, 0, &p).unwrap(), 11 * 15 + 11);
    }

    #[test]
    fn test_shortened_tile_dimension() {
        let l = aerogel(vec![
            ComponentSpec::new(0, tile(0.0, 0.0, 20.0)),
            ComponentSpec::new(1, tile(40.0, 0.0, 12.0)).with_tile_dimension(12.0),
            ComponentSpec::new(2, tile(80.0, 0.0, 12.0)),
        ]);
        assert_eq!(l.tile_quadrant(2, 1, &Point3::new(49.0, 1.0, 0.0)).unwrap(), 1);
        assert!(matches!(
            l.tile_quadrant(2, 2, &Point3::new(85.0, 5.0, 0.0)),
            Err(GeomError::NoTileCalibration { layer: 0, component: 2 })
        ));
    }

    #[test]
    fn test_mirrored_vertex_order() {
        // winding starting from the top-right corner flips both steps
        let corners = [
            Point3::new(20.0, 20.0, 0.0),
            Point3::new(0.0, 20.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(20.0, 0.0, 0.0),
        ];
        let l = aerogel(vec![ComponentSpec::new(0, Surface::from_polygon(&corners))]);
        assert_eq!(l.tile_quadrant(2, 0, &Point3::new(5.0, 5.0, 0.0)).unwrap(), 0);
        assert_eq!(l.tile_quadrant(2, 0, &Point3::new(15.0, 5.0, 0.0)).unwrap(), 1);
        assert_eq!(l.tile_quadrant(2, 0, &Point3::new(5.0, 15.0, 0.0)).unwrap(), 2);
    }
}
