#![warn(missing_docs)]

//! Detector layers of the RICH geometry kernel.
//!
//! A [`Layer`] groups the components (aerogel tiles, mirror panels, the
//! photo-detector plane) of one sector that share a classification and a
//! nominal orientation. Component meshes are merged into a face arena at
//! build time; queries then resolve barycenters, normals, local frames,
//! tile quadrants and the entrance/exit crossings of trajectories.
//!
//! # Architecture
//!
//! - [`kind`] - layer classification and the layer-type table
//! - [`params`] - tunable tolerances, loadable from TOML
//! - [`Layer`] / [`LayerBuilder`] - build-then-freeze layer model
//! - barycenter, normal and main-axis queries on [`Layer`]
//! - [`LocalFrame`] - per-element reference frames
//! - [`Intersection`] - ray crossings with optional sphere refinement
//!
//! # Example
//!
//! ```ignore
//! use rich_kernel_layer::{ComponentSpec, Layer, LayerTable};
//! use rich_kernel_math::{Point3, Vec3};
//! use rich_kernel_raytrace::Ray;
//!
//! let table = LayerTable::builtin();
//! let layer = Layer::from_table(&table, 1, 4)?
//!     .component(ComponentSpec::new(0, mirror_mesh))
//!     .build()?;
//! let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::z());
//! if let Some(hit) = layer.find_entrance(&ray, None) {
//!     println!("entered at {:?}", hit.position);
//! }
//! ```

mod component;
mod descriptors;
mod error;
mod frame;
mod intersection;
mod layer;
mod quadrant;

pub mod kind;
pub mod params;

pub use component::{Component, ComponentClass, ComponentSpec};
pub use descriptors::{centroid, dedup_points, select_vertices};
pub use error::{GeomError, Result};
pub use frame::LocalFrame;
pub use intersection::{Intersection, IntersectionQuery, Progression, Side};
pub use kind::{AerogelGrade, LayerKind, LayerTable, LayerType, MirrorWall, Orientation};
pub use layer::{Layer, LayerBuilder};
pub use params::GeoParameters;
